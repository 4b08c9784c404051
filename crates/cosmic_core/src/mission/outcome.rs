//! Weighted discrete draws.

use rand::Rng;

/// A fixed discrete distribution over `T`.
///
/// Weights need not sum to any particular total. A uniform draw over the
/// summed weight picks the first bucket whose cumulative weight exceeds it.
#[derive(Debug, Clone, Copy)]
pub struct WeightedTable<T: 'static> {
    entries: &'static [(T, u32)],
}

impl<T: Copy> WeightedTable<T> {
    /// Wrap a static table. The first entry is the fallback.
    #[must_use]
    pub const fn new(entries: &'static [(T, u32)]) -> Self {
        Self { entries }
    }

    /// Sum of all weights.
    #[must_use]
    pub fn total_weight(&self) -> u32 {
        self.entries.iter().map(|&(_, weight)| weight).sum()
    }

    /// Entries with their weights.
    #[must_use]
    pub fn entries(&self) -> &'static [(T, u32)] {
        self.entries
    }

    /// Draw one entry.
    ///
    /// # Panics
    ///
    /// Panics if the table is empty.
    pub fn draw(&self, rng: &mut impl Rng) -> T {
        let total = self.total_weight();
        if total == 0 {
            return self.entries[0].0;
        }
        let mut roll = rng.gen_range(0..total);
        for &(value, weight) in self.entries {
            if roll < weight {
                return value;
            }
            roll -= weight;
        }
        self.entries[0].0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Coin {
        Heads,
        Tails,
        Edge,
    }

    static COIN: WeightedTable<Coin> =
        WeightedTable::new(&[(Coin::Heads, 50), (Coin::Tails, 50), (Coin::Edge, 0)]);

    #[test]
    fn test_zero_weight_is_never_drawn() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            assert_ne!(COIN.draw(&mut rng), Coin::Edge);
        }
    }

    #[test]
    fn test_same_seed_same_draws() {
        let draws = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..32).map(|_| COIN.draw(&mut rng)).collect::<Vec<_>>()
        };
        assert_eq!(draws(11), draws(11));
        assert_eq!(COIN.total_weight(), 100);
    }
}
