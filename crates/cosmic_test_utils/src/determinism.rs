//! Determinism testing utilities.
//!
//! The engine recomputes state from timestamps, so running the same
//! sequence of passes on the same starting world must produce the same
//! bytes. Sources of divergence to watch for:
//!
//! - **Map iteration order**: every table is a `BTreeMap`.
//! - **Randomness**: outcome draws are seeded from mission id and arrival.
//! - **Wall clock**: nothing reads it; `now` is always a parameter.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use cosmic_core::world::World;
use serde::Serialize;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of steps per run.
    pub steps: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for a deterministic run).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that every run matched, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Simulation is non-deterministic!\n\
                 Runs: {}\n\
                 Steps: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.steps,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a simulation multiple times and verify determinism.
///
/// `step` receives the step index so callers can derive `now` from it.
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    steps: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S, u64),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();
        for index in 0..steps {
            step(&mut state, index);
        }
        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        steps,
    }
}

/// Hash of the bincode encoding of a serializable value.
///
/// Floats are hashed by their bit patterns, so this distinguishes states
/// that `PartialEq` would treat as equal only when they really differ.
///
/// # Panics
///
/// Panics if the value cannot be encoded.
#[must_use]
pub fn state_hash<T: Serialize>(value: &T) -> u64 {
    let bytes = bincode::serialize(value).expect("state must encode");
    compute_hash(&bytes)
}

/// Hash of a whole world.
#[must_use]
pub fn world_hash(world: &World) -> u64 {
    state_hash(world)
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for engine inputs.
pub mod strategies {
    use cosmic_core::model::{Coordinates, DefenseType, Defenses, Fleet, Resources, ShipType};
    use proptest::prelude::*;

    /// Combat ships only; cargo and civil ships are left out.
    pub const COMBAT_SHIPS: [ShipType; 4] = [
        ShipType::LightFighter,
        ShipType::MediumFighter,
        ShipType::HeavyFighter,
        ShipType::Cruiser,
    ];

    /// A fleet of up to `max_per_type` of each combat ship, plus cargo ships.
    pub fn arb_fleet(max_per_type: u64) -> impl Strategy<Value = Fleet> {
        (
            proptest::collection::vec(0..=max_per_type, COMBAT_SHIPS.len()),
            0..=max_per_type,
        )
            .prop_map(|(counts, cargo)| {
                let mut fleet: Fleet = COMBAT_SHIPS.iter().copied().zip(counts).collect();
                fleet.add(ShipType::CargoShip, cargo);
                fleet
            })
    }

    /// Up to `max_per_type` of each defense type.
    pub fn arb_defenses(max_per_type: u64) -> impl Strategy<Value = Defenses> {
        proptest::collection::vec(0..=max_per_type, DefenseType::ALL.len()).prop_map(|counts| {
            DefenseType::ALL.iter().copied().zip(counts).collect()
        })
    }

    /// A stockpile of up to `max` per resource.
    pub fn arb_resources(max: f64) -> impl Strategy<Value = Resources> {
        (0.0..=max, 0.0..=max, 0.0..=max).prop_map(|(m, c, d)| Resources::new(m, c, d))
    }

    /// Any slot inside the default galaxy bounds.
    pub fn arb_coordinates() -> impl Strategy<Value = Coordinates> {
        (1u32..=9, 1u32..=499, 1u32..=15).prop_map(|(g, s, p)| Coordinates::new(g, s, p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::duel;
    use cosmic_core::catalog::Catalog;
    use cosmic_core::config::EngineConfig;
    use cosmic_core::tick::run_pass;

    #[test]
    fn test_repeated_passes_are_deterministic() {
        let catalog = Catalog::standard();
        let config = EngineConfig::default();
        let result = verify_determinism(
            3,
            24,
            || duel(&config, 0),
            |state, index| {
                let now = (index + 1) * 3600;
                run_pass(&catalog, &config, &mut state.world, state.attacker, now).unwrap();
                run_pass(&catalog, &config, &mut state.world, state.defender, now).unwrap();
            },
            |state| world_hash(&state.world),
        );
        result.assert_deterministic();
        assert_eq!(result.unique_hashes().len(), 1);
    }

    #[test]
    fn test_hash_tracks_changes() {
        let config = EngineConfig::default();
        let a = duel(&config, 0);
        let mut b = a.clone();
        assert_eq!(world_hash(&a.world), world_hash(&b.world));
        b.world.planets.values_mut().for_each(|p| p.resources.metal += 1.0);
        assert_ne!(world_hash(&a.world), world_hash(&b.world));
    }

    #[test]
    fn test_worlds_with_mail_hash() {
        use cosmic_core::model::{ColonizationMessage, MessageBody};

        let config = EngineConfig::default();
        let mut state = duel(&config, 0);
        let before = world_hash(&state.world);
        state.world.send_message(
            state.attacker,
            10,
            "Colonization",
            MessageBody::Colonization(ColonizationMessage {
                coords: crate::fixtures::DEFENDER_SLOT,
                success: false,
            }),
        );
        assert_ne!(world_hash(&state.world), before);
    }
}
