//! Ordered per-object counters (fleets, defenses, levels).

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::{DefenseType, ShipType};

/// Unit counts keyed by object type.
///
/// Backed by a `BTreeMap` so iteration follows the enum declaration order,
/// which makes combat encounter order and report layout deterministic.
/// Zero entries are never stored, including ones read from the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UnitCounts<K: Ord>(BTreeMap<K, u64>);

/// Ships by type.
pub type Fleet = UnitCounts<ShipType>;

/// Defenses by type.
pub type Defenses = UnitCounts<DefenseType>;

impl<K: Ord> Default for UnitCounts<K> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<K: Ord + Copy> UnitCounts<K> {
    /// Create an empty set of counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count of one type (0 if absent).
    #[must_use]
    pub fn get(&self, key: K) -> u64 {
        self.0.get(&key).copied().unwrap_or(0)
    }

    /// Overwrite the count of one type.
    pub fn set(&mut self, key: K, count: u64) {
        if count == 0 {
            self.0.remove(&key);
        } else {
            self.0.insert(key, count);
        }
    }

    /// Increase the count of one type.
    pub fn add(&mut self, key: K, count: u64) {
        let next = self.get(key).saturating_add(count);
        self.set(key, next);
    }

    /// Decrease the count of one type, saturating at zero.
    pub fn remove(&mut self, key: K, count: u64) {
        let next = self.get(key).saturating_sub(count);
        self.set(key, next);
    }

    /// Add every count from `other`.
    pub fn merge(&mut self, other: &Self) {
        for (key, count) in other.iter() {
            self.add(key, count);
        }
    }

    /// Iterate `(type, count)` pairs with non-zero counts in key order.
    pub fn iter(&self) -> impl Iterator<Item = (K, u64)> + '_ {
        self.0.iter().map(|(&key, &count)| (key, count))
    }

    /// Total number of units.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    /// Whether no units are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Ord + Copy> FromIterator<(K, u64)> for UnitCounts<K> {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        let mut counts = Self::new();
        for (key, count) in iter {
            counts.add(key, count);
        }
        counts
    }
}

impl<'de, K: Ord + Deserialize<'de>> Deserialize<'de> for UnitCounts<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut counts = BTreeMap::<K, u64>::deserialize(deserializer)?;
        counts.retain(|_, count| *count > 0);
        Ok(Self(counts))
    }
}

/// Levels keyed by building, research or ship type. Absent means level 0.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Levels<K: Ord>(BTreeMap<K, u32>);

impl<K: Ord> Default for Levels<K> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<K: Ord + Copy> Levels<K> {
    /// All levels at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Level of one object (0 if absent).
    #[must_use]
    pub fn get(&self, key: K) -> u32 {
        self.0.get(&key).copied().unwrap_or(0)
    }

    /// Overwrite the level of one object.
    pub fn set(&mut self, key: K, level: u32) {
        if level == 0 {
            self.0.remove(&key);
        } else {
            self.0.insert(key, level);
        }
    }

    /// Iterate `(object, level)` pairs above level 0.
    pub fn iter(&self) -> impl Iterator<Item = (K, u32)> + '_ {
        self.0.iter().map(|(&key, &level)| (key, level))
    }
}

impl<K: Ord + Copy> FromIterator<(K, u32)> for Levels<K> {
    fn from_iter<I: IntoIterator<Item = (K, u32)>>(iter: I) -> Self {
        let mut levels = Self::new();
        for (key, level) in iter {
            levels.set(key, level);
        }
        levels
    }
}

impl<'de, K: Ord + Deserialize<'de>> Deserialize<'de> for Levels<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut levels = BTreeMap::<K, u32>::deserialize(deserializer)?;
        levels.retain(|_, level| *level > 0);
        Ok(Self(levels))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_counts_are_not_stored() {
        let mut fleet = Fleet::new();
        fleet.add(ShipType::Cruiser, 3);
        fleet.remove(ShipType::Cruiser, 5);
        assert!(fleet.is_empty());
        assert_eq!(fleet.get(ShipType::Cruiser), 0);
    }

    #[test]
    fn test_iteration_follows_declaration_order() {
        let fleet: Fleet = [(ShipType::Deathstar, 1), (ShipType::LightFighter, 2)]
            .into_iter()
            .collect();
        let order: Vec<_> = fleet.iter().map(|(ship, _)| ship).collect();
        assert_eq!(order, vec![ShipType::LightFighter, ShipType::Deathstar]);
        assert_eq!(fleet.total(), 3);
    }

    #[test]
    fn test_zero_entries_are_dropped_on_read() {
        let fleet: Fleet =
            serde_json::from_str(r#"{"LIGHT_FIGHTER":5,"DEATHSTAR":0}"#).unwrap();
        assert_eq!(fleet.iter().collect::<Vec<_>>(), vec![(ShipType::LightFighter, 5)]);

        let empty: Fleet = serde_json::from_str(r#"{"DEATHSTAR":0}"#).unwrap();
        assert!(empty.is_empty());

        let levels: Levels<ShipType> =
            serde_json::from_str(r#"{"CRUISER":0,"BATTLESHIP":2}"#).unwrap();
        assert_eq!(levels.iter().collect::<Vec<_>>(), vec![(ShipType::Battleship, 2)]);
    }
}
