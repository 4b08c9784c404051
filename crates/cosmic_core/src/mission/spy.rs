//! Espionage resolution.
//!
//! Detection only happens when the defender has ships stationed. A detected
//! mission loses probes and may return no data at all; otherwise the report
//! discloses more the further the attacker's spy technology leads.

use rand::Rng;

use crate::config::SpyModel;

/// What a spy mission learned, before the report is filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpyResolution {
    /// The defender noticed the probes.
    pub detected: bool,
    /// Probes shot down.
    pub probes_lost: u64,
    /// No data came back.
    pub failed: bool,
    /// Stockpile disclosed.
    pub resources: bool,
    /// Fleet disclosed (tech parity or better).
    pub fleet: bool,
    /// Defenses disclosed (+2).
    pub defenses: bool,
    /// Buildings disclosed (+4).
    pub buildings: bool,
    /// Research disclosed (+6).
    pub research: bool,
}

/// Chance the defender detects the probes.
#[must_use]
pub fn detection_chance(model: &SpyModel, level_diff: i64) -> f64 {
    (model.base_detection - level_diff as f64 * model.detection_per_level).max(model.min_detection)
}

/// Resolve one spy mission.
pub fn resolve_spy(
    model: &SpyModel,
    attacker_level: u32,
    defender_level: u32,
    defender_has_fleet: bool,
    rng: &mut impl Rng,
) -> SpyResolution {
    let diff = i64::from(attacker_level) - i64::from(defender_level);
    let mut resolution = SpyResolution::default();

    if defender_has_fleet && rng.gen::<f64>() < detection_chance(model, diff) {
        resolution.detected = true;
        resolution.probes_lost = model.probes_lost_on_detection;
        let survival = model.base_survival + diff as f64 * model.survival_per_level;
        if rng.gen::<f64>() > survival {
            resolution.failed = true;
            return resolution;
        }
    }

    resolution.resources = true;
    resolution.fleet = diff >= 0;
    resolution.defenses = diff >= 2;
    resolution.buildings = diff >= 4;
    resolution.research = diff >= 6;
    resolution
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_detection_chance_floor() {
        let model = SpyModel::default();
        assert!((detection_chance(&model, 0) - 0.5).abs() < 1e-12);
        assert!((detection_chance(&model, 2) - 0.3).abs() < 1e-12);
        assert!((detection_chance(&model, 10) - 0.1).abs() < 1e-12);
        assert!((detection_chance(&model, -3) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_undefended_planet_discloses_by_tier() {
        let model = SpyModel::default();
        let mut rng = StdRng::seed_from_u64(1);
        let parity = resolve_spy(&model, 3, 3, false, &mut rng);
        assert!(!parity.detected);
        assert!(parity.resources && parity.fleet);
        assert!(!parity.defenses);

        let far_ahead = resolve_spy(&model, 9, 3, false, &mut rng);
        assert!(far_ahead.defenses && far_ahead.buildings && far_ahead.research);

        let behind = resolve_spy(&model, 1, 3, false, &mut rng);
        assert!(behind.resources);
        assert!(!behind.fleet);
    }

    #[test]
    fn test_detection_costs_a_probe() {
        let model = SpyModel {
            min_detection: 1.0,
            ..SpyModel::default()
        };
        let mut rng = StdRng::seed_from_u64(99);
        let result = resolve_spy(&model, 0, 0, true, &mut rng);
        assert!(result.detected);
        assert_eq!(result.probes_lost, 1);
        assert_eq!(result.failed, !result.resources);
    }

    #[test]
    fn test_certain_failure_returns_nothing() {
        let model = SpyModel {
            min_detection: 1.0,
            base_survival: -1.0,
            survival_per_level: 0.0,
            ..SpyModel::default()
        };
        let mut rng = StdRng::seed_from_u64(5);
        let result = resolve_spy(&model, 8, 0, true, &mut rng);
        assert!(result.failed);
        assert!(!result.resources && !result.fleet && !result.research);
    }
}
