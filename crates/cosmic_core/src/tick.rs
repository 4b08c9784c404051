//! One player's reconciliation pass.
//!
//! A pass is three steps run in order for a single player: resolve due
//! missions, advance every owned planet, refresh the score. The caller is
//! responsible for making sure no other pass touches the same player at the
//! same time.

use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::config::EngineConfig;
use crate::error::{GameError, Result};
use crate::mission::{MissionEngine, MissionReport};
use crate::model::{PlanetId, PlayerId, Timestamp};
use crate::points::player_points;
use crate::queue::QueueEngine;
use crate::world::World;

/// Outcome of advancing a player's planets.
#[derive(Debug, Default)]
pub struct PlanetReport {
    /// Planets brought up to date.
    pub advanced: Vec<PlanetId>,
    /// Planets left untouched this pass.
    pub skipped: Vec<(PlanetId, GameError)>,
}

/// Outcome of a full pass.
#[derive(Debug, Default)]
pub struct PassReport {
    /// Mission step.
    pub missions: MissionReport,
    /// Planet step.
    pub planets: PlanetReport,
    /// Score after the pass.
    pub points: f64,
}

impl PassReport {
    /// Number of records skipped because of data-integrity errors.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.missions.skipped.len() + self.planets.skipped.len()
    }
}

/// Apply every due mission transition of `player`.
pub fn resolve_missions(
    catalog: &Catalog,
    config: &EngineConfig,
    world: &mut World,
    player: PlayerId,
    now: Timestamp,
) -> MissionReport {
    let report = MissionEngine::new(catalog, config).process_due(world, player, now);
    for (mission, err) in &report.skipped {
        warn!(player = %player, mission = %mission, error = %err, "mission skipped");
    }
    report
}

/// Advance every planet of `player` to `now`. A failing planet is left
/// as it was and the others continue.
pub fn advance_planets(
    catalog: &Catalog,
    config: &EngineConfig,
    world: &mut World,
    player: PlayerId,
    now: Timestamp,
) -> Result<PlanetReport> {
    let engine = QueueEngine::new(catalog, config);
    let colonies = world.colony_count(player);
    let mut report = PlanetReport::default();

    for planet_id in world.planet_ids_of(player) {
        let owner = world
            .players
            .get_mut(&player)
            .ok_or(GameError::PlayerNotFound(player))?;
        let Some(planet) = world.planets.get_mut(&planet_id) else {
            continue;
        };
        match engine.advance(planet, owner, colonies, now) {
            Ok(advance) => {
                if !advance.completed.is_empty() {
                    debug!(
                        planet = %planet_id,
                        completed = advance.completed.len(),
                        "planet advanced"
                    );
                }
                report.advanced.push(planet_id);
            }
            Err(err) => {
                warn!(planet = %planet_id, error = %err, "planet skipped");
                report.skipped.push((planet_id, err));
            }
        }
    }
    Ok(report)
}

/// Recompute the score of `player` and stamp its activity time.
pub fn refresh_score(
    catalog: &Catalog,
    world: &mut World,
    player: PlayerId,
    now: Timestamp,
) -> Result<f64> {
    let points = player_points(catalog, world.player(player)?, world.planets_of(player))?;
    let record = world.player_mut(player)?;
    record.points = points;
    record.last_activity = now;
    Ok(points)
}

/// Run a full pass for `player`.
///
/// Fails only when the player does not exist or the score cannot be
/// computed; individual missions and planets fail in isolation.
pub fn run_pass(
    catalog: &Catalog,
    config: &EngineConfig,
    world: &mut World,
    player: PlayerId,
    now: Timestamp,
) -> Result<PassReport> {
    world.player(player)?;
    let missions = resolve_missions(catalog, config, world, player, now);
    let planets = advance_planets(catalog, config, world, player, now)?;
    let points = refresh_score(catalog, world, player, now)?;
    debug!(
        player = %player,
        now,
        arrived = missions.arrived.len(),
        returned = missions.returned.len(),
        planets = planets.advanced.len(),
        points,
        "pass complete"
    );
    Ok(PassReport {
        missions,
        planets,
        points,
    })
}
