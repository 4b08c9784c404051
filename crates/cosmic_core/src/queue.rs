//! Construction queue advancement and enqueue planning.
//!
//! A queue is a list of orders with precomputed completion times. Nothing
//! ticks: [`QueueEngine::advance`] looks at the clock, credits the resources
//! produced since the last pass and applies every order whose `end_time`
//! has passed.

use tracing::debug;

use crate::catalog::{Catalog, Requirements};
use crate::config::EngineConfig;
use crate::error::{GameError, Result};
use crate::model::{
    ObjectId, Planet, Player, QueueItem, QueueKind, Resources, Timestamp,
};
use crate::production::{ProductionCalculator, ProductionContext};

const SECS_PER_HOUR: f64 = 3600.0;

/// What one [`QueueEngine::advance`] call changed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AdvanceReport {
    /// Resources credited (after the capacity clamp).
    pub accrued: Resources,
    /// Items applied, in completion order.
    pub completed: Vec<QueueItem>,
}

/// An order to add to a queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnqueueRequest {
    /// Object to build or research.
    pub object_id: ObjectId,
    /// Queue kind.
    pub kind: QueueKind,
    /// Units to produce; ignored for level kinds.
    pub amount: u64,
}

impl EnqueueRequest {
    /// Request the next level of a building, research or ship upgrade.
    #[must_use]
    pub fn level(object_id: impl Into<ObjectId>, kind: QueueKind) -> Self {
        Self {
            object_id: object_id.into(),
            kind,
            amount: 1,
        }
    }

    /// Request `amount` ships or defenses.
    #[must_use]
    pub fn units(object_id: impl Into<ObjectId>, amount: u64) -> Self {
        let object_id = object_id.into();
        let kind = match object_id {
            ObjectId::Defense(_) => QueueKind::Defense,
            _ => QueueKind::Ship,
        };
        Self {
            object_id,
            kind,
            amount,
        }
    }
}

/// A validated order, ready to be committed.
#[derive(Debug, Clone, PartialEq)]
pub struct QueuePlan {
    /// The item to append.
    pub item: QueueItem,
    /// Resources to debit.
    pub cost: Resources,
}

/// Advances queues and plans new orders.
#[derive(Debug, Clone, Copy)]
pub struct QueueEngine<'a> {
    catalog: &'a Catalog,
    config: &'a EngineConfig,
}

impl<'a> QueueEngine<'a> {
    /// Create a queue engine.
    #[must_use]
    pub const fn new(catalog: &'a Catalog, config: &'a EngineConfig) -> Self {
        Self { catalog, config }
    }

    /// Bring a planet up to `now`.
    ///
    /// Does nothing when less than one second has elapsed. Otherwise credits
    /// production (clamped to capacity), applies completed items in FIFO
    /// order and sets `last_resource_update` to `now`. A corrupt completed
    /// item fails the call before anything is mutated.
    pub fn advance(
        &self,
        planet: &mut Planet,
        owner: &mut Player,
        colony_count: usize,
        now: Timestamp,
    ) -> Result<AdvanceReport> {
        let elapsed = now.saturating_sub(planet.last_resource_update);
        if elapsed < 1 {
            return Ok(AdvanceReport::default());
        }

        let mut completed = Vec::new();
        let mut remaining = Vec::new();
        for item in &planet.build_queue {
            check_item(item)?;
            if item.is_complete(now) {
                completed.push(item.clone());
            } else {
                remaining.push(item.clone());
            }
        }

        let calc = ProductionCalculator::new(self.catalog, self.config);
        let production = calc.hourly(
            &planet.buildings,
            &ProductionContext {
                vein: &owner.resource_vein_bonus,
                boosts: &owner.active_boosts,
                colony_count,
                is_homeworld: planet.is_homeworld,
                now,
            },
        );
        let capacity = calc.capacity(&planet.buildings);
        let gain = production.hourly * (elapsed as f64 / SECS_PER_HOUR);
        let before = planet.resources;
        planet.resources.credit_capped(&gain, &capacity);

        for item in &completed {
            apply_item(planet, owner, item);
            debug!(
                planet = %planet.id,
                object = %item.object_id,
                kind = %item.kind,
                value = item.target_level_or_amount,
                "queue item completed"
            );
        }
        planet.build_queue = remaining;
        planet.last_resource_update = now;

        Ok(AdvanceReport {
            accrued: planet.resources - before,
            completed,
        })
    }

    /// Validate an order and compute its cost and timing.
    ///
    /// `owner_planets` are all planets of the owner (the target planet may be
    /// among them); their queues count toward pending research and upgrade
    /// levels.
    pub fn plan(
        &self,
        planet: &Planet,
        owner: &Player,
        owner_planets: &[&Planet],
        request: EnqueueRequest,
        now: Timestamp,
    ) -> Result<QueuePlan> {
        let EnqueueRequest {
            object_id,
            kind,
            amount,
        } = request;

        let object = self.catalog.require(object_id)?;
        let kind_matches = matches!(
            (kind, object_id),
            (QueueKind::Building, ObjectId::Building(_))
                | (QueueKind::Research, ObjectId::Research(_))
                | (QueueKind::Ship | QueueKind::ShipUpgrade, ObjectId::Ship(_))
                | (QueueKind::Defense, ObjectId::Defense(_))
        );
        if !kind_matches {
            return Err(GameError::InvalidQueueKind {
                object: object_id,
                kind,
            });
        }
        if !kind.is_level() && amount == 0 {
            return Err(GameError::InvalidAmount(amount));
        }

        check_requirements(object_id, object.requirements(), planet, owner)?;

        let (cost, build_time, value) = if kind.is_level() {
            let level = next_level(planet, owner, owner_planets, object_id, kind);
            let (cost, time) = match (kind, object_id) {
                (QueueKind::ShipUpgrade, ObjectId::Ship(ship)) => {
                    let spec = self.catalog.ship(ship)?;
                    (spec.upgrade_cost(level), spec.upgrade_time(level))
                }
                _ => (object.cost(level), object.build_time(level)),
            };
            (cost, time, u64::from(level))
        } else {
            let cost = object.cost(1) * amount as f64;
            let time = object.build_time(1).saturating_mul(amount);
            (cost, time, amount)
        };

        if let Some((resource, required, available)) = planet.resources.shortfall(&cost) {
            return Err(GameError::InsufficientResources {
                resource,
                required,
                available,
            });
        }

        let start_time = planet.queue_end().map_or(now, |end| end.max(now));
        Ok(QueuePlan {
            item: QueueItem {
                object_id,
                kind,
                target_level_or_amount: value,
                build_time,
                start_time,
                end_time: start_time + build_time,
            },
            cost,
        })
    }
}

/// Debit a planned order and append it. The two effects happen together.
pub fn commit(planet: &mut Planet, plan: QueuePlan) -> QueueItem {
    planet.resources -= plan.cost;
    planet.build_queue.push(plan.item.clone());
    plan.item
}

fn check_item(item: &QueueItem) -> Result<()> {
    let valid = matches!(
        (item.kind, item.object_id),
        (QueueKind::Building, ObjectId::Building(_))
            | (QueueKind::Research, ObjectId::Research(_))
            | (QueueKind::Ship | QueueKind::ShipUpgrade, ObjectId::Ship(_))
            | (QueueKind::Defense, ObjectId::Defense(_))
    );
    if valid {
        Ok(())
    } else {
        Err(GameError::CorruptQueueItem {
            object: item.object_id,
            kind: item.kind,
        })
    }
}

fn apply_item(planet: &mut Planet, owner: &mut Player, item: &QueueItem) {
    let value = item.target_level_or_amount;
    let level = u32::try_from(value).unwrap_or(u32::MAX);
    match (item.kind, item.object_id) {
        (QueueKind::Building, ObjectId::Building(ty)) => planet.buildings.set(ty, level),
        (QueueKind::Research, ObjectId::Research(ty)) => owner.research.set(ty, level),
        (QueueKind::ShipUpgrade, ObjectId::Ship(ty)) => owner.ship_levels.set(ty, level),
        (QueueKind::Ship, ObjectId::Ship(ty)) => planet.fleet.add(ty, value),
        (QueueKind::Defense, ObjectId::Defense(ty)) => planet.defenses.add(ty, value),
        _ => {}
    }
}

fn check_requirements(
    object: ObjectId,
    requirements: &Requirements,
    planet: &Planet,
    owner: &Player,
) -> Result<()> {
    let buildings = requirements
        .buildings
        .iter()
        .map(|(&ty, &required)| (ObjectId::from(ty), required, planet.buildings.get(ty)));
    let research = requirements
        .research
        .iter()
        .map(|(&ty, &required)| (ObjectId::from(ty), required, owner.research.get(ty)));

    match buildings
        .chain(research)
        .find(|&(_, required, current)| current < required)
    {
        Some((requirement, required, current)) => Err(GameError::RequirementsNotMet {
            object,
            requirement,
            required,
            current,
        }),
        None => Ok(()),
    }
}

/// Level the next order for a level-kind object will reach.
fn next_level(
    planet: &Planet,
    owner: &Player,
    owner_planets: &[&Planet],
    object_id: ObjectId,
    kind: QueueKind,
) -> u32 {
    let (current, pending) = match object_id {
        ObjectId::Building(ty) => (
            planet.buildings.get(ty),
            planet.pending_level(object_id, kind),
        ),
        ObjectId::Research(ty) => (
            owner.research.get(ty),
            pending_anywhere(planet, owner_planets, object_id, kind),
        ),
        ObjectId::Ship(ty) => (
            owner.ship_levels.get(ty),
            pending_anywhere(planet, owner_planets, object_id, kind),
        ),
        ObjectId::Defense(_) => (0, None),
    };
    current.max(pending.unwrap_or(0)).saturating_add(1)
}

fn pending_anywhere(
    planet: &Planet,
    owner_planets: &[&Planet],
    object_id: ObjectId,
    kind: QueueKind,
) -> Option<u32> {
    owner_planets
        .iter()
        .filter(|other| other.id != planet.id)
        .chain(std::iter::once(&planet))
        .filter_map(|other| other.pending_level(object_id, kind))
        .max()
}
