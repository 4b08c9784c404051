//! Error types for the empire simulation.
//!
//! Errors fall into three families that callers treat differently:
//!
//! - **Validation** errors are raised before any mutation and are surfaced
//!   verbatim to the player (not enough metal, unknown object, no drive...).
//! - **Data integrity** errors mean a record is inconsistent. The affected
//!   record is skipped for the current pass; the rest of the pass continues.
//! - **Concurrency conflicts** mean another pass holds the player. The pass is
//!   retried once and otherwise deferred to the next sweep.

use thiserror::Error;

use crate::model::{
    Coordinates, MissionId, ObjectId, PlanetId, PlayerId, QueueKind, ResourceKind, ShipType,
};

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Coarse classification of a [`GameError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Rejected before any mutation; fully recoverable.
    Validation,
    /// A record is missing or inconsistent; skip it for this pass.
    DataIntegrity,
    /// Another pass currently owns the player.
    ConcurrencyConflict,
}

/// Top-level error type for all simulation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    /// Not enough of a resource to pay for an order.
    #[error("Insufficient resources: need {required:.0} {resource}, have {available:.0}")]
    InsufficientResources {
        /// Resource that ran short.
        resource: ResourceKind,
        /// Amount required.
        required: f64,
        /// Amount available.
        available: f64,
    },

    /// A building or research prerequisite is below the required level.
    #[error("Requirement not met for {object}: {requirement} level {required} (have {current})")]
    RequirementsNotMet {
        /// Object being ordered.
        object: ObjectId,
        /// The prerequisite that is missing.
        requirement: ObjectId,
        /// Level required.
        required: u32,
        /// Level currently reached.
        current: u32,
    },

    /// The object id is not present in the catalog.
    #[error("Unknown object: {0}")]
    UnknownObject(String),

    /// The queue kind does not match the object (e.g. research on a ship id).
    #[error("{object} cannot be queued as {kind}")]
    InvalidQueueKind {
        /// Object being ordered.
        object: ObjectId,
        /// Requested queue kind.
        kind: QueueKind,
    },

    /// Ship/defense orders need a positive amount.
    #[error("Invalid amount {0}: must be at least 1")]
    InvalidAmount(u64),

    /// The origin planet does not hold enough ships of a type.
    #[error("Insufficient ships: need {required} {ship}, have {available}")]
    InsufficientShips {
        /// Ship type that ran short.
        ship: ShipType,
        /// Number requested.
        required: u64,
        /// Number stationed on the planet.
        available: u64,
    },

    /// No ships were selected for the mission.
    #[error("Fleet is empty")]
    EmptyFleet,

    /// The fleet has no ship with a drive, so it cannot move.
    #[error("Fleet has no drive")]
    NoDrive,

    /// Not enough deuterium to fuel the flight.
    #[error("Insufficient fuel: need {required:.0} deuterium, have {available:.0}")]
    InsufficientFuel {
        /// Deuterium required.
        required: f64,
        /// Deuterium available.
        available: f64,
    },

    /// A coordinate string could not be parsed.
    #[error("Malformed coordinates: '{0}'")]
    MalformedCoordinates(String),

    /// Coordinates parse but lie outside the galaxy bounds.
    #[error("Coordinates out of range: {0}")]
    CoordinatesOutOfRange(Coordinates),

    /// Another planet already occupies the slot.
    #[error("Slot {0} is occupied")]
    SlotOccupied(Coordinates),

    /// Referenced player does not exist.
    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerId),

    /// Referenced planet does not exist.
    #[error("Planet not found: {0}")]
    PlanetNotFound(PlanetId),

    /// The planet exists but belongs to another player.
    #[error("Planet {planet} is not owned by player {player}")]
    NotPlanetOwner {
        /// Planet referenced.
        planet: PlanetId,
        /// Player making the request.
        player: PlayerId,
    },

    /// Referenced mission does not exist.
    #[error("Mission not found: {0}")]
    MissionNotFound(MissionId),

    /// A stored queue item pairs an object with the wrong queue kind.
    #[error("Corrupt queue item: {object} as {kind}")]
    CorruptQueueItem {
        /// Object in the item.
        object: ObjectId,
        /// Kind recorded on the item.
        kind: QueueKind,
    },

    /// A queued or stored object id has no catalog entry.
    #[error("Missing catalog entry: {0}")]
    MissingCatalogEntry(ObjectId),

    /// Another reconciliation pass currently owns the player.
    #[error("Player {0} is locked by another pass")]
    ConcurrencyConflict(PlayerId),
}

impl GameError {
    /// Classify this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InsufficientResources { .. }
            | Self::RequirementsNotMet { .. }
            | Self::UnknownObject(_)
            | Self::InvalidQueueKind { .. }
            | Self::InvalidAmount(_)
            | Self::InsufficientShips { .. }
            | Self::EmptyFleet
            | Self::NoDrive
            | Self::InsufficientFuel { .. }
            | Self::MalformedCoordinates(_)
            | Self::CoordinatesOutOfRange(_)
            | Self::SlotOccupied(_)
            | Self::NotPlanetOwner { .. } => ErrorKind::Validation,
            Self::PlayerNotFound(_)
            | Self::PlanetNotFound(_)
            | Self::MissionNotFound(_)
            | Self::CorruptQueueItem { .. }
            | Self::MissingCatalogEntry(_) => ErrorKind::DataIntegrity,
            Self::ConcurrencyConflict(_) => ErrorKind::ConcurrencyConflict,
        }
    }

    /// Whether this error was raised before any mutation.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self.kind(), ErrorKind::Validation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert_eq!(GameError::NoDrive.kind(), ErrorKind::Validation);
        assert_eq!(
            GameError::PlanetNotFound(PlanetId(3)).kind(),
            ErrorKind::DataIntegrity
        );
        assert_eq!(
            GameError::ConcurrencyConflict(PlayerId(1)).kind(),
            ErrorKind::ConcurrencyConflict
        );
        assert!(GameError::InvalidAmount(0).is_validation());
    }

    #[test]
    fn test_error_messages() {
        let err = GameError::InsufficientFuel {
            required: 12.0,
            available: 0.0,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient fuel: need 12 deuterium, have 0"
        );
    }
}
