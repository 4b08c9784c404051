//! Galaxy coordinates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::config::GalaxyBounds;
use crate::error::{GameError, Result};

/// A planet slot: `galaxy:system:position`.
///
/// Coordinates are globally unique; at most one planet occupies a slot.
/// Serialized as the `"g:s:p"` string clients display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coordinates {
    /// Galaxy number (1-based).
    pub galaxy: u32,
    /// Solar system within the galaxy (1-based).
    pub system: u32,
    /// Orbital position within the system (1-based).
    pub position: u32,
}

impl Coordinates {
    /// Create new coordinates without bounds checking.
    #[must_use]
    pub const fn new(galaxy: u32, system: u32, position: u32) -> Self {
        Self {
            galaxy,
            system,
            position,
        }
    }

    /// Check these coordinates against the configured galaxy bounds.
    pub fn validate(self, bounds: &GalaxyBounds) -> Result<Self> {
        let in_range = (1..=bounds.galaxies).contains(&self.galaxy)
            && (1..=bounds.systems_per_galaxy).contains(&self.system)
            && (1..=bounds.positions_per_system).contains(&self.position);
        if in_range {
            Ok(self)
        } else {
            Err(GameError::CoordinatesOutOfRange(self))
        }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.galaxy, self.system, self.position)
    }
}

impl FromStr for Coordinates {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || GameError::MalformedCoordinates(s.to_string());
        let mut parts = s.split(':').map(|part| part.trim().parse::<u32>());
        let (Some(Ok(galaxy)), Some(Ok(system)), Some(Ok(position)), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };
        Ok(Self::new(galaxy, system, position))
    }
}

impl Serialize for Coordinates {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Coordinates {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
