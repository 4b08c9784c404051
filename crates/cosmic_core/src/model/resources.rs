//! Resource amounts.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// One of the three stockpiled resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Metal.
    Metal,
    /// Crystal.
    Crystal,
    /// Deuterium, also used as fuel.
    Deuterium,
}

impl ResourceKind {
    /// All resource kinds in allocation order (metal first).
    pub const ALL: [Self; 3] = [Self::Metal, Self::Crystal, Self::Deuterium];
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Metal => "metal",
            Self::Crystal => "crystal",
            Self::Deuterium => "deuterium",
        })
    }
}

/// A bundle of metal, crystal and deuterium.
///
/// Amounts are whole resource units stored as floating point; accrual
/// produces fractional values between passes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Resources {
    /// Metal amount.
    pub metal: f64,
    /// Crystal amount.
    pub crystal: f64,
    /// Deuterium amount.
    pub deuterium: f64,
}

impl Resources {
    /// No resources.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Create a new resource bundle.
    #[must_use]
    pub const fn new(metal: f64, crystal: f64, deuterium: f64) -> Self {
        Self {
            metal,
            crystal,
            deuterium,
        }
    }

    /// Amount of one resource.
    #[must_use]
    pub const fn get(&self, kind: ResourceKind) -> f64 {
        match kind {
            ResourceKind::Metal => self.metal,
            ResourceKind::Crystal => self.crystal,
            ResourceKind::Deuterium => self.deuterium,
        }
    }

    /// Mutable access to one resource.
    pub fn get_mut(&mut self, kind: ResourceKind) -> &mut f64 {
        match kind {
            ResourceKind::Metal => &mut self.metal,
            ResourceKind::Crystal => &mut self.crystal,
            ResourceKind::Deuterium => &mut self.deuterium,
        }
    }

    /// Sum of all three resources, used for point and build-time formulas.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.metal + self.crystal + self.deuterium
    }

    /// First resource this bundle cannot cover, as `(kind, required, available)`.
    #[must_use]
    pub fn shortfall(&self, cost: &Self) -> Option<(ResourceKind, f64, f64)> {
        ResourceKind::ALL
            .into_iter()
            .find(|&kind| self.get(kind) < cost.get(kind))
            .map(|kind| (kind, cost.get(kind), self.get(kind)))
    }

    /// Whether every resource covers the cost.
    #[must_use]
    pub fn covers(&self, cost: &Self) -> bool {
        self.shortfall(cost).is_none()
    }

    /// Add `gain` to each resource without crossing `capacity`.
    ///
    /// A stock already above capacity (e.g. after storage was lost) is left
    /// untouched rather than reduced. Amounts never go negative.
    pub fn credit_capped(&mut self, gain: &Self, capacity: &Self) {
        for kind in ResourceKind::ALL {
            let current = self.get(kind);
            let cap = capacity.get(kind);
            let next = if current >= cap {
                current
            } else {
                (current + gain.get(kind)).min(cap)
            };
            *self.get_mut(kind) = next.max(0.0);
        }
    }
}

impl Add for Resources {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(
            self.metal + rhs.metal,
            self.crystal + rhs.crystal,
            self.deuterium + rhs.deuterium,
        )
    }
}

impl AddAssign for Resources {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Resources {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(
            self.metal - rhs.metal,
            self.crystal - rhs.crystal,
            self.deuterium - rhs.deuterium,
        )
    }
}

impl SubAssign for Resources {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul<f64> for Resources {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.metal * rhs, self.crystal * rhs, self.deuterium * rhs)
    }
}
