//! Identifiers of buildable and researchable objects.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

macro_rules! object_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Wire name of this object.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = GameError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(GameError::UnknownObject(other.to_string())),
                }
            }
        }
    };
}

object_enum!(
    /// Per-planet buildings.
    BuildingType {
        /// Produces metal.
        MetalMine => "METAL_MINE",
        /// Produces crystal.
        CrystalMine => "CRYSTAL_MINE",
        /// Produces deuterium.
        DeuteriumSynthesizer => "DEUTERIUM_SYNTHESIZER",
        /// Produces energy.
        SolarPlant => "SOLAR_PLANT",
        /// Unlocks research.
        ResearchLab => "RESEARCH_LAB",
        /// Unlocks ships and defenses.
        Shipyard => "SHIPYARD",
        /// Raises metal capacity.
        MetalStorage => "METAL_STORAGE",
        /// Raises crystal capacity.
        CrystalStorage => "CRYSTAL_STORAGE",
        /// Raises deuterium capacity.
        DeuteriumTank => "DEUTERIUM_TANK",
        /// Trading post; its rules live with the merchant collaborator.
        BlackMarket => "BLACK_MARKET",
    }
);

object_enum!(
    /// Player-wide technologies.
    ResearchType {
        /// Energy technology.
        EnergyTechnology => "ENERGY_TECHNOLOGY",
        /// Computer technology.
        ComputerTechnology => "COMPUTER_TECHNOLOGY",
        /// +10% attack per level.
        WeaponTechnology => "WEAPON_TECHNOLOGY",
        /// Combustion drive, +10% speed per level.
        CombustionDrive => "COMBUSTION_DRIVE",
        /// Espionage technology.
        SpyTechnology => "SPY_TECHNOLOGY",
        /// Impulse drive, +20% speed per level.
        ImpulseDrive => "IMPULSE_DRIVE",
        /// Laser technology.
        LaserTechnology => "LASER_TECHNOLOGY",
        /// Ion technology.
        IonTechnology => "ION_TECHNOLOGY",
        /// Plasma technology.
        PlasmaTechnology => "PLASMA_TECHNOLOGY",
        /// +10% hull per level.
        ArmorTechnology => "ARMOR_TECHNOLOGY",
        /// +10% shield per level.
        ShieldingTechnology => "SHIELDING_TECHNOLOGY",
        /// Hyperspace drive, +30% speed per level.
        HyperspaceDrive => "HYPERSPACE_DRIVE",
        /// One colony slot per level.
        Astrophysics => "ASTROPHYSICS",
        /// Graviton technology.
        GravitonTechnology => "GRAVITON_TECHNOLOGY",
        /// AI technology.
        AiTechnology => "AI_TECHNOLOGY",
    }
);

object_enum!(
    /// Ship classes.
    ShipType {
        /// Light fighter.
        LightFighter => "LIGHT_FIGHTER",
        /// Medium fighter.
        MediumFighter => "MEDIUM_FIGHTER",
        /// Heavy fighter.
        HeavyFighter => "HEAVY_FIGHTER",
        /// Small cargo.
        CargoShip => "CARGO_SHIP",
        /// Medium cargo.
        MediumCargoShip => "MEDIUM_CARGO_SHIP",
        /// Large cargo.
        HeavyCargoShip => "HEAVY_CARGO_SHIP",
        /// Espionage probe.
        SpyProbe => "SPY_PROBE",
        /// Debris harvester.
        Recycler => "RECYCLER",
        /// Cruiser.
        Cruiser => "CRUISER",
        /// Battleship.
        Battleship => "BATTLESHIP",
        /// Destroyer.
        Destroyer => "DESTROYER",
        /// Bomber.
        Bomber => "BOMBER",
        /// Colony ship.
        ColonyShip => "COLONY_SHIP",
        /// Research vessel.
        ResearchVessel => "RESEARCH_VESSEL",
        /// Battlecruiser.
        Battlecruiser => "BATTLECRUISER",
        /// Deathstar.
        Deathstar => "DEATHSTAR",
    }
);

object_enum!(
    /// Stationary planetary defenses.
    DefenseType {
        /// Rocket launcher.
        RocketLauncher => "ROCKET_LAUNCHER",
        /// Light laser cannon.
        LightLaserCannon => "LIGHT_LASER_CANNON",
        /// Heavy laser cannon.
        HeavyLaserCannon => "HEAVY_LASER_CANNON",
        /// Ion cannon.
        IonCannon => "ION_CANNON",
        /// Plasma turret.
        PlasmaTurret => "PLASMA_TURRET",
    }
);

/// Category of a catalog object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// Planet building.
    Building,
    /// Player research.
    Research,
    /// Ship class.
    Ship,
    /// Planetary defense.
    Defense,
}

/// Any catalog object id.
///
/// Serialized as the bare wire name (e.g. `"METAL_MINE"`), which is unique
/// across all categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObjectId {
    /// A building.
    Building(BuildingType),
    /// A research.
    Research(ResearchType),
    /// A ship.
    Ship(ShipType),
    /// A defense.
    Defense(DefenseType),
}

impl ObjectId {
    /// Category of this object.
    #[must_use]
    pub const fn kind(self) -> ObjectKind {
        match self {
            Self::Building(_) => ObjectKind::Building,
            Self::Research(_) => ObjectKind::Research,
            Self::Ship(_) => ObjectKind::Ship,
            Self::Defense(_) => ObjectKind::Defense,
        }
    }

    /// Wire name of this object.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Building(id) => id.as_str(),
            Self::Research(id) => id.as_str(),
            Self::Ship(id) => id.as_str(),
            Self::Defense(id) => id.as_str(),
        }
    }

    /// Every object id, buildings first.
    pub fn all() -> impl Iterator<Item = Self> {
        BuildingType::ALL
            .iter()
            .copied()
            .map(Self::Building)
            .chain(ResearchType::ALL.iter().copied().map(Self::Research))
            .chain(ShipType::ALL.iter().copied().map(Self::Ship))
            .chain(DefenseType::ALL.iter().copied().map(Self::Defense))
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectId {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse()
            .map(Self::Building)
            .or_else(|_| s.parse().map(Self::Research))
            .or_else(|_| s.parse().map(Self::Ship))
            .or_else(|_| s.parse().map(Self::Defense))
    }
}

impl From<BuildingType> for ObjectId {
    fn from(id: BuildingType) -> Self {
        Self::Building(id)
    }
}

impl From<ResearchType> for ObjectId {
    fn from(id: ResearchType) -> Self {
        Self::Research(id)
    }
}

impl From<ShipType> for ObjectId {
    fn from(id: ShipType) -> Self {
        Self::Ship(id)
    }
}

impl From<DefenseType> for ObjectId {
    fn from(id: DefenseType) -> Self {
        Self::Defense(id)
    }
}
