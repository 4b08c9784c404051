//! The live object table.

use super::{BuildingSpec, Catalog, CombatStats, DefenseSpec, DriveKind, Requirements};
use super::{ResearchSpec, ShipSpec};
use crate::model::{BuildingType as B, DefenseType as D, ResearchType as R, ShipType as S};
use crate::model::{ResourceKind, Resources};

const fn res(metal: f64, crystal: f64, deuterium: f64) -> Resources {
    Resources::new(metal, crystal, deuterium)
}

fn requires(buildings: &[(B, u32)], research: &[(R, u32)]) -> Requirements {
    Requirements {
        buildings: buildings.iter().copied().collect(),
        research: research.iter().copied().collect(),
    }
}

/// Ship row: cost, (attack, shield, hull), speed, cargo, drive, fuel.
#[allow(clippy::too_many_arguments)]
fn ship(
    name: &str,
    unit_cost: Resources,
    combat: (f64, f64, f64),
    speed: f64,
    cargo_capacity: f64,
    drive: DriveKind,
    fuel_consumption: f64,
    requirements: Requirements,
) -> ShipSpec {
    ShipSpec {
        name: name.to_string(),
        unit_cost,
        combat: CombatStats::new(combat.0, combat.1, combat.2),
        speed,
        cargo_capacity,
        drive,
        fuel_consumption,
        requirements,
    }
}

fn defense(
    name: &str,
    unit_cost: Resources,
    combat: (f64, f64, f64),
    requirements: Requirements,
) -> DefenseSpec {
    DefenseSpec {
        name: name.to_string(),
        unit_cost,
        combat: CombatStats::new(combat.0, combat.1, combat.2),
        requirements,
    }
}

impl Catalog {
    /// Build the live catalog.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            buildings: buildings(),
            research: research(),
            ships: ships(),
            defenses: defenses(),
        }
    }
}

fn buildings() -> std::collections::BTreeMap<B, BuildingSpec> {
    [
        (
            B::MetalMine,
            BuildingSpec::new("Metal Mine", res(60.0, 15.0, 0.0), 1.5)
                .with_production(ResourceKind::Metal, 30.0)
                .with_energy_demand(10.0),
        ),
        (
            B::CrystalMine,
            BuildingSpec::new("Crystal Mine", res(48.0, 24.0, 0.0), 1.6)
                .with_production(ResourceKind::Crystal, 20.0)
                .with_energy_demand(10.0),
        ),
        (
            B::DeuteriumSynthesizer,
            BuildingSpec::new("Deuterium Synthesizer", res(225.0, 75.0, 0.0), 1.5)
                .with_production(ResourceKind::Deuterium, 10.0)
                .with_energy_demand(20.0),
        ),
        (
            B::SolarPlant,
            BuildingSpec::new("Solar Plant", res(75.0, 30.0, 0.0), 1.5).with_energy_output(20.0),
        ),
        (
            B::ResearchLab,
            BuildingSpec::new("Research Lab", res(200.0, 400.0, 200.0), 2.0),
        ),
        (
            B::Shipyard,
            BuildingSpec::new("Shipyard", res(400.0, 200.0, 100.0), 2.0),
        ),
        (
            B::MetalStorage,
            BuildingSpec::new("Metal Storage", res(1000.0, 0.0, 0.0), 2.0)
                .with_storage(ResourceKind::Metal),
        ),
        (
            B::CrystalStorage,
            BuildingSpec::new("Crystal Storage", res(1000.0, 500.0, 0.0), 2.0)
                .with_storage(ResourceKind::Crystal),
        ),
        (
            B::DeuteriumTank,
            BuildingSpec::new("Deuterium Tank", res(1000.0, 1000.0, 0.0), 2.0)
                .with_storage(ResourceKind::Deuterium),
        ),
        (
            B::BlackMarket,
            BuildingSpec::new("Black Market", res(5000.0, 5000.0, 1000.0), 2.0)
                .requires_building(B::Shipyard, 1),
        ),
    ]
    .into_iter()
    .collect()
}

fn research() -> std::collections::BTreeMap<R, ResearchSpec> {
    [
        (
            R::EnergyTechnology,
            ResearchSpec::new("Energy Technology", res(0.0, 800.0, 400.0)).requires_lab(1),
        ),
        (
            R::ComputerTechnology,
            ResearchSpec::new("Computer Technology", res(0.0, 400.0, 600.0)).requires_lab(1),
        ),
        (
            R::WeaponTechnology,
            ResearchSpec::new("Weapon Technology", res(800.0, 200.0, 0.0)).requires_lab(4),
        ),
        (
            R::CombustionDrive,
            ResearchSpec::new("Combustion Drive", res(400.0, 0.0, 600.0))
                .requires_lab(1)
                .requires(R::EnergyTechnology, 1),
        ),
        (
            R::SpyTechnology,
            ResearchSpec::new("Espionage Technology", res(200.0, 1000.0, 200.0)).requires_lab(3),
        ),
        (
            R::ImpulseDrive,
            ResearchSpec::new("Impulse Drive", res(2000.0, 4000.0, 600.0))
                .requires_lab(2)
                .requires(R::EnergyTechnology, 1),
        ),
        (
            R::LaserTechnology,
            ResearchSpec::new("Laser Technology", res(200.0, 100.0, 0.0))
                .requires_lab(1)
                .requires(R::EnergyTechnology, 2),
        ),
        (
            R::IonTechnology,
            ResearchSpec::new("Ion Technology", res(1000.0, 300.0, 100.0))
                .requires_lab(4)
                .requires(R::LaserTechnology, 5)
                .requires(R::EnergyTechnology, 4),
        ),
        (
            R::PlasmaTechnology,
            ResearchSpec::new("Plasma Technology", res(2000.0, 4000.0, 1000.0))
                .requires_lab(4)
                .requires(R::EnergyTechnology, 8)
                .requires(R::LaserTechnology, 10)
                .requires(R::IonTechnology, 5),
        ),
        (
            R::ArmorTechnology,
            ResearchSpec::new("Armor Technology", res(1000.0, 0.0, 0.0)).requires_lab(2),
        ),
        (
            R::ShieldingTechnology,
            ResearchSpec::new("Shielding Technology", res(200.0, 600.0, 0.0))
                .requires_lab(6)
                .requires(R::EnergyTechnology, 3),
        ),
        (
            R::HyperspaceDrive,
            ResearchSpec::new("Hyperspace Drive", res(10_000.0, 20_000.0, 6_000.0))
                .requires_lab(7)
                .requires(R::EnergyTechnology, 5)
                .requires(R::ShieldingTechnology, 5),
        ),
        (
            R::Astrophysics,
            ResearchSpec::new("Astrophysics", res(4000.0, 8000.0, 4000.0))
                .with_factor(1.75)
                .requires_lab(3)
                .requires(R::SpyTechnology, 4)
                .requires(R::ImpulseDrive, 3),
        ),
        (
            R::GravitonTechnology,
            ResearchSpec::new("Graviton Technology", res(50_000.0, 100_000.0, 50_000.0))
                .with_factor(3.0)
                .requires_lab(12),
        ),
        (
            R::AiTechnology,
            ResearchSpec::new("AI Technology", res(5000.0, 10_000.0, 2000.0))
                .requires_lab(8)
                .requires(R::ComputerTechnology, 8),
        ),
    ]
    .into_iter()
    .collect()
}

fn ships() -> std::collections::BTreeMap<S, ShipSpec> {
    use DriveKind::{Combustion, Hyperspace, Impulse};
    [
        (
            S::LightFighter,
            ship(
                "Light Fighter",
                res(3000.0, 1000.0, 0.0),
                (50.0, 10.0, 400.0),
                12_500.0,
                50.0,
                Combustion,
                20.0,
                requires(&[(B::Shipyard, 1)], &[(R::CombustionDrive, 1)]),
            ),
        ),
        (
            S::MediumFighter,
            ship(
                "Medium Fighter",
                res(4500.0, 2500.0, 0.0),
                (100.0, 18.0, 700.0),
                11_000.0,
                75.0,
                Combustion,
                40.0,
                requires(&[(B::Shipyard, 2)], &[(R::CombustionDrive, 2)]),
            ),
        ),
        (
            S::HeavyFighter,
            ship(
                "Heavy Fighter",
                res(6000.0, 4000.0, 0.0),
                (150.0, 25.0, 1000.0),
                10_000.0,
                100.0,
                Impulse,
                75.0,
                requires(
                    &[(B::Shipyard, 3)],
                    &[(R::ArmorTechnology, 2), (R::ImpulseDrive, 2)],
                ),
            ),
        ),
        (
            S::CargoShip,
            ship(
                "Cargo Ship",
                res(2000.0, 2000.0, 0.0),
                (5.0, 10.0, 400.0),
                5000.0,
                5000.0,
                Combustion,
                10.0,
                requires(&[(B::Shipyard, 2)], &[(R::CombustionDrive, 2)]),
            ),
        ),
        (
            S::MediumCargoShip,
            ship(
                "Medium Cargo Ship",
                res(4000.0, 4000.0, 0.0),
                (5.0, 20.0, 800.0),
                6500.0,
                12_500.0,
                Combustion,
                30.0,
                requires(&[(B::Shipyard, 4)], &[(R::CombustionDrive, 4)]),
            ),
        ),
        (
            S::HeavyCargoShip,
            ship(
                "Heavy Cargo Ship",
                res(6000.0, 6000.0, 0.0),
                (5.0, 25.0, 1200.0),
                7500.0,
                25_000.0,
                Combustion,
                50.0,
                requires(&[(B::Shipyard, 4)], &[(R::CombustionDrive, 6)]),
            ),
        ),
        (
            S::SpyProbe,
            ship(
                "Spy Probe",
                res(0.0, 1000.0, 0.0),
                (0.0, 0.0, 100.0),
                100_000_000.0,
                5.0,
                Combustion,
                1.0,
                requires(
                    &[(B::Shipyard, 3)],
                    &[(R::CombustionDrive, 3), (R::SpyTechnology, 2)],
                ),
            ),
        ),
        (
            S::Recycler,
            ship(
                "Recycler",
                res(10_000.0, 6000.0, 2000.0),
                (1.0, 10.0, 1600.0),
                2000.0,
                20_000.0,
                Combustion,
                300.0,
                requires(
                    &[(B::Shipyard, 4)],
                    &[(R::CombustionDrive, 6), (R::ShieldingTechnology, 2)],
                ),
            ),
        ),
        (
            S::Cruiser,
            ship(
                "Cruiser",
                res(20_000.0, 7000.0, 2000.0),
                (400.0, 50.0, 2700.0),
                15_000.0,
                800.0,
                Impulse,
                300.0,
                requires(
                    &[(B::Shipyard, 5)],
                    &[(R::ImpulseDrive, 4), (R::IonTechnology, 2)],
                ),
            ),
        ),
        (
            S::Battleship,
            ship(
                "Battleship",
                res(45_000.0, 15_000.0, 0.0),
                (1000.0, 200.0, 6000.0),
                10_000.0,
                1500.0,
                Hyperspace,
                500.0,
                requires(&[(B::Shipyard, 7)], &[(R::HyperspaceDrive, 4)]),
            ),
        ),
        (
            S::Destroyer,
            ship(
                "Destroyer",
                res(60_000.0, 50_000.0, 15_000.0),
                (2000.0, 500.0, 11_000.0),
                5000.0,
                2000.0,
                Hyperspace,
                1000.0,
                requires(&[(B::Shipyard, 9)], &[(R::HyperspaceDrive, 6)]),
            ),
        ),
        (
            S::Bomber,
            ship(
                "Bomber",
                res(50_000.0, 25_000.0, 15_000.0),
                (1000.0, 500.0, 7500.0),
                4000.0,
                500.0,
                Impulse,
                700.0,
                requires(
                    &[(B::Shipyard, 8)],
                    &[(R::ImpulseDrive, 6), (R::PlasmaTechnology, 5)],
                ),
            ),
        ),
        (
            S::ColonyShip,
            ship(
                "Colony Ship",
                res(10_000.0, 20_000.0, 10_000.0),
                (50.0, 100.0, 3000.0),
                2500.0,
                7500.0,
                Impulse,
                1000.0,
                requires(&[(B::Shipyard, 4)], &[(R::ImpulseDrive, 3)]),
            ),
        ),
        (
            S::ResearchVessel,
            ship(
                "Research Vessel",
                res(5000.0, 10_000.0, 5000.0),
                (10.0, 50.0, 1500.0),
                8000.0,
                1000.0,
                Impulse,
                100.0,
                requires(
                    &[(B::Shipyard, 5)],
                    &[(R::ImpulseDrive, 3), (R::Astrophysics, 1)],
                ),
            ),
        ),
        (
            S::Battlecruiser,
            ship(
                "Battlecruiser",
                res(30_000.0, 40_000.0, 15_000.0),
                (700.0, 400.0, 7000.0),
                10_000.0,
                750.0,
                Hyperspace,
                250.0,
                requires(
                    &[(B::Shipyard, 8)],
                    &[(R::HyperspaceDrive, 5), (R::LaserTechnology, 12)],
                ),
            ),
        ),
        (
            S::Deathstar,
            ship(
                "Deathstar",
                res(5_000_000.0, 4_000_000.0, 1_000_000.0),
                (200_000.0, 50_000.0, 900_000.0),
                100.0,
                1_000_000.0,
                Hyperspace,
                1.0,
                requires(
                    &[(B::Shipyard, 12)],
                    &[(R::HyperspaceDrive, 7), (R::GravitonTechnology, 1)],
                ),
            ),
        ),
    ]
    .into_iter()
    .collect()
}

fn defenses() -> std::collections::BTreeMap<D, DefenseSpec> {
    [
        (
            D::RocketLauncher,
            defense(
                "Rocket Launcher",
                res(2000.0, 0.0, 0.0),
                (80.0, 20.0, 200.0),
                requires(&[(B::Shipyard, 1)], &[]),
            ),
        ),
        (
            D::LightLaserCannon,
            defense(
                "Light Laser Cannon",
                res(1500.0, 500.0, 0.0),
                (100.0, 25.0, 200.0),
                requires(
                    &[(B::Shipyard, 2)],
                    &[(R::EnergyTechnology, 1), (R::LaserTechnology, 3)],
                ),
            ),
        ),
        (
            D::HeavyLaserCannon,
            defense(
                "Heavy Laser Cannon",
                res(6000.0, 2000.0, 0.0),
                (250.0, 100.0, 800.0),
                requires(
                    &[(B::Shipyard, 4)],
                    &[(R::EnergyTechnology, 3), (R::LaserTechnology, 6)],
                ),
            ),
        ),
        (
            D::IonCannon,
            defense(
                "Ion Cannon",
                res(2000.0, 6000.0, 0.0),
                (150.0, 500.0, 800.0),
                requires(&[(B::Shipyard, 4)], &[(R::IonTechnology, 4)]),
            ),
        ),
        (
            D::PlasmaTurret,
            defense(
                "Plasma Turret",
                res(50_000.0, 50_000.0, 30_000.0),
                (3000.0, 300.0, 10_000.0),
                requires(&[(B::Shipyard, 8)], &[(R::PlasmaTechnology, 7)]),
            ),
        ),
    ]
    .into_iter()
    .collect()
}
