//! Cosmic Lord - development tools

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cosmic_core::catalog::Catalog;
use cosmic_core::config::EngineConfig;
use cosmic_core::model::{Coordinates, ResearchType};
use cosmic_tools::scenario::BattleScenario;
use cosmic_tools::{travel, validate, ToolError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cosmic-tools")]
#[command(about = "Development tools for Cosmic Lord")]
struct Cli {
    /// Engine configuration (RON); defaults to the live values.
    #[arg(long, global = true)]
    engine: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dump the standard catalog as RON
    Catalog {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a catalog file
    Validate {
        /// Path to the catalog RON
        path: PathBuf,
    },
    /// Simulate a battle scenario
    Battle {
        /// Path to the scenario RON
        scenario: PathBuf,
    },
    /// Plan a flight between two slots
    Travel {
        /// Origin, `g:s:p`
        from: Coordinates,
        /// Destination, `g:s:p`
        to: Coordinates,
        /// Ships, `LIGHT_FIGHTER=10,CARGO_SHIP=2`
        #[arg(short, long)]
        ships: String,
        /// Combustion drive level
        #[arg(long, default_value_t = 0)]
        combustion: u32,
        /// Impulse drive level
        #[arg(long, default_value_t = 0)]
        impulse: u32,
        /// Hyperspace drive level
        #[arg(long, default_value_t = 0)]
        hyperspace: u32,
    },
}

fn run(cli: Cli) -> Result<(), ToolError> {
    let config = match &cli.engine {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let catalog = Catalog::global();

    match cli.command {
        Commands::Catalog { output } => {
            let ron = catalog.to_ron_string()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, ron)?;
                    tracing::info!("Catalog written to {}", path.display());
                }
                None => println!("{ron}"),
            }
        }
        Commands::Validate { path } => {
            tracing::info!("Validating catalog: {}", path.display());
            validate::validate_catalog_file(&path)?;
            tracing::info!("Validation passed");
        }
        Commands::Battle { scenario } => {
            let outcome = BattleScenario::load(&scenario)?.run(catalog, &config)?;
            println!("rounds: {}", outcome.rounds);
            println!("attacker losses: {:?}", outcome.attacker_losses);
            println!("defender losses: {:?}", outcome.defender_losses);
            println!("defenses lost: {:?}", outcome.defender_defenses_losses);
            println!("loot: {:?}", outcome.loot);
            println!("debris: {:?}", outcome.debris);
        }
        Commands::Travel {
            from,
            to,
            ships,
            combustion,
            impulse,
            hyperspace,
        } => {
            let fleet = travel::parse_ships(&ships)?;
            let plan = travel::plan(
                catalog,
                &fleet,
                from,
                to,
                &[
                    (ResearchType::CombustionDrive, combustion),
                    (ResearchType::ImpulseDrive, impulse),
                    (ResearchType::HyperspaceDrive, hyperspace),
                ],
            )?;
            println!("distance: {}", plan.distance);
            println!("speed: {:.0}", plan.speed);
            println!("travel time: {}s", plan.travel_time);
            println!("fuel: {:.0}", plan.fuel);
        }
    }
    Ok(())
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(e) = run(Cli::parse()) {
        if let ToolError::InvalidCatalog(problems) = &e {
            for problem in problems {
                tracing::error!("{problem}");
            }
        }
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
