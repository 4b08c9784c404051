//! # Cosmic Development Tools
//!
//! Command-line helpers for balancing work:
//! - Catalog dump and validation
//! - Battle calculator driven by RON scenarios
//! - Travel planner

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod scenario;
pub mod travel;
pub mod validate;

use cosmic_core::config::ConfigError;
use cosmic_core::error::GameError;
use thiserror::Error;

/// Errors from the tools.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Failed to read or parse an input file.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Failed to write output.
    #[error("Failed to write output: {0}")]
    Write(#[from] std::io::Error),
    /// Failed to render RON.
    #[error("Failed to render RON: {0}")]
    Render(#[from] ron::Error),
    /// The engine rejected the input.
    #[error(transparent)]
    Game(#[from] GameError),
    /// A `--ships` argument could not be parsed.
    #[error("Invalid ship list '{0}': expected SHIP=COUNT[,SHIP=COUNT...]")]
    InvalidShips(String),
    /// The catalog has problems.
    #[error("Catalog has {} problem(s)", .0.len())]
    InvalidCatalog(Vec<String>),
}
