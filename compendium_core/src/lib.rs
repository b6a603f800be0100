//! compendium_core - Item and actor compendiums loaded from TOML
//!
//! A compendium directory holds any number of `*.toml` files, each with
//! `[[items]]` and/or `[[actors]]` documents. Everything is prepared and
//! derived on load.

mod config;
mod registry;

pub use registry::CompendiumRegistry;

use std::path::PathBuf;
use thiserror::Error;

/// Error loading compendium files
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading '{path:?}': {error}")]
    Io {
        error: std::io::Error,
        path: Option<PathBuf>,
    },
    #[error("Parse error in '{path}': {error}")]
    Parse {
        error: toml::de::Error,
        path: PathBuf,
    },
    #[error("Validation error in '{path}': {message}")]
    Validation { message: String, path: PathBuf },
}

/// Error querying a loaded compendium
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("Unknown actor: {0}")]
    UnknownActor(String),
    #[error("Unknown item: {0}")]
    UnknownItem(String),
}
