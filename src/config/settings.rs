//! Application settings loading from config.toml
//!
//! The display unit is a user-scoped preference, not part of the financial
//! ledger: it is loaded here once and injected into the calls that need a
//! default unit, keeping the engine free of global mutable state. The file
//! may also carry seed templates used to create the first dataset on an
//! empty store.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Display unit label prefilled on new records (e.g., "USD", "points")
    #[serde(default = "default_display_unit")]
    pub display_unit: String,
    /// Optional seed used to create the first dataset on an empty store
    #[serde(default)]
    pub seed: Option<SeedConfig>,
}

/// Seed template for the initial dataset
#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    /// Name of the dataset to create
    pub dataset_name: String,
    /// Budget envelopes to create inside it
    #[serde(default)]
    pub budgets: Vec<SeedBudget>,
}

/// Seed template for a single budget envelope
#[derive(Debug, Clone, Deserialize)]
pub struct SeedBudget {
    /// Name of the envelope
    pub name: String,
    /// Total envelope amount
    pub total_amount: f64,
    /// Optional free-text description
    #[serde(default)]
    pub description: Option<String>,
}

fn default_display_unit() -> String {
    "USD".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            display_unit: default_display_unit(),
            seed: None,
        }
    }
}

/// Loads settings from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads settings from the default location (./config.toml), falling back to
/// defaults when the file is absent.
pub fn load_default_settings() -> Settings {
    match load_settings("config.toml") {
        Ok(settings) => settings,
        Err(_) => Settings::default(),
    }
}
