//! Run settings.
//!
//! Settings name the default files each command reads and writes and the
//! seeds used for reproducible runs. Every field has a default, so an empty
//! or partial `ids.toml` is valid.
//!
//! ```toml
//! [paths]
//! events = "Events.txt"
//! stats = "Stats.txt"
//!
//! [simulation]
//! baseline_seed = 7
//! live_seed = 1
//! ```

use ids_common::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete run settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub paths: PathSettings,
    pub simulation: SimulationSettings,
}

/// Default input and output locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathSettings {
    /// Event catalogue.
    pub events: PathBuf,
    /// Baseline generation parameters.
    pub stats: PathBuf,
    /// Simulated reference run.
    pub activity_log: PathBuf,
    /// Baseline statistics artifact.
    pub baseline: PathBuf,
    /// Simulated live run.
    pub live_log: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            events: PathBuf::from("Events.txt"),
            stats: PathBuf::from("Stats.txt"),
            activity_log: PathBuf::from("activity_log.csv"),
            baseline: PathBuf::from("baseline_stats.csv"),
            live_log: PathBuf::from("live_log.csv"),
        }
    }
}

/// Seeds and output switches for simulation passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationSettings {
    /// Seed for the reference run. `None` draws from OS entropy.
    pub baseline_seed: Option<u64>,
    /// Seed applied before every live run.
    pub live_seed: u64,
    /// Persist each live run to `paths.live_log`.
    pub write_live_log: bool,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            baseline_seed: None,
            live_seed: 1,
            write_live_log: true,
        }
    }
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load settings from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
