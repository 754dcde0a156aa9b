//! Settings resolution and path discovery.
//!
//! Resolution order: CLI argument → `IDS_CONFIG` → `IDS_CONFIG_DIR/ids.toml`
//! → XDG config directory → built-in defaults.

use crate::settings::Settings;
use crate::SETTINGS_FILENAME;
use ids_common::{Error, Result};
use std::path::{Path, PathBuf};

/// Where the settings came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in XDG config directory.
    XdgConfig,

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Environment variable names.
pub const ENV_CONFIG_PATH: &str = "IDS_CONFIG";
pub const ENV_CONFIG_DIR: &str = "IDS_CONFIG_DIR";

/// Application name for XDG directories.
const APP_NAME: &str = "activity-ids";

/// Settings together with where they were found.
#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    pub settings: Settings,
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
}

/// Resolve the settings file path from the process environment.
pub fn resolve_settings_path(cli_path: Option<&Path>) -> Result<(Option<PathBuf>, ConfigSource)> {
    resolve_settings_path_with(
        cli_path,
        |key| std::env::var(key).ok(),
        dirs::config_dir().map(|d| d.join(APP_NAME)),
    )
}

/// Resolve the settings file path with an explicit environment lookup.
///
/// An explicit CLI path must exist. Environment and XDG candidates that do
/// not exist are skipped.
pub fn resolve_settings_path_with(
    cli_path: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
    xdg_dir: Option<PathBuf>,
) -> Result<(Option<PathBuf>, ConfigSource)> {
    // 1. CLI argument
    if let Some(path) = cli_path {
        if !path.exists() {
            return Err(Error::Config(format!(
                "settings file {} does not exist",
                path.display()
            )));
        }
        return Ok((Some(path.to_path_buf()), ConfigSource::CliArgument));
    }

    // 2. Environment variable (direct path)
    if let Some(env_path) = env(ENV_CONFIG_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok((Some(path), ConfigSource::Environment));
        }
        tracing::warn!(path = %path.display(), "{} points to a missing file; ignoring", ENV_CONFIG_PATH);
    }

    // 3. Environment variable (config dir)
    if let Some(config_dir) = env(ENV_CONFIG_DIR) {
        let path = PathBuf::from(config_dir).join(SETTINGS_FILENAME);
        if path.exists() {
            return Ok((Some(path), ConfigSource::Environment));
        }
    }

    // 4. XDG config directory
    if let Some(dir) = xdg_dir {
        let path = dir.join(SETTINGS_FILENAME);
        if path.exists() {
            return Ok((Some(path), ConfigSource::XdgConfig));
        }
    }

    // 5. Built-in defaults
    Ok((None, ConfigSource::BuiltinDefault))
}

/// Resolve and load settings.
pub fn load_settings(cli_path: Option<&Path>) -> Result<ResolvedSettings> {
    let (path, source) = resolve_settings_path(cli_path)?;
    let settings = match &path {
        Some(p) => Settings::from_file(p)?,
        None => Settings::default(),
    };
    tracing::debug!(source = %source, path = ?path, "resolved settings");
    Ok(ResolvedSettings {
        settings,
        path,
        source,
    })
}
