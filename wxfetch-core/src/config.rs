use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{fs, path::Path, path::PathBuf};
use tracing::debug;

use crate::{error::ConfigError, model::HazardFilter};

pub const DEFAULT_USER_AGENT: &str = concat!("wxfetch/", env!("CARGO_PKG_VERSION"));

/// Base URLs of the remote services.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub geocode: String,
    pub nws_api: String,
    pub current_obs: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            geocode: "https://geocode.maps.co/search".to_string(),
            nws_api: "https://api.weather.gov".to_string(),
            current_obs: "https://forecast.weather.gov/xml/current_obs/display.php".to_string(),
        }
    }
}

/// Optional configuration file.
///
/// Example TOML:
/// zip = "10001"
/// airport = "KNYC"
///
/// [hazards]
/// severity = ["Extreme", "Severe"]
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub zip: Option<String>,
    pub gc_api_key: Option<String>,
    pub airport: Option<String>,
    pub user_agent: Option<String>,
    pub endpoints: Endpoints,
    pub hazards: HazardFilter,
}

impl Config {
    /// Load config from the platform config directory, or an empty default if absent.
    pub fn load() -> Result<Self> {
        match Self::config_file_path() {
            Ok(path) => Self::load_from(&path),
            Err(err) => {
                // no home directory, e.g. under a bare cron environment
                debug!("{err}, using default config");
                Ok(Self::default())
            }
        }
    }

    /// Load config from `path`; a missing file yields the default config.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "wxfetch", "wxfetch")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Values given on the command line; each wins over env and config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub zip: Option<String>,
    pub gc_api_key: Option<String>,
    pub airport: Option<String>,
}

/// Fully resolved inputs for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub zip: String,
    pub gc_api_key: String,
    pub airport: String,
    pub user_agent: String,
    pub endpoints: Endpoints,
    pub hazards: HazardFilter,
}

impl Settings {
    /// Resolve each input from the command line, then the environment, then the config file.
    ///
    /// The geocoding key is checked first, then the ZIP code, then the airport.
    pub fn resolve<F>(overrides: Overrides, env: F, config: Config) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |flag: Option<String>, var: &'static str, file: Option<String>| {
            flag.or_else(|| env(var))
                .or(file)
                .ok_or(ConfigError::Missing(var))
        };

        let gc_api_key = pick(overrides.gc_api_key, "GC_API_KEY", config.gc_api_key)?;
        let zip = pick(overrides.zip, "ZIP", config.zip)?;
        let airport = pick(overrides.airport, "AIRPORT", config.airport)?;

        Ok(Self {
            zip,
            gc_api_key,
            airport,
            user_agent: config.user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            endpoints: config.endpoints,
            hazards: config.hazards,
        })
    }
}
