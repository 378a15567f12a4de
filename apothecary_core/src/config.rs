//! Configuration file support for Botica.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/botica/config.toml`.
//! Every field has a default, so a missing or partial file is fine.

use crate::resources::ResourceLimits;
use crate::treatment::{DEFAULT_HISTORY_LENGTH, MAX_HISTORY_LENGTH};
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub limits: ResourceLimits,

    #[serde(default)]
    pub calendar: CalendarConfig,

    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub player: PlayerConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// In-game calendar
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CalendarConfig {
    #[serde(default = "default_current_date")]
    pub current_date: NaiveDate,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            current_date: default_current_date(),
        }
    }
}

/// Treatment history generation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_history_count")]
    pub default_count: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            default_count: default_history_count(),
        }
    }
}

/// New-game settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_starting_wealth")]
    pub starting_wealth: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            starting_wealth: default_starting_wealth(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("botica")
}

/// August 1, 1680
fn default_current_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1680, 8, 1).unwrap_or_default()
}

fn default_history_count() -> usize {
    DEFAULT_HISTORY_LENGTH
}

fn default_starting_wealth() -> u32 {
    10
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("botica").join("config.toml")
    }

    /// Reject limits the resource rules can't work with
    pub fn validate(&self) -> Result<()> {
        if self.limits.max_energy <= 0 || self.limits.max_health <= 0 {
            return Err(Error::Config(format!(
                "Resource limits must be positive (max_health = {}, max_energy = {})",
                self.limits.max_health, self.limits.max_energy
            )));
        }
        if self.history.default_count > MAX_HISTORY_LENGTH {
            return Err(Error::Config(format!(
                "history.default_count = {} exceeds the maximum of {}",
                self.history.default_count, MAX_HISTORY_LENGTH
            )));
        }
        Ok(())
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
