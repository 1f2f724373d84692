//! Configuration module for skill bars.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - User-wide TOML file (`<config dir>/skillbars/settings.toml`)
//! - Workspace TOML file (`.skillbars/settings.toml`)
//! - Environment variable overrides
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `SB_` and use double underscores
//! to separate nested levels:
//! - `SB_BARS__ENABLED=false` sets `bars.enabled`
//! - `SB_BARS__QUIET_PERIOD_TICKS=40` sets `bars.quiet_period_ticks`
//! - `SB_LOGGING__DEFAULT=debug` sets `logging.default`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::bars::BarPolicy;
use crate::skill::Skill;

const WORKSPACE_DIR: &str = ".skillbars";
const SETTINGS_FILE: &str = "settings.toml";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Bar display settings
    #[serde(default)]
    pub bars: BarsConfig,

    /// Log levels
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BarsConfig {
    /// Master switch for every bar
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Inactivity before an `Auto` bar hides, in scheduler ticks
    #[serde(default = "default_quiet_period_ticks")]
    pub quiet_period_ticks: u32,

    /// Length of one scheduler tick in milliseconds
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Per-skill overrides keyed by lowercase skill name
    #[serde(default)]
    pub skills: HashMap<Skill, SkillBarConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SkillBarConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Filter applied to every target without an override
    #[serde(default = "default_log_level")]
    pub default: String,

    /// Per-target overrides, e.g. `timer = "debug"`
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

// Default value functions
fn default_version() -> u32 {
    1
}
fn default_true() -> bool {
    true
}
fn default_quiet_period_ticks() -> u32 {
    60
}
fn default_tick_ms() -> u64 {
    50
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            bars: BarsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for BarsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            quiet_period_ticks: default_quiet_period_ticks(),
            tick_ms: default_tick_ms(),
            skills: HashMap::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: default_log_level(),
            modules: HashMap::new(),
        }
    }
}

impl BarsConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Saturates at `Duration::MAX`; the bar manager rejects such values.
    pub fn quiet_period(&self) -> Duration {
        self.tick()
            .checked_mul(self.quiet_period_ticks)
            .unwrap_or(Duration::MAX)
    }
}

impl BarPolicy for BarsConfig {
    fn bars_globally_enabled(&self) -> bool {
        self.enabled
    }

    fn bar_enabled(&self, skill: Skill) -> bool {
        self.skills
            .get(&skill)
            .is_none_or(|skill_config| skill_config.enabled)
    }
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        Self::load_layered(Self::user_config_path())
    }

    /// Load configuration with an explicit user-wide settings file.
    ///
    /// `None` skips the user layer. Workspace file and environment still apply.
    pub fn load_layered(user_config: Option<PathBuf>) -> Result<Self, Box<figment::Error>> {
        let workspace_config = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(WORKSPACE_DIR).join(SETTINGS_FILE));

        let mut figment = Figment::new().merge(Serialized::defaults(Settings::default()));
        if let Some(user_config) = user_config {
            figment = figment.merge(Toml::file(user_config));
        }

        figment
            .merge(Toml::file(workspace_config))
            // Double underscore separates nested levels
            .merge(Env::prefixed("SB_").map(|key| {
                key.as_str()
                    .to_lowercase()
                    .replace("__", ".")
                    .into()
            }))
            .extract()
            .map_err(Box::new)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: impl AsRef<std::path::Path>) -> Result<Self, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(Box::new)
    }

    /// Find `.skillbars/settings.toml` from the current directory up to root
    fn find_workspace_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        for ancestor in current.ancestors() {
            let config_dir = ancestor.join(WORKSPACE_DIR);
            if config_dir.is_dir() {
                return Some(config_dir.join(SETTINGS_FILE));
            }
        }

        None
    }

    fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("skillbars").join(SETTINGS_FILE))
    }

    /// Save current configuration to file
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<(), Box<dyn std::error::Error>> {
        let parent = path.as_ref().parent().ok_or("Invalid path")?;
        std::fs::create_dir_all(parent)?;

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }
}
