//! Configuration management for Berth.
//!
//! This module provides configuration loading, saving, and defaults.
//! Configuration is stored in TOML format in a platform-appropriate location
//! and doubles as the persistence layer for the pinned/recent shortlists.

use crate::error::{BerthError, Result};
use crate::shortlist;
use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Main configuration structure for Berth.
///
/// ## Example Configuration File (berth.toml)
///
/// ```toml
/// [general]
/// root = "/home/me/projects"
/// editor = "/usr/local/bin/code"
/// log_level = "info"
///
/// [shortlist]
/// pinned = ["/home/me/projects/api.code-workspace"]
/// recent = []
/// recent_cap = 16
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Pinned and recently-used workspace lists
    pub shortlist: ShortlistConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            general: GeneralConfig::default(),
            shortlist: ShortlistConfig::default(),
        }
    }
}

/// General configuration options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Root directory scanned for workspace descriptors
    pub root: PathBuf,

    /// Editor binary to launch workspaces with (None = auto-detect)
    pub editor: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            root: default_root(),
            editor: None,
            log_level: "info".to_string(),
        }
    }
}

/// Shortlist persistence and limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShortlistConfig {
    /// Pinned workspace paths, most relevant first
    pub pinned: Vec<String>,

    /// Recently launched workspace paths, newest first
    pub recent: Vec<String>,

    /// Maximum number of pinned entries
    pub pinned_cap: usize,

    /// Maximum number of recent entries
    pub recent_cap: usize,
}

impl Default for ShortlistConfig {
    fn default() -> Self {
        ShortlistConfig {
            pinned: Vec::new(),
            recent: Vec::new(),
            pinned_cap: 64,
            recent_cap: 16,
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default config if no config file exists.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Config::default());
        }

        info!(path = %path.display(), "Loading configuration");
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents).map_err(|e| BerthError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
        })?;

        Ok(config)
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        info!(path = %path.display(), "Saving configuration");
        let contents = toml::to_string_pretty(self).map_err(|e| BerthError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(path, contents)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "berth").ok_or_else(|| BerthError::ConfigError {
            reason: "Could not determine config directory".to_string(),
        })?;

        Ok(dirs.config_dir().join("berth.toml"))
    }

    /// Record a workspace launch at the front of the recent list.
    pub fn touch_recent(&mut self, path: &str) {
        self.shortlist.recent =
            shortlist::touch(&self.shortlist.recent, path, self.shortlist.recent_cap);
    }

    /// Pin `path` if it is not pinned, unpin it otherwise.
    pub fn toggle_pin(&mut self, path: &str) {
        self.shortlist.pinned =
            shortlist::toggle(&self.shortlist.pinned, path, self.shortlist.pinned_cap);
    }

    /// Whether a workspace path is currently pinned.
    pub fn is_pinned(&self, path: &str) -> bool {
        shortlist::contains(&self.shortlist.pinned, path)
    }
}

/// The scan root falls back to the user's home directory.
fn default_root() -> PathBuf {
    UserDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}
