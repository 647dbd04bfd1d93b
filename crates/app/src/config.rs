//! Application configuration
//!
//! Loaded from a TOML file; every field has a sensible default so the
//! binary runs with no config at all. The path comes from the
//! `INNKEEP_CONFIG` environment variable when set.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;

/// Environment variable overriding the config file path
pub const CONFIG_ENV: &str = "INNKEEP_CONFIG";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Address the API listens on
    pub listen_addr: SocketAddr,
    /// Database file path; empty means the platform data directory
    pub database_path: Option<PathBuf>,
    /// Night audit settings
    pub night_audit: NightAuditConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NightAuditConfig {
    /// Hour of day the audit fires, hotel-local
    pub hour: u32,
    /// Hotel-local offset from UTC, in minutes (one setting per deployment)
    pub utc_offset_minutes: i32,
    /// Attempts per firing before giving up until the next day
    pub max_attempts: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: ([127, 0, 0, 1], 8600).into(),
            database_path: None,
            night_audit: NightAuditConfig::default(),
        }
    }
}

impl Default for NightAuditConfig {
    fn default() -> Self {
        Self {
            hour: 5,
            utc_offset_minutes: 0,
            max_attempts: 3,
        }
    }
}

impl AppConfig {
    /// Load configuration from the given file
    pub fn load<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| std::io::Error::other(e.to_string()))
    }

    /// Load from `INNKEEP_CONFIG` or fall back to defaults
    pub fn load_default() -> Self {
        match std::env::var(CONFIG_ENV) {
            Ok(path) => match Self::load(&path) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(path = %path, error = %e, "Failed to load config, using defaults");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Resolve the database path, creating the data directory if needed
    pub fn resolve_database_path(&self) -> std::io::Result<PathBuf> {
        if let Some(path) = &self.database_path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            return Ok(path.clone());
        }

        let dirs = ProjectDirs::from("dev", "innkeep", "innkeep")
            .ok_or_else(|| std::io::Error::other("no home directory available"))?;
        std::fs::create_dir_all(dirs.data_dir())?;
        Ok(dirs.data_dir().join("innkeep.db"))
    }
}
