//! # Settings Module
//!
//! ## Purpose
//! Keeps the few knobs of the crate in one JSON file (`chemic_config.json` in the
//! working directory) and gives process-wide access to them.
//!
//! ## Configuration Format
//! ```json
//! {
//!   "periodic_table": "my_periodic_table.json",
//!   "log_level": "info",
//!   "decimals": 2
//! }
//! ```
//! `periodic_table` is optional; without it the embedded dataset is used.
//!
//! ## Usage Patterns
//! ```no_run
//! use chemic::settings::{with_config, with_config_mut};
//!
//! let level = with_config(|manager| manager.get_config().log_level.clone());
//! with_config_mut(|manager| manager.set_decimals(3)).unwrap();
//! ```
//! Note that the periodic table path is read only once, when the global table is
//! first used.

use crate::Chemistry::chem_error::{ChemError, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, OnceLock, TryLockError};

pub const DEFAULT_CONFIG_FILE: &str = "chemic_config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChemConfig {
    /// dataset file replacing the embedded periodic table
    pub periodic_table: Option<String>,
    /// "error", "warn", "info", "debug", "trace" or "off"
    pub log_level: String,
    /// decimal places used when results are rounded for display
    pub decimals: u32,
}

impl Default for ChemConfig {
    fn default() -> Self {
        Self {
            periodic_table: None,
            log_level: "info".to_string(),
            decimals: 2,
        }
    }
}

/// Loads, updates and saves [`ChemConfig`].
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: ChemConfig,
    config_file: String,
}

impl ConfigManager {
    /// Reads `chemic_config.json` from the working directory, or uses defaults.
    pub fn new() -> Self {
        Self::with_config_file(DEFAULT_CONFIG_FILE)
    }

    /// Reads the given configuration file, or uses defaults if it is missing or broken.
    pub fn with_config_file(config_file: &str) -> Self {
        let config = match Self::load_config(config_file) {
            Ok(config) => config,
            Err(e) => {
                warn!("ignoring configuration file '{}': {}", config_file, e);
                ChemConfig::default()
            }
        };
        Self {
            config,
            config_file: config_file.to_string(),
        }
    }

    fn load_config(config_file: &str) -> Result<ChemConfig> {
        if Path::new(config_file).exists() {
            let content = fs::read_to_string(config_file)?;
            let config: ChemConfig = serde_json::from_str(&content)?;
            info!("configuration loaded from '{}'", config_file);
            Ok(config)
        } else {
            Ok(ChemConfig::default())
        }
    }

    /// Writes the configuration back to its file. Does nothing in tests.
    pub fn save_config(&self) -> Result<()> {
        #[cfg(test)]
        {
            return Ok(());
        }

        #[cfg(not(test))]
        {
            let content = serde_json::to_string_pretty(&self.config)?;
            fs::write(&self.config_file, content)?;
            Ok(())
        }
    }

    pub fn get_config(&self) -> &ChemConfig {
        &self.config
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    pub fn periodic_table_path(&self) -> Option<&str> {
        self.config.periodic_table.as_deref()
    }

    /// Selects a periodic table dataset file. The file must exist.
    pub fn set_periodic_table(&mut self, path: &str) -> Result<()> {
        if !Path::new(path).exists() {
            return Err(ChemError::Dataset(format!("File does not exist: {}", path)));
        }
        self.config.periodic_table = Some(path.to_string());
        self.save_config()
    }

    pub fn set_log_level(&mut self, level: &str) -> Result<()> {
        self.config.log_level = level.to_string();
        self.save_config()
    }

    pub fn set_decimals(&mut self, decimals: u32) -> Result<()> {
        self.config.decimals = decimals;
        self.save_config()
    }

    pub fn reset_to_defaults(&mut self) -> Result<()> {
        self.config = ChemConfig::default();
        self.save_config()
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_CONFIG_MANAGER: OnceLock<Mutex<ConfigManager>> = OnceLock::new();

fn get_config_manager() -> MutexGuard<'static, ConfigManager> {
    let mutex = GLOBAL_CONFIG_MANAGER.get_or_init(|| Mutex::new(ConfigManager::new()));
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Runs `f` with read access to the process-wide configuration.
pub fn with_config<F, R>(f: F) -> R
where
    F: FnOnce(&ConfigManager) -> R,
{
    let manager = get_config_manager();
    f(&manager)
}

/// Runs `f` with write access to the process-wide configuration.
pub fn with_config_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut ConfigManager) -> R,
{
    let mut manager = get_config_manager();
    f(&mut manager)
}

/// Dataset path from the process-wide configuration, without waiting for its lock.
/// While the lock is held (possibly by the calling thread, inside [`with_config`]) the
/// configuration file is read again instead.
pub fn periodic_table_path_snapshot() -> Option<String> {
    let mutex = GLOBAL_CONFIG_MANAGER.get_or_init(|| Mutex::new(ConfigManager::new()));
    match mutex.try_lock() {
        Ok(manager) => manager.periodic_table_path().map(str::to_string),
        Err(TryLockError::Poisoned(poisoned)) => poisoned
            .into_inner()
            .periodic_table_path()
            .map(str::to_string),
        Err(TryLockError::WouldBlock) => {
            warn!("configuration is locked, reading '{}' directly", DEFAULT_CONFIG_FILE);
            ConfigManager::new()
                .periodic_table_path()
                .map(str::to_string)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_without_file() {
        let manager = ConfigManager::with_config_file("no_such_chemic_config.json");
        assert_eq!(manager.get_config(), &ChemConfig::default());
        assert_eq!(manager.periodic_table_path(), None);
        assert_eq!(manager.get_config().decimals, 2);
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_config = NamedTempFile::new().unwrap();
        let mut temp_table = NamedTempFile::new().unwrap();
        temp_table.write_all(b"[]").unwrap();

        let config = ChemConfig {
            periodic_table: Some(temp_table.path().to_str().unwrap().to_string()),
            log_level: "debug".to_string(),
            decimals: 4,
        };
        let config_json = serde_json::to_string_pretty(&config).unwrap();
        temp_config.write_all(config_json.as_bytes()).unwrap();

        let manager = ConfigManager::with_config_file(temp_config.path().to_str().unwrap());
        assert_eq!(manager.get_config(), &config);
        assert_eq!(
            manager.periodic_table_path(),
            Some(temp_table.path().to_str().unwrap())
        );
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut temp_config = NamedTempFile::new().unwrap();
        temp_config.write_all(br#"{"decimals": 3}"#).unwrap();
        let manager = ConfigManager::with_config_file(temp_config.path().to_str().unwrap());
        assert_eq!(manager.get_config().decimals, 3);
        assert_eq!(manager.get_config().log_level, "info");
    }

    #[test]
    fn test_broken_file_uses_defaults() {
        let mut temp_config = NamedTempFile::new().unwrap();
        temp_config.write_all(b"{ not json").unwrap();
        let manager = ConfigManager::with_config_file(temp_config.path().to_str().unwrap());
        assert_eq!(manager.get_config(), &ChemConfig::default());
    }

    #[test]
    fn test_path_snapshot_inside_locked_config() {
        let outside = periodic_table_path_snapshot();
        let inside = with_config(|_| periodic_table_path_snapshot());
        assert_eq!(inside, outside);
    }

    #[test]
    fn test_setters() {
        let temp_config = NamedTempFile::new().unwrap();
        let mut temp_table = NamedTempFile::new().unwrap();
        temp_table.write_all(b"[]").unwrap();
        let mut manager = ConfigManager::with_config_file(temp_config.path().to_str().unwrap());

        assert!(manager.set_periodic_table("missing_table.json").is_err());
        assert_eq!(manager.periodic_table_path(), None);

        manager
            .set_periodic_table(temp_table.path().to_str().unwrap())
            .unwrap();
        manager.set_log_level("warn").unwrap();
        manager.set_decimals(5).unwrap();
        assert_eq!(manager.get_config().log_level, "warn");
        assert_eq!(manager.get_config().decimals, 5);
        assert!(manager.periodic_table_path().is_some());

        manager.reset_to_defaults().unwrap();
        assert_eq!(manager.get_config(), &ChemConfig::default());
    }
}
