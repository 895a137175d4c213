//! Path management for fin-tracker
//!
//! Provides XDG-compliant path resolution for the on-disk store.
//!
//! ## Path Resolution Order
//!
//! 1. `FIN_TRACKER_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/fin-tracker` or `~/.config/fin-tracker`
//! 3. Windows: `%APPDATA%\fin-tracker`

use std::path::PathBuf;

use crate::error::TrackerError;

/// Manages all paths used by fin-tracker
#[derive(Debug, Clone)]
pub struct TrackerPaths {
    /// Base directory for all fin-tracker data
    base_dir: PathBuf,
}

impl TrackerPaths {
    /// Create a new TrackerPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, TrackerError> {
        let base_dir = if let Ok(custom) = std::env::var("FIN_TRACKER_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create TrackerPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/fin-tracker/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the store directory (~/.config/fin-tracker/store/), one file per key
    pub fn store_dir(&self) -> PathBuf {
        self.base_dir.join("store")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), TrackerError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| TrackerError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.store_dir())
            .map_err(|e| TrackerError::Io(format!("Failed to create store directory: {}", e)))?;

        Ok(())
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, TrackerError> {
    // Unix (Linux/macOS): Use XDG_CONFIG_HOME if set, otherwise ~/.config
    let config_base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| {
            std::env::var("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .map_err(|_| TrackerError::Io("HOME environment variable not set".into()))
        })?;

    Ok(config_base.join("fin-tracker"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, TrackerError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| TrackerError::Io("APPDATA environment variable not set".into()))?;

    Ok(PathBuf::from(appdata).join("fin-tracker"))
}
