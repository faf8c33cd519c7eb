//! TOML-backed configuration store
//!
//! The configuration lives in a single file next to the solution file. A
//! corrupt file logs a warning and falls back to the default configuration
//! rather than blocking the solution from opening.

use std::path::Path;

use crate::error::{Error, Result};
use crate::model::Configuration;

impl Configuration {
    /// Load the configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        toml::from_str(&content).map_err(|e| Error::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load the configuration, falling back to the default when the file is
    /// missing or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match Self::load(path) {
            Ok(configuration) => configuration,
            Err(e) => {
                tracing::warn!(
                    "Failed to load configuration from {}, falling back to default: {}",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the configuration to a TOML file.
    ///
    /// Creates the parent directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| Error::io(path, e))?;
        Ok(())
    }
}
