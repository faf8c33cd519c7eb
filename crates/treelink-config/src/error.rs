//! Error types for treelink-config

use std::path::PathBuf;

/// Result type for treelink-config operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in treelink-config operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration at {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
