//! Error types for treelink-platform

/// Result type for treelink-platform operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in treelink-platform operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Unknown platform tag: {tag}")]
    UnknownTag { tag: String },
}

impl Error {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}
