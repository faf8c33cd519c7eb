//! Error types for treelink-provider

/// Result type for treelink-provider operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur against a project tree provider
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The node handle does not refer to a live item.
    #[error("Node not found: {0:?}")]
    NodeNotFound(crate::NodeId),

    /// The underlying link operation failed.
    #[error("Failed to create link to {path}: {message}")]
    LinkFailed { path: String, message: String },

    /// An operation was issued against a node of the wrong kind.
    #[error("Invalid operation: {message}")]
    InvalidOperation { message: String },
}

impl Error {
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }
}
