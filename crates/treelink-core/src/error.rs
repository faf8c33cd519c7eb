//! Error types for treelink-core

/// Result type for treelink-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in treelink-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A precondition violation. Fatal to the call.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Platform classification error
    #[error(transparent)]
    Platform(#[from] treelink_platform::Error),

    /// Project tree provider error
    #[error(transparent)]
    Provider(#[from] treelink_provider::Error),
}

impl Error {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Whether this is a failed link operation, which the engine recovers
    /// from per item instead of aborting the run.
    pub fn is_link_failure(&self) -> bool {
        matches!(
            self,
            Error::Provider(treelink_provider::Error::LinkFailed { .. })
        )
    }
}
