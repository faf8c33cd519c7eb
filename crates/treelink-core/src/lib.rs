//! Synchronization engine for treelink
//!
//! This crate coordinates the lower layers into the actual linking work:
//!
//! - **Linker**: the two-phase add/remove walk that mirrors a root project's
//!   tree into its target projects as linked references
//! - **Resolver**: related-project discovery and the physical-file safety
//!   checks that guard the remove phase
//! - **AutoLinker**: incremental synchronization driven by host change
//!   notifications and the configured project mappings
//!
//! # Architecture
//!
//! `treelink-core` sits above the other crates and below any host adapter:
//!
//! ```text
//!            host adapter / UI
//!                    |
//!              treelink-core
//!                    |
//!     +--------------+--------------+
//!     |              |              |
//! treelink-platform treelink-config treelink-provider
//! ```

pub mod autolink;
pub mod error;
pub mod linker;
pub mod matcher;
pub mod message;
pub mod resolver;
pub mod session;

pub use autolink::{AutoLinker, ensure_root_projects};
pub use error::{Error, Result};
pub use linker::{Linker, ProjectItemAction};
pub use message::{CollectingMessageSink, MessageSink, TracingMessageSink};
pub use resolver::{
    is_actual_file_in_any_related_project, is_actual_file_in_project, related_projects,
    sort_projects,
};
pub use session::SyncSession;
