//! Project tree provider abstraction for treelink
//!
//! Defines the capability interface the synchronization engine consumes
//! ([`ProjectTree`], [`Solution`]) together with a normalized path type and
//! an in-memory implementation for tests and dry runs. An adapter over a real
//! host IDE's automation API implements the same traits.

pub mod error;
pub mod memory;
pub mod path;
pub mod provider;

pub use error::{Error, Result};
pub use memory::{MemoryProject, MemorySolution};
pub use path::TreePath;
pub use provider::{ItemKind, NodeId, ProjectTree, ProjectTreeExt, Solution};
