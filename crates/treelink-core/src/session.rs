//! Run-scoped state for a synchronization pass
//!
//! The relative-name cache is owned by the session and dropped with it, so
//! entries can never go stale across runs against a changing tree.

use std::cell::RefCell;
use std::collections::HashMap;

use treelink_provider::{NodeId, ProjectTree};

use crate::Result;

/// State scoped to one synchronization run.
#[derive(Debug, Default)]
pub struct SyncSession {
    /// Relative-name cache keyed by absolute file path.
    relative_names: RefCell<HashMap<String, String>>,
}

impl SyncSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// The item's path relative to its project root, `/`-separated.
    ///
    /// A pure function of the node's position (the name chain up to the
    /// root), memoized by absolute path for the duration of the session. A
    /// linked file shares its absolute path with the physical source item and
    /// resolves to the same relative name, which is exactly the mirroring
    /// assumption the engine relies on.
    pub fn relative_name(&self, tree: &dyn ProjectTree, node: NodeId) -> Result<String> {
        let key = tree.absolute_path(node)?.as_str().to_string();
        if let Some(hit) = self.relative_names.borrow().get(&key) {
            return Ok(hit.clone());
        }

        let mut segments = vec![tree.item_name(node)?];
        let mut current = tree.parent(node)?;
        while let Some(parent) = current {
            segments.push(tree.item_name(parent)?);
            current = tree.parent(parent)?;
        }
        segments.reverse();
        let relative = segments.join("/");

        self.relative_names
            .borrow_mut()
            .insert(key, relative.clone());
        Ok(relative)
    }
}
