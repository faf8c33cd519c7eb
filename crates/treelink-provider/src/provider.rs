//! Capability traits over the host project/solution object model
//!
//! The synchronization engine never talks to the host IDE directly. It works
//! against [`ProjectTree`] and [`Solution`], implemented by an adapter over
//! the real host automation API and by the in-memory fake in
//! [`crate::memory`].
//!
//! All methods take `&self`: the host automation objects are effectively
//! shared-mutable, so implementations use interior mutability where needed.

use crate::path::TreePath;
use crate::{Error, Result};

/// Opaque handle to an item inside a [`ProjectTree`].
///
/// Handles are only meaningful against the tree that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// The kind of a project item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    File,
    Folder,
}

/// One project's live item tree.
///
/// A `None` parent refers to the project root collection; every other node
/// has exactly one parent.
pub trait ProjectTree {
    /// The project's name as shown in the solution (carries the platform tag).
    fn project_name(&self) -> String;

    /// Absolute directory containing the project file.
    fn project_dir(&self) -> TreePath;

    /// Whether the project is a member of a solution container. Projects
    /// outside any container are not addressable for relation resolution.
    fn in_solution_container(&self) -> bool;

    /// The ordered children of `parent` (`None` for the project root).
    fn children(&self, parent: Option<NodeId>) -> Vec<NodeId>;

    /// The parent of a node, `None` when the node sits at the project root.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeNotFound`] for a dead handle.
    fn parent(&self, node: NodeId) -> Result<Option<NodeId>>;

    /// The item's name (file or folder name, no path).
    fn item_name(&self, node: NodeId) -> Result<String>;

    fn kind(&self, node: NodeId) -> Result<ItemKind>;

    /// Whether the item is a linked (non-physical) reference. Folders are
    /// never linked.
    fn is_linked(&self, node: NodeId) -> Result<bool>;

    /// The absolute path of the item. For a linked file this is the physical
    /// source path, not a path under this project's directory.
    fn absolute_path(&self, node: NodeId) -> Result<TreePath>;

    /// Whether a directory physically exists on disk at `path`.
    fn directory_exists(&self, path: &TreePath) -> bool;

    /// Add a linked reference to `source` under `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LinkFailed`] when the host rejects the link. The
    /// engine treats this as non-fatal and continues with siblings.
    fn add_linked_file(&self, parent: Option<NodeId>, source: &TreePath) -> Result<NodeId>;

    /// Add a physical copy of `source` under `parent`.
    fn add_file_copy(&self, parent: Option<NodeId>, source: &TreePath) -> Result<NodeId>;

    /// Create a new folder named `name` under `parent`.
    fn add_folder(&self, parent: Option<NodeId>, name: &str) -> Result<NodeId>;

    /// Attach an already-existing on-disk directory under `parent`.
    fn add_directory(&self, parent: Option<NodeId>, path: &TreePath) -> Result<NodeId>;

    /// Remove the item from the project. Linked references drop the link
    /// only; the physical file is untouched.
    fn remove(&self, node: NodeId) -> Result<()>;

    /// Read an item property (e.g. `"CustomTool"`).
    fn property(&self, node: NodeId, key: &str) -> Result<Option<String>>;

    fn set_property(&self, node: NodeId, key: &str, value: &str) -> Result<()>;

    /// Run the item's code generator (custom tool) to refresh generated
    /// code-behind.
    fn run_code_generator(&self, node: NodeId) -> Result<()>;
}

/// The open solution: a flat view of its projects.
pub trait Solution {
    fn projects(&self) -> Vec<&dyn ProjectTree>;

    /// Look up a project by exact name.
    fn project_by_name(&self, name: &str) -> Option<&dyn ProjectTree> {
        self.projects()
            .into_iter()
            .find(|project| project.project_name() == name)
    }
}

/// Convenience lookups shared by engine and tests.
pub trait ProjectTreeExt: ProjectTree {
    /// Find a direct child of `parent` by exact name.
    fn child_by_name(&self, parent: Option<NodeId>, name: &str) -> Result<Option<NodeId>> {
        for child in self.children(parent) {
            if self.item_name(child)? == name {
                return Ok(Some(child));
            }
        }
        Ok(None)
    }

    /// Walk a `/`-separated path from the project root.
    fn node_at(&self, relative_path: &str) -> Result<Option<NodeId>> {
        let mut current = None;
        for segment in relative_path.split('/').filter(|s| !s.is_empty()) {
            match self.child_by_name(current, segment)? {
                Some(node) => current = Some(node),
                None => return Ok(None),
            }
        }
        current
            .map(Some)
            .ok_or_else(|| Error::invalid_operation("relative path must not be empty"))
    }
}

impl<T: ProjectTree + ?Sized> ProjectTreeExt for T {}
