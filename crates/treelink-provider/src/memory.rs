//! In-memory project tree and solution
//!
//! A fake provider used by the engine's test suites and by callers that want
//! to dry-run a synchronization against a captured tree. Physical disk state
//! (existing directories, files that refuse to link) is simulated so the
//! engine's on-disk special cases can be exercised without a host IDE.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};

use crate::path::TreePath;
use crate::provider::{ItemKind, NodeId, ProjectTree, Solution};
use crate::{Error, Result};

#[derive(Debug)]
struct Node {
    name: String,
    kind: ItemKind,
    linked: bool,
    parent: Option<u32>,
    children: Vec<u32>,
    removed: bool,
    absolute: TreePath,
    properties: BTreeMap<String, String>,
}

#[derive(Debug, Default)]
struct Inner {
    nodes: Vec<Node>,
    roots: Vec<u32>,
    physical_dirs: HashSet<String>,
    failing_links: HashSet<String>,
    generator_runs: Vec<String>,
}

/// An in-memory [`ProjectTree`].
#[derive(Debug)]
pub struct MemoryProject {
    name: String,
    dir: TreePath,
    in_container: bool,
    inner: RefCell<Inner>,
}

impl MemoryProject {
    pub fn new(name: impl Into<String>, dir: impl Into<TreePath>) -> Self {
        let dir = dir.into();
        let mut inner = Inner::default();
        inner.physical_dirs.insert(dir.as_str().to_string());
        Self {
            name: name.into(),
            dir,
            in_container: true,
            inner: RefCell::new(inner),
        }
    }

    /// Mark the project as living outside any solution container.
    pub fn outside_container(mut self) -> Self {
        self.in_container = false;
        self
    }

    /// Seed a physical file. Fixture-only; bypasses failure injection.
    pub fn seed_file(&self, parent: Option<NodeId>, name: &str) -> NodeId {
        let absolute = self.collection_dir(parent).join(name);
        self.insert(parent, name.to_string(), ItemKind::File, false, absolute)
    }

    /// Seed a linked reference to a physical file elsewhere.
    pub fn seed_linked_file(&self, parent: Option<NodeId>, source: impl Into<TreePath>) -> NodeId {
        let source = source.into();
        let name = source.file_name().unwrap_or_default().to_string();
        self.insert(parent, name, ItemKind::File, true, source)
    }

    /// Seed a folder; its directory is registered as physically existing.
    pub fn seed_folder(&self, parent: Option<NodeId>, name: &str) -> NodeId {
        let absolute = self.collection_dir(parent).join(name);
        self.inner
            .borrow_mut()
            .physical_dirs
            .insert(absolute.as_str().to_string());
        self.insert(parent, name.to_string(), ItemKind::Folder, false, absolute)
    }

    /// Simulate a directory that already exists on disk (e.g. created by a
    /// sibling related project) without a project item attached to it.
    pub fn register_physical_dir(&self, path: impl Into<TreePath>) {
        self.inner
            .borrow_mut()
            .physical_dirs
            .insert(path.into().as_str().to_string());
    }

    /// Make the next `add_linked_file` for `source` fail.
    pub fn fail_links_to(&self, source: impl Into<TreePath>) {
        self.inner
            .borrow_mut()
            .failing_links
            .insert(source.into().as_str().to_string());
    }

    /// Absolute paths whose code generator has been run, in order.
    pub fn generator_runs(&self) -> Vec<String> {
        self.inner.borrow().generator_runs.clone()
    }

    /// Root-relative paths of all live items, depth-first, with `/` suffix
    /// on folders. Handy for snapshot-style assertions.
    pub fn relative_paths(&self) -> Vec<String> {
        fn walk(inner: &Inner, ids: &[u32], prefix: &str, out: &mut Vec<String>) {
            for &id in ids {
                let node = &inner.nodes[id as usize];
                let path = if prefix.is_empty() {
                    node.name.clone()
                } else {
                    format!("{}/{}", prefix, node.name)
                };
                match node.kind {
                    ItemKind::Folder => {
                        out.push(format!("{}/", path));
                        walk(inner, &node.children, &path, out);
                    }
                    ItemKind::File => out.push(path.clone()),
                }
            }
        }

        let inner = self.inner.borrow();
        let mut out = Vec::new();
        walk(&inner, &inner.roots, "", &mut out);
        out
    }

    fn insert(
        &self,
        parent: Option<NodeId>,
        name: String,
        kind: ItemKind,
        linked: bool,
        absolute: TreePath,
    ) -> NodeId {
        let mut inner = self.inner.borrow_mut();
        let id = inner.nodes.len() as u32;
        inner.nodes.push(Node {
            name,
            kind,
            linked,
            parent: parent.map(|p| p.0),
            children: Vec::new(),
            removed: false,
            absolute,
            properties: BTreeMap::new(),
        });
        match parent {
            Some(p) => inner.nodes[p.0 as usize].children.push(id),
            None => inner.roots.push(id),
        }
        NodeId(id)
    }

    /// The on-disk directory backing a collection (`None` = project root).
    fn collection_dir(&self, parent: Option<NodeId>) -> TreePath {
        match parent {
            None => self.dir.clone(),
            Some(node) => {
                let inner = self.inner.borrow();
                let mut segments = Vec::new();
                let mut current = Some(node.0);
                while let Some(id) = current {
                    let n = &inner.nodes[id as usize];
                    segments.push(n.name.clone());
                    current = n.parent;
                }
                let mut dir = self.dir.clone();
                for segment in segments.iter().rev() {
                    dir = dir.join(segment);
                }
                dir
            }
        }
    }

    /// Queries stay valid on removed nodes (the host hands out detached item
    /// objects in remove notifications); mutations require a live node.
    fn known(&self, node: NodeId) -> Result<()> {
        if self.inner.borrow().nodes.get(node.0 as usize).is_some() {
            Ok(())
        } else {
            Err(Error::NodeNotFound(node))
        }
    }

    fn live(&self, node: NodeId) -> Result<()> {
        let inner = self.inner.borrow();
        match inner.nodes.get(node.0 as usize) {
            Some(n) if !n.removed => Ok(()),
            _ => Err(Error::NodeNotFound(node)),
        }
    }

    fn check_parent_is_folder(&self, parent: Option<NodeId>) -> Result<()> {
        if let Some(p) = parent {
            self.live(p)?;
            let inner = self.inner.borrow();
            if inner.nodes[p.0 as usize].kind != ItemKind::Folder {
                return Err(Error::invalid_operation("parent is not a folder"));
            }
        }
        Ok(())
    }
}

impl ProjectTree for MemoryProject {
    fn project_name(&self) -> String {
        self.name.clone()
    }

    fn project_dir(&self) -> TreePath {
        self.dir.clone()
    }

    fn in_solution_container(&self) -> bool {
        self.in_container
    }

    fn children(&self, parent: Option<NodeId>) -> Vec<NodeId> {
        let inner = self.inner.borrow();
        let ids = match parent {
            None => &inner.roots,
            Some(p) => match inner.nodes.get(p.0 as usize) {
                Some(node) if !node.removed => &node.children,
                _ => return Vec::new(),
            },
        };
        ids.iter().map(|&id| NodeId(id)).collect()
    }

    fn parent(&self, node: NodeId) -> Result<Option<NodeId>> {
        self.known(node)?;
        Ok(self.inner.borrow().nodes[node.0 as usize].parent.map(NodeId))
    }

    fn item_name(&self, node: NodeId) -> Result<String> {
        self.known(node)?;
        Ok(self.inner.borrow().nodes[node.0 as usize].name.clone())
    }

    fn kind(&self, node: NodeId) -> Result<ItemKind> {
        self.known(node)?;
        Ok(self.inner.borrow().nodes[node.0 as usize].kind)
    }

    fn is_linked(&self, node: NodeId) -> Result<bool> {
        self.known(node)?;
        let inner = self.inner.borrow();
        let n = &inner.nodes[node.0 as usize];
        Ok(n.kind == ItemKind::File && n.linked)
    }

    fn absolute_path(&self, node: NodeId) -> Result<TreePath> {
        self.known(node)?;
        Ok(self.inner.borrow().nodes[node.0 as usize].absolute.clone())
    }

    fn directory_exists(&self, path: &TreePath) -> bool {
        self.inner.borrow().physical_dirs.contains(path.as_str())
    }

    fn add_linked_file(&self, parent: Option<NodeId>, source: &TreePath) -> Result<NodeId> {
        self.check_parent_is_folder(parent)?;
        if self
            .inner
            .borrow_mut()
            .failing_links
            .remove(source.as_str())
        {
            return Err(Error::LinkFailed {
                path: source.as_str().to_string(),
                message: "host rejected the link".to_string(),
            });
        }
        let name = source.file_name().unwrap_or_default().to_string();
        Ok(self.insert(parent, name, ItemKind::File, true, source.clone()))
    }

    fn add_file_copy(&self, parent: Option<NodeId>, source: &TreePath) -> Result<NodeId> {
        self.check_parent_is_folder(parent)?;
        let name = source.file_name().unwrap_or_default().to_string();
        let absolute = self.collection_dir(parent).join(&name);
        Ok(self.insert(parent, name, ItemKind::File, false, absolute))
    }

    fn add_folder(&self, parent: Option<NodeId>, name: &str) -> Result<NodeId> {
        self.check_parent_is_folder(parent)?;
        let absolute = self.collection_dir(parent).join(name);
        self.inner
            .borrow_mut()
            .physical_dirs
            .insert(absolute.as_str().to_string());
        Ok(self.insert(parent, name.to_string(), ItemKind::Folder, false, absolute))
    }

    fn add_directory(&self, parent: Option<NodeId>, path: &TreePath) -> Result<NodeId> {
        self.check_parent_is_folder(parent)?;
        if !self.directory_exists(path) {
            return Err(Error::invalid_operation(format!(
                "directory does not exist on disk: {path}"
            )));
        }
        let name = path.file_name().unwrap_or_default().to_string();
        Ok(self.insert(parent, name, ItemKind::Folder, false, path.clone()))
    }

    fn remove(&self, node: NodeId) -> Result<()> {
        self.live(node)?;
        let mut inner = self.inner.borrow_mut();

        // Detach from the parent collection first.
        let parent = inner.nodes[node.0 as usize].parent;
        match parent {
            Some(p) => {
                let children = &mut inner.nodes[p as usize].children;
                children.retain(|&id| id != node.0);
            }
            None => inner.roots.retain(|&id| id != node.0),
        }

        // Removing a folder removes its subtree from the project.
        let mut pending = vec![node.0];
        while let Some(id) = pending.pop() {
            let n = &mut inner.nodes[id as usize];
            n.removed = true;
            pending.extend(n.children.iter().copied());
        }
        Ok(())
    }

    fn property(&self, node: NodeId, key: &str) -> Result<Option<String>> {
        self.known(node)?;
        Ok(self.inner.borrow().nodes[node.0 as usize]
            .properties
            .get(key)
            .cloned())
    }

    fn set_property(&self, node: NodeId, key: &str, value: &str) -> Result<()> {
        self.live(node)?;
        self.inner.borrow_mut().nodes[node.0 as usize]
            .properties
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn run_code_generator(&self, node: NodeId) -> Result<()> {
        self.live(node)?;
        let mut inner = self.inner.borrow_mut();
        if inner.nodes[node.0 as usize].kind != ItemKind::File {
            return Err(Error::invalid_operation(
                "code generators only run on files",
            ));
        }
        let absolute = inner.nodes[node.0 as usize].absolute.as_str().to_string();
        inner.generator_runs.push(absolute);
        Ok(())
    }
}

/// An in-memory [`Solution`] holding [`MemoryProject`]s.
#[derive(Debug, Default)]
pub struct MemorySolution {
    projects: Vec<MemoryProject>,
}

impl MemorySolution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(mut self, project: MemoryProject) -> Self {
        self.projects.push(project);
        self
    }

    pub fn add_project(&mut self, project: MemoryProject) {
        self.projects.push(project);
    }

    /// Concrete access for fixtures and assertions.
    pub fn project(&self, name: &str) -> Option<&MemoryProject> {
        self.projects.iter().find(|p| p.name == name)
    }
}

impl Solution for MemorySolution {
    fn projects(&self) -> Vec<&dyn ProjectTree> {
        self.projects
            .iter()
            .map(|p| p as &dyn ProjectTree)
            .collect()
    }
}
