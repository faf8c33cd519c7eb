//! The linker that does the actual work of mirroring project trees
//!
//! A two-phase walk per target project: the add phase creates linked
//! references (or physical copies where the host cannot link) for every
//! source item missing from the target; the remove phase prunes target items
//! whose source disappeared, unless a rule, a file filter, or a physical
//! sibling copy protects them.

use treelink_config::{Configuration, RootProjectConfig};
use treelink_platform::{ProjectPlatform, classify};
use treelink_provider::{ItemKind, NodeId, ProjectTree, ProjectTreeExt, Solution, TreePath};

use crate::message::{MessageSink, TracingMessageSink};
use crate::resolver::{is_actual_file_in_any_related_project, related_projects};
use crate::session::SyncSession;
use crate::{Error, Result, matcher};

/// What happened to a project item, as reported by the host's change
/// notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectItemAction {
    Add,
    Rename,
    Remove,
}

/// Walk the whole tree.
const ALL_LEVELS: i32 = -1;

/// The marker value of the resource code generator on items that need a
/// re-run after linking.
const RESX_CODE_GENERATOR: &str = "ResXFileCodeGenerator";

static DEFAULT_SINK: TracingMessageSink = TracingMessageSink;

/// Synchronizes one root project's tree into a set of target projects.
pub struct Linker<'a> {
    solution: &'a dyn Solution,
    root: &'a dyn ProjectTree,
    targets: Vec<&'a dyn ProjectTree>,
    configuration: &'a Configuration,
    messages: &'a dyn MessageSink,
    remove_missing_files: bool,
}

impl<'a> Linker<'a> {
    pub fn new(
        solution: &'a dyn Solution,
        root: &'a dyn ProjectTree,
        targets: Vec<&'a dyn ProjectTree>,
        configuration: &'a Configuration,
    ) -> Self {
        Self {
            solution,
            root,
            targets,
            configuration,
            messages: &DEFAULT_SINK,
            remove_missing_files: false,
        }
    }

    /// Report recoverable errors to this sink instead of the tracing default.
    pub fn with_message_sink(mut self, messages: &'a dyn MessageSink) -> Self {
        self.messages = messages;
        self
    }

    /// When enabled, linked files missing from the source are pruned from
    /// the targets. Files that are not linked are never deleted.
    pub fn remove_missing_files(mut self, remove: bool) -> Self {
        self.remove_missing_files = remove;
        self
    }

    /// Mirror the root tree into every target project, in caller order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] when the root project has no name.
    pub fn link_files(&self) -> Result<()> {
        self.validate_root()?;

        tracing::debug!(
            "Linking {} projects to {}",
            self.targets.len(),
            self.root.project_name()
        );

        let session = SyncSession::new();
        let root_config = self.root_project_configuration();

        for target in &self.targets {
            tracing::debug!("Linking project {}", target.project_name());
            self.synchronize(&session, &root_config, *target)?;
        }

        tracing::debug!("Linked {} projects", self.targets.len());
        Ok(())
    }

    /// Incremental entry point for host change notifications.
    ///
    /// Touches only the changed item's level: the file filter protects the
    /// item's current (and, for renames, prior) relative path from removal
    /// while the single-level add/remove passes run.
    ///
    /// For a remove notification the host hands out a detached item that
    /// still answers name and path queries; the engine only needs those.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] when a rename carries no old name.
    pub fn handle_project_item_change(
        &self,
        item: NodeId,
        action: ProjectItemAction,
        old_name: Option<&str>,
    ) -> Result<()> {
        self.validate_root()?;

        if action == ProjectItemAction::Rename
            && old_name.is_none_or(|name| name.trim().is_empty())
        {
            return Err(Error::invalid_argument(
                "old_name is required for a rename",
            ));
        }

        tracing::debug!(
            "Linking {} projects to {}",
            self.targets.len(),
            self.root.project_name()
        );

        let session = SyncSession::new();
        let root_config = self.root_project_configuration();

        let relative = session.relative_name(self.root, item)?;
        let mut file_filter = vec![relative.clone()];
        if let Some(old_name) = old_name.filter(|name| !name.trim().is_empty()) {
            // The prior path shares the changed item's parent collection.
            let item_name = self.root.item_name(item)?;
            let parent_prefix = &relative[..relative.len() - item_name.len()];
            file_filter.push(format!("{parent_prefix}{old_name}"));
        }

        let source_parent = self.root.parent(item)?;

        for target in &self.targets {
            tracing::debug!("Linking project {}", target.project_name());

            let platform = classify(&target.project_name());
            let target_parent = self.target_items_for(&session, source_parent, *target)?;

            match action {
                ProjectItemAction::Add => {
                    self.add_files_and_folders(
                        &session,
                        &root_config,
                        source_parent,
                        *target,
                        target_parent,
                        platform,
                        1,
                        &file_filter,
                    )?;
                }
                ProjectItemAction::Rename => {
                    self.remove_files_and_folders(
                        &session,
                        &root_config,
                        source_parent,
                        *target,
                        target_parent,
                        platform,
                        1,
                        &file_filter,
                    )?;
                    self.add_files_and_folders(
                        &session,
                        &root_config,
                        source_parent,
                        *target,
                        target_parent,
                        platform,
                        1,
                        &file_filter,
                    )?;
                }
                ProjectItemAction::Remove => {
                    self.remove_files_and_folders(
                        &session,
                        &root_config,
                        source_parent,
                        *target,
                        target_parent,
                        platform,
                        1,
                        &file_filter,
                    )?;
                }
            }
        }

        tracing::debug!("Linked {} projects", self.targets.len());
        Ok(())
    }

    /// Full synchronization of one target: add phase over the whole tree,
    /// then the remove phase when pruning is enabled.
    fn synchronize(
        &self,
        session: &SyncSession,
        root_config: &RootProjectConfig,
        target: &dyn ProjectTree,
    ) -> Result<()> {
        let platform = classify(&target.project_name());

        tracing::debug!(
            "Synchronizing source '{}' to target '{}'",
            self.root.project_name(),
            target.project_name()
        );

        self.add_files_and_folders(
            session,
            root_config,
            None,
            target,
            None,
            platform,
            ALL_LEVELS,
            &[],
        )?;

        if self.remove_missing_files {
            self.remove_files_and_folders(
                session,
                root_config,
                None,
                target,
                None,
                platform,
                ALL_LEVELS,
                &[],
            )?;
        }

        tracing::debug!(
            "Synchronized source '{}' to target '{}'",
            self.root.project_name(),
            target.project_name()
        );
        Ok(())
    }

    /// Add phase over one collection level.
    ///
    /// `levels` bounds the recursion depth: `-1` is unlimited, `1` touches
    /// this level only (the incremental handler), `0` stops.
    #[allow(clippy::too_many_arguments)]
    fn add_files_and_folders(
        &self,
        session: &SyncSession,
        root_config: &RootProjectConfig,
        source_parent: Option<NodeId>,
        target: &dyn ProjectTree,
        target_parent: Option<NodeId>,
        platform: ProjectPlatform,
        levels: i32,
        file_filter: &[String],
    ) -> Result<()> {
        if levels == 0 {
            return Ok(());
        }
        let levels = levels - 1;

        for source_item in self.root.children(source_parent) {
            // A file linked into the source tree has another root project;
            // it is not re-propagated transitively.
            if self.root.is_linked(source_item)? {
                tracing::debug!(
                    "Skipping item '{}' because it is a linked file",
                    self.root.item_name(source_item)?
                );
                continue;
            }

            let relative = session.relative_name(self.root, source_item)?;
            if matcher::should_skip_add(&relative, root_config, platform) {
                tracing::debug!(
                    "Skipping item '{relative}' because it is ignored by a rule for target project {platform}"
                );
                continue;
            }

            let name = self.root.item_name(source_item)?;
            let is_folder = self.root.kind(source_item)? == ItemKind::Folder;
            let mut target_item = target.child_by_name(target_parent, &name)?;

            if target_item.is_none() {
                if is_folder {
                    target_item =
                        Some(self.resolve_target_folder(target, target_parent, &relative, &name)?);
                } else {
                    target_item = self.create_target_file(
                        source_item,
                        target,
                        target_parent,
                        platform,
                    )?;
                }
            }

            if self.is_resource_file(source_item)?
                && let Some(existing) = target_item
            {
                self.synchronize_resource_properties(source_item, target, existing)?;
            }

            if is_folder && let Some(existing) = target_item {
                self.add_files_and_folders(
                    session,
                    root_config,
                    Some(source_item),
                    target,
                    Some(existing),
                    platform,
                    levels,
                    file_filter,
                )?;
            }
        }

        Ok(())
    }

    /// Create the target-side item for a source file.
    ///
    /// Returns `None` when link creation failed; the failure has been
    /// reported and the caller continues with the remaining items.
    fn create_target_file(
        &self,
        source_item: NodeId,
        target: &dyn ProjectTree,
        target_parent: Option<NodeId>,
        platform: ProjectPlatform,
    ) -> Result<Option<NodeId>> {
        let source_path = self.root.absolute_path(source_item)?;

        let is_xaml = source_path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xaml"));
        if is_xaml
            && matches!(platform, ProjectPlatform::Net40 | ProjectPlatform::Net45)
        {
            // The host cannot resolve linked XAML at design time on these
            // platforms, so a physical copy is created instead.
            tracing::debug!(
                "File '{source_path}' is a xaml file and the target platform is {platform}; creating a copy instead of a link"
            );
            return Ok(Some(target.add_file_copy(target_parent, &source_path)?));
        }

        tracing::debug!("Adding link to file '{source_path}'");
        match target.add_linked_file(target_parent, &source_path) {
            Ok(node) => Ok(Some(node)),
            Err(e) => {
                let error = Error::from(e);
                self.messages.show_error(&error);
                Ok(None)
            }
        }
    }

    /// Resolve or create the target folder mirroring a source folder.
    ///
    /// When the directory already physically exists at the computed target
    /// path (a sibling related project created it), attach to it instead of
    /// creating a duplicate folder object.
    fn resolve_target_folder(
        &self,
        target: &dyn ProjectTree,
        target_parent: Option<NodeId>,
        relative: &str,
        name: &str,
    ) -> Result<NodeId> {
        let target_dir = join_relative(&target.project_dir(), relative);

        tracing::debug!("Adding folder '{target_dir}'");
        if target.directory_exists(&target_dir) {
            Ok(target.add_directory(target_parent, &target_dir)?)
        } else {
            Ok(target.add_folder(target_parent, name)?)
        }
    }

    /// Remove phase over one collection level.
    ///
    /// Children are snapshotted before any decision; removals apply to the
    /// live collection afterwards, so index shifts cannot occur.
    #[allow(clippy::too_many_arguments)]
    fn remove_files_and_folders(
        &self,
        session: &SyncSession,
        root_config: &RootProjectConfig,
        source_parent: Option<NodeId>,
        target: &dyn ProjectTree,
        target_parent: Option<NodeId>,
        platform: ProjectPlatform,
        levels: i32,
        file_filter: &[String],
    ) -> Result<()> {
        if levels == 0 {
            return Ok(());
        }
        let levels = levels - 1;

        let snapshot = target.children(target_parent);
        let mut related: Option<Vec<&dyn ProjectTree>> = None;
        let mut removals = Vec::new();

        for target_item in snapshot {
            let relative = session.relative_name(target, target_item)?;
            if matcher::should_skip_remove(&relative, root_config, platform) {
                tracing::debug!(
                    "Skipping item '{relative}' because it is ignored by a rule for target project {platform}"
                );
                continue;
            }

            let target_name = target.item_name(target_item)?;
            let existing_source = self.source_child_named(source_parent, &target_name)?;

            if let Some(source_item) = existing_source
                && !file_filter
                    .iter()
                    .any(|filtered| filtered.eq_ignore_ascii_case(&relative))
            {
                // Still wanted, unless the source item itself is now excluded
                // from being added.
                let source_relative = session.relative_name(self.root, source_item)?;
                if !matcher::should_skip_add(&source_relative, root_config, platform) {
                    self.remove_files_and_folders(
                        session,
                        root_config,
                        Some(source_item),
                        target,
                        Some(target_item),
                        platform,
                        levels,
                        file_filter,
                    )?;
                    continue;
                }

                tracing::debug!(
                    "Found linked file '{relative}' that is now ignored by a rule, removing it"
                );
            }

            if related.is_none() {
                related = Some(related_projects(self.solution, self.root, false)?);
            }
            let related_projects = related.as_deref().unwrap_or(&[]);

            match target.kind(target_item)? {
                ItemKind::Folder => {
                    self.remove_nested_items(session, target, target_item, related_projects)?;

                    if target.children(Some(target_item)).is_empty() {
                        tracing::debug!(
                            "Removing folder '{relative}' because it no longer contains items"
                        );
                        removals.push(target_item);
                    }
                }
                ItemKind::File => {
                    // Only linked files are ever deleted, and never when the
                    // link is the last reference to a physical sibling copy.
                    if target.is_linked(target_item)?
                        && !is_actual_file_in_any_related_project(
                            session,
                            target,
                            target_item,
                            related_projects,
                        )?
                    {
                        tracing::debug!(
                            "Removing file '{relative}' because it is a linked file to the root project"
                        );
                        removals.push(target_item);
                    }
                }
            }
        }

        for node in removals {
            target.remove(node)?;
        }
        Ok(())
    }

    /// Strip orphaned nested items of a folder whose source no longer
    /// exists. Applies linked-file safety only; rules and file filters do
    /// not reach in here.
    fn remove_nested_items(
        &self,
        session: &SyncSession,
        target: &dyn ProjectTree,
        folder: NodeId,
        related_projects: &[&dyn ProjectTree],
    ) -> Result<()> {
        let snapshot = target.children(Some(folder));
        let mut removals = Vec::new();

        for item in snapshot {
            match target.kind(item)? {
                ItemKind::Folder => {
                    self.remove_nested_items(session, target, item, related_projects)?;

                    if target.children(Some(item)).is_empty() {
                        tracing::debug!(
                            "Removing folder '{}' because it no longer contains items",
                            target.item_name(item)?
                        );
                        removals.push(item);
                    }
                }
                ItemKind::File => {
                    if target.is_linked(item)?
                        && !is_actual_file_in_any_related_project(
                            session,
                            target,
                            item,
                            related_projects,
                        )?
                    {
                        removals.push(item);
                    }
                }
            }
        }

        for node in removals {
            target.remove(node)?;
        }
        Ok(())
    }

    /// Locate the target collection mirroring a source collection, creating
    /// missing folder levels on the way down.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] when `source_parent` is neither
    /// the project root nor a folder.
    fn target_items_for(
        &self,
        session: &SyncSession,
        source_parent: Option<NodeId>,
        target: &dyn ProjectTree,
    ) -> Result<Option<NodeId>> {
        let Some(parent) = source_parent else {
            return Ok(None);
        };

        if self.root.kind(parent)? != ItemKind::Folder {
            return Err(Error::invalid_argument("only folders are supported"));
        }

        let relative = session.relative_name(self.root, parent)?;
        let mut target_parent: Option<NodeId> = None;
        let mut target_dir = target.project_dir();

        for segment in relative.split('/').filter(|s| !s.is_empty()) {
            target_dir = target_dir.join(segment);

            let found = target
                .children(target_parent)
                .into_iter()
                .find_map(|child| {
                    let name = target.item_name(child).ok()?;
                    let kind = target.kind(child).ok()?;
                    (kind == ItemKind::Folder && name.eq_ignore_ascii_case(segment))
                        .then_some(child)
                });

            target_parent = Some(match found {
                Some(folder) => folder,
                None if target.directory_exists(&target_dir) => {
                    target.add_directory(target_parent, &target_dir)?
                }
                None => target.add_folder(target_parent, segment)?,
            });
        }

        Ok(target_parent)
    }

    /// A resource file carries the resource code generator as its custom
    /// tool and needs its generated code-behind refreshed after linking.
    fn is_resource_file(&self, item: NodeId) -> Result<bool> {
        Ok(self
            .root
            .property(item, "CustomTool")?
            .is_some_and(|tool| tool == RESX_CODE_GENERATOR))
    }

    /// Copy the custom tool properties onto the target item and re-run its
    /// code generator so the generated code-behind stays in sync.
    fn synchronize_resource_properties(
        &self,
        source_item: NodeId,
        target: &dyn ProjectTree,
        target_item: NodeId,
    ) -> Result<()> {
        tracing::debug!(
            "Synchronizing resource file properties for '{}'",
            self.root.item_name(source_item)?
        );

        for key in ["CustomTool", "CustomToolNamespace"] {
            if let Some(value) = self.root.property(source_item, key)? {
                target.set_property(target_item, key, &value)?;
            }
        }

        target.run_code_generator(target_item)?;
        Ok(())
    }

    /// Find a source child by name, case-insensitively (the remove phase
    /// mirrors the host's lenient name comparison).
    fn source_child_named(
        &self,
        source_parent: Option<NodeId>,
        name: &str,
    ) -> Result<Option<NodeId>> {
        for child in self.root.children(source_parent) {
            if self.root.item_name(child)?.eq_ignore_ascii_case(name) {
                return Ok(Some(child));
            }
        }
        Ok(None)
    }

    fn root_project_configuration(&self) -> RootProjectConfig {
        self.configuration.root_project(&self.root.project_name())
    }

    fn validate_root(&self) -> Result<()> {
        if self.root.project_name().trim().is_empty() {
            return Err(Error::invalid_argument("root project has no name"));
        }
        Ok(())
    }
}

/// Join a `/`-separated relative path onto a base directory.
fn join_relative(base: &TreePath, relative: &str) -> TreePath {
    let mut path = base.clone();
    for segment in relative.split('/').filter(|s| !s.is_empty()) {
        path = path.join(segment);
    }
    path
}
