//! Automatic linking on project item changes
//!
//! Hosts report item changes as they happen; the auto-linker resolves the
//! configured source-to-target mappings for the changed project and runs an
//! incremental synchronization of the changed item only.

use treelink_config::Configuration;
use treelink_platform::{ProjectPlatform, classify};
use treelink_provider::{NodeId, ProjectTree, Solution};

use crate::Result;
use crate::linker::{Linker, ProjectItemAction};
use crate::message::MessageSink;

/// Reacts to host change notifications by linking the changed item into the
/// mapped target projects.
pub struct AutoLinker<'a> {
    solution: &'a dyn Solution,
    configuration: &'a Configuration,
    messages: Option<&'a dyn MessageSink>,
}

impl<'a> AutoLinker<'a> {
    pub fn new(solution: &'a dyn Solution, configuration: &'a Configuration) -> Self {
        Self {
            solution,
            configuration,
            messages: None,
        }
    }

    /// Report recoverable errors to this sink instead of the tracing default.
    pub fn with_message_sink(mut self, messages: &'a dyn MessageSink) -> Self {
        self.messages = Some(messages);
        self
    }

    /// Handle a change to an item of `source`.
    ///
    /// A no-op when automatic linking is disabled or no mapping names the
    /// source project. Mappings whose target project is not loaded in the
    /// solution are skipped with a warning.
    pub fn handle_project_item_change(
        &self,
        source: &dyn ProjectTree,
        item: NodeId,
        action: ProjectItemAction,
        old_name: Option<&str>,
    ) -> Result<()> {
        if !self.configuration.enable_auto_link {
            tracing::debug!("Skipping auto link because it is disabled");
            return Ok(());
        }

        let source_name = source.project_name();
        let targets: Vec<&dyn ProjectTree> = self
            .configuration
            .project_mappings
            .iter()
            .filter(|mapping| mapping.source_project.eq_ignore_ascii_case(&source_name))
            .filter_map(|mapping| {
                let target = self.solution.project_by_name(&mapping.target_project);
                if target.is_none() {
                    tracing::warn!(
                        "Mapped target project '{}' is not loaded in the solution",
                        mapping.target_project
                    );
                }
                target
            })
            .collect();

        if targets.is_empty() {
            tracing::debug!("No mapped target projects for '{source_name}'");
            return Ok(());
        }

        let mut linker =
            Linker::new(self.solution, source, targets, self.configuration)
                .remove_missing_files(true);
        if let Some(messages) = self.messages {
            linker = linker.with_message_sink(messages);
        }
        linker.handle_project_item_change(item, action, old_name)
    }
}

/// Make sure every base-platform project in the solution has a root project
/// entry in the configuration, so its rules can be edited right away.
///
/// Returns `true` when an entry was added and the configuration needs saving.
pub fn ensure_root_projects(
    configuration: &mut Configuration,
    solution: &dyn Solution,
) -> bool {
    let mut changed = false;
    for project in solution.projects() {
        let name = project.project_name();
        if classify(&name) != ProjectPlatform::BASE {
            continue;
        }
        if configuration.root_projects.iter().any(|root| root.name == name) {
            continue;
        }
        tracing::debug!("Adding root project entry for '{name}'");
        configuration
            .root_projects
            .push(treelink_config::RootProjectConfig::new(name));
        changed = true;
    }
    changed
}
