//! Related-project resolution
//!
//! A multi-target group is a set of sibling projects sharing a base name and
//! differing only by platform tag (`Catel.Core.NET35`, `Catel.Core.WP7`, ...).
//! The resolver enumerates the group for a root project and answers whether a
//! linked file is backed by a physical file in one of them, which is what
//! makes the file safe to remove elsewhere.

use treelink_platform::{ProjectPlatform, classify, strip_platform_suffix};
use treelink_provider::{ItemKind, NodeId, ProjectTree, Solution};

use crate::Result;
use crate::session::SyncSession;

/// Resolve the related projects of `root`.
///
/// With `smart_fall_down` only projects whose platform ranks above the
/// root's own are returned: more specific SKUs link down from a
/// lowest-common-denominator root, never the other way around. The root
/// itself is never included, and a project outside any solution container
/// has no related projects.
///
/// The result follows the project sort order: grouped by base name, by
/// platform rank within a group, alphabetical across groups.
pub fn related_projects<'a>(
    solution: &'a dyn Solution,
    root: &dyn ProjectTree,
    smart_fall_down: bool,
) -> Result<Vec<&'a dyn ProjectTree>> {
    if !root.in_solution_container() {
        return Ok(Vec::new());
    }

    let root_name = root.project_name();
    let base_name = strip_platform_suffix(&root_name)?;
    let root_platform = classify(&root_name);

    let mut related = Vec::new();
    for platform in ProjectPlatform::available() {
        let candidate_name = format!("{}.{}", base_name, platform.tag());
        if candidate_name == root_name {
            continue;
        }

        let Some(candidate) = solution.project_by_name(&candidate_name) else {
            continue;
        };

        if smart_fall_down {
            let candidate_platform = classify(&candidate.project_name());
            if candidate_platform.rank() > root_platform.rank() {
                related.push(candidate);
            }
        } else {
            related.push(candidate);
        }
    }

    Ok(sort_projects(related))
}

/// Sort projects by base name group, platform rank within the group, and
/// alphabetically across groups.
pub fn sort_projects<'a>(mut projects: Vec<&'a dyn ProjectTree>) -> Vec<&'a dyn ProjectTree> {
    projects.sort_by_key(|project| {
        let name = project.project_name();
        let base = strip_platform_suffix(&name).unwrap_or_else(|_| name.clone());
        (base, classify(&name).rank(), name)
    });
    projects
}

/// Whether `item` is an actual file in `project`: a physical (not linked)
/// item at the same root-relative position with the same absolute path.
pub fn is_actual_file_in_project(
    session: &SyncSession,
    tree: &dyn ProjectTree,
    item: NodeId,
    project: &dyn ProjectTree,
) -> Result<bool> {
    let relative = session.relative_name(tree, item)?;
    let absolute = tree.absolute_path(item)?;

    let mut pending: Vec<Option<NodeId>> = vec![None];
    while let Some(parent) = pending.pop() {
        for child in project.children(parent) {
            match project.kind(child)? {
                ItemKind::Folder => pending.push(Some(child)),
                ItemKind::File => {
                    if !project.is_linked(child)?
                        && session.relative_name(project, child)? == relative
                        && project.absolute_path(child)? == absolute
                    {
                        return Ok(true);
                    }
                }
            }
        }
    }
    Ok(false)
}

/// Whether `item` is an actual file in any of the related projects.
///
/// Generated files might be linked: names containing `.Designer` are always
/// treated as safe.
pub fn is_actual_file_in_any_related_project(
    session: &SyncSession,
    tree: &dyn ProjectTree,
    item: NodeId,
    related_projects: &[&dyn ProjectTree],
) -> Result<bool> {
    if tree.item_name(item)?.contains(".Designer") {
        return Ok(true);
    }

    for project in related_projects {
        if is_actual_file_in_project(session, tree, item, *project)? {
            return Ok(true);
        }
    }
    Ok(false)
}
