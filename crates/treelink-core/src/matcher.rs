//! Rule evaluation against candidate item paths
//!
//! Pure functions of (item path, rule list, platform). Rule names mirror
//! exact root-relative paths, so the comparison is ordinal and
//! case-sensitive.

use treelink_config::{RootProjectConfig, RuleKind};
use treelink_platform::ProjectPlatform;

fn matches_rule(
    relative_path: &str,
    root_config: &RootProjectConfig,
    kind: RuleKind,
    target_platform: ProjectPlatform,
) -> bool {
    root_config
        .rules_of_kind(kind)
        .any(|rule| rule.name == relative_path && rule.applies_to(target_platform))
}

/// Whether a DoNotAdd rule suppresses adding this item to the target.
pub fn should_skip_add(
    relative_path: &str,
    root_config: &RootProjectConfig,
    target_platform: ProjectPlatform,
) -> bool {
    matches_rule(relative_path, root_config, RuleKind::DoNotAdd, target_platform)
}

/// Whether a DoNotRemove rule suppresses removing this item from the target.
pub fn should_skip_remove(
    relative_path: &str,
    root_config: &RootProjectConfig,
    target_platform: ProjectPlatform,
) -> bool {
    matches_rule(
        relative_path,
        root_config,
        RuleKind::DoNotRemove,
        target_platform,
    )
}
