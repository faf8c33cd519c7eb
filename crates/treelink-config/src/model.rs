//! Configuration model: rules, root projects, and project mappings
//!
//! These are plain data holders. Structural validation lives in
//! [`crate::validation`]; the synchronization engine only reads them.

use serde::{Deserialize, Serialize};
use treelink_platform::ProjectPlatform;

/// What a rule suppresses: automatic adds or automatic removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleKind {
    DoNotAdd,
    DoNotRemove,
}

/// A configured exception for a specific root-relative path.
///
/// A rule applies to an item when the item's root-relative path equals
/// `name` (ordinal, case-sensitive) and the candidate target platform is in
/// `platforms`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Path relative to the root project (e.g. `"sub/secrets.config"`).
    pub name: String,
    pub kind: RuleKind,
    /// The target platforms the rule applies to.
    #[serde(default)]
    pub platforms: Vec<ProjectPlatform>,
}

impl Rule {
    pub fn new(
        name: impl Into<String>,
        kind: RuleKind,
        platforms: Vec<ProjectPlatform>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            platforms,
        }
    }

    /// Whether this rule covers the given target platform.
    pub fn applies_to(&self, platform: ProjectPlatform) -> bool {
        self.platforms.contains(&platform)
    }
}

/// Per-root-project rule set, looked up by exact project name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RootProjectConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl RootProjectConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
        }
    }

    /// Iterate the rules of the given kind, in configured order.
    pub fn rules_of_kind(&self, kind: RuleKind) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(move |rule| rule.kind == kind)
    }
}

/// An automatic link relationship used by the auto-link-on-change feature.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectMapping {
    #[serde(default)]
    pub source_project: String,
    #[serde(default)]
    pub target_project: String,
}

impl ProjectMapping {
    pub fn new(source_project: impl Into<String>, target_project: impl Into<String>) -> Self {
        Self {
            source_project: source_project.into(),
            target_project: target_project.into(),
        }
    }
}

/// The full per-solution configuration.
///
/// Loaded once per solution session, mutated by the UI, saved back. The
/// engine only reads it during a synchronization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub root_projects: Vec<RootProjectConfig>,
    #[serde(default)]
    pub project_mappings: Vec<ProjectMapping>,
    #[serde(default = "default_enable_auto_link")]
    pub enable_auto_link: bool,
}

fn default_enable_auto_link() -> bool {
    true
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            root_projects: Vec::new(),
            project_mappings: Vec::new(),
            enable_auto_link: true,
        }
    }
}

impl Configuration {
    /// Get the rule set for a root project by exact name match.
    ///
    /// An absent entry behaves as an empty rule set, never as an absence
    /// signal the caller has to handle.
    pub fn root_project(&self, name: &str) -> RootProjectConfig {
        self.root_projects
            .iter()
            .find(|root| root.name == name)
            .cloned()
            .unwrap_or_default()
    }
}
