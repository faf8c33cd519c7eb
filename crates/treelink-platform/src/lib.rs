//! Platform tag classification for treelink
//!
//! Multi-target solutions encode the target platform in the project name by
//! convention (`Catel.Core.NET40`, `Catel.Core.WP7`, ...). This crate derives
//! a [`ProjectPlatform`] from a project name, strips platform suffixes to
//! recover the shared base name, and defines the rank order used by the
//! relation resolver's smart fall-down.

pub mod error;

pub use error::{Error, Result};

use serde::{Deserialize, Serialize};

/// A target platform tag embedded in a project name.
///
/// The declaration order is significant: [`ProjectPlatform::rank`] follows it,
/// and smart fall-down only links to platforms ranked above the root's own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProjectPlatform {
    #[serde(rename = "NET35")]
    Net35,
    #[serde(rename = "NET40")]
    Net40,
    #[serde(rename = "NET45")]
    Net45,
    #[serde(rename = "SL4")]
    Sl4,
    #[serde(rename = "SL5")]
    Sl5,
    #[serde(rename = "WP7")]
    Wp7,
    /// Deprecated. Still parses for backward compatibility but is excluded
    /// from [`ProjectPlatform::available`].
    #[serde(rename = "WP8")]
    Wp8,
    #[serde(rename = "WIN80")]
    Win80,
    #[serde(rename = "WIN81")]
    Win81,
}

impl ProjectPlatform {
    /// Every declared platform tag, deprecated ones included.
    pub const ALL: [ProjectPlatform; 9] = [
        ProjectPlatform::Net35,
        ProjectPlatform::Net40,
        ProjectPlatform::Net45,
        ProjectPlatform::Sl4,
        ProjectPlatform::Sl5,
        ProjectPlatform::Wp7,
        ProjectPlatform::Wp8,
        ProjectPlatform::Win80,
        ProjectPlatform::Win81,
    ];

    /// The lowest-common-denominator platform a root project defaults to.
    pub const BASE: ProjectPlatform = ProjectPlatform::Net35;

    /// The canonical tag string as it appears in project names.
    pub fn tag(&self) -> &'static str {
        match self {
            ProjectPlatform::Net35 => "NET35",
            ProjectPlatform::Net40 => "NET40",
            ProjectPlatform::Net45 => "NET45",
            ProjectPlatform::Sl4 => "SL4",
            ProjectPlatform::Sl5 => "SL5",
            ProjectPlatform::Wp7 => "WP7",
            ProjectPlatform::Wp8 => "WP8",
            ProjectPlatform::Win80 => "WIN80",
            ProjectPlatform::Win81 => "WIN81",
        }
    }

    /// Total order used for smart fall-down comparisons. Stable across a
    /// process run, driven by the declaration order.
    pub fn rank(&self) -> u32 {
        *self as u32
    }

    /// The platforms available for candidate enumeration and selection.
    ///
    /// A filtered view over [`ProjectPlatform::ALL`] that excludes deprecated
    /// tags (currently WP8).
    pub fn available() -> impl Iterator<Item = ProjectPlatform> {
        Self::ALL
            .into_iter()
            .filter(|platform| !platform.is_deprecated())
    }

    /// Whether this tag is deprecated.
    pub fn is_deprecated(&self) -> bool {
        matches!(self, ProjectPlatform::Wp8)
    }
}

impl std::fmt::Display for ProjectPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl std::str::FromStr for ProjectPlatform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|platform| platform.tag() == s)
            .ok_or_else(|| Error::UnknownTag { tag: s.to_string() })
    }
}

/// All tags ordered longest-first, so a tag that is a substring of another
/// can never shadow it during classification.
fn tags_longest_first() -> Vec<ProjectPlatform> {
    let mut tags = ProjectPlatform::ALL.to_vec();
    tags.sort_by(|a, b| b.tag().len().cmp(&a.tag().len()));
    tags
}

/// Derive the platform of a project from its name.
///
/// Scans the known tags (longest first, deprecated tags included so legacy
/// names keep classifying) and returns the first one found as a substring.
/// Falls back to [`ProjectPlatform::BASE`] when no tag matches.
pub fn classify(project_name: &str) -> ProjectPlatform {
    tags_longest_first()
        .into_iter()
        .find(|platform| project_name.contains(platform.tag()))
        .unwrap_or(ProjectPlatform::BASE)
}

/// Strip every known platform tag from `name` and trim a trailing `'.'`.
///
/// `strip_platform_suffix("Catel.Core.NET35")` yields `"Catel.Core"`; a name
/// without a tag is returned unchanged, so the operation is idempotent.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] when `name` is empty or whitespace-only.
pub fn strip_platform_suffix(name: &str) -> Result<String> {
    if name.trim().is_empty() {
        return Err(Error::invalid_argument("name must not be empty"));
    }

    let mut stripped = name.to_string();
    for platform in tags_longest_first() {
        stripped = stripped.replace(platform.tag(), "");
    }

    Ok(stripped
        .strip_suffix('.')
        .map(str::to_string)
        .unwrap_or(stripped))
}
