//! Configuration model and store for treelink
//!
//! This crate holds the data that parameterizes a synchronization run:
//!
//! - **Rules**: per-path do-not-add / do-not-remove exceptions, scoped to
//!   target platforms
//! - **Root projects**: one rule set per root project name
//! - **Project mappings**: automatic link relationships for the
//!   auto-link-on-change feature
//!
//! Validation is data, not errors ([`Validate`]); persistence is a plain
//! TOML file next to the solution.

pub mod error;
pub mod model;
pub mod store;
pub mod validation;

pub use error::{Error, Result};
pub use model::{Configuration, ProjectMapping, RootProjectConfig, Rule, RuleKind};
pub use validation::{Validate, ValidationIssue};
