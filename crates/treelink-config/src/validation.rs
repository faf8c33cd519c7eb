//! Structural validation for configuration models
//!
//! Validation results are plain data handed to the UI layer, never errors.
//! An invalid model is still a usable value; the engine simply should not be
//! run against one.

use crate::model::{Configuration, ProjectMapping, RootProjectConfig, Rule};

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// A required field is missing or malformed.
    Field {
        field: &'static str,
        message: String,
    },
    /// A cross-field business rule is violated.
    BusinessRule { message: String },
}

impl ValidationIssue {
    pub fn field(field: &'static str, message: impl Into<String>) -> Self {
        Self::Field {
            field,
            message: message.into(),
        }
    }

    pub fn business_rule(message: impl Into<String>) -> Self {
        Self::BusinessRule {
            message: message.into(),
        }
    }
}

/// Structural validation producing a list of findings.
pub trait Validate {
    fn validate(&self) -> Vec<ValidationIssue>;

    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

impl Validate for Rule {
    fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        if self.name.trim().is_empty() {
            issues.push(ValidationIssue::field("name", "Name is required"));
        }
        issues
    }
}

impl Validate for RootProjectConfig {
    fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        if self.name.trim().is_empty() {
            issues.push(ValidationIssue::field("name", "Name is required"));
        }
        for rule in &self.rules {
            issues.extend(rule.validate());
        }
        issues
    }
}

impl Validate for ProjectMapping {
    fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if self.source_project.trim().is_empty() {
            issues.push(ValidationIssue::field(
                "source_project",
                "Source project is required",
            ));
        }
        if self.target_project.trim().is_empty() {
            issues.push(ValidationIssue::field(
                "target_project",
                "Target project is required",
            ));
        }

        if !self.source_project.trim().is_empty()
            && !self.target_project.trim().is_empty()
            && self.source_project == self.target_project
        {
            issues.push(ValidationIssue::business_rule(
                "Source and target project cannot be the same project",
            ));
        }

        issues
    }
}

impl Validate for Configuration {
    fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        for root in &self.root_projects {
            issues.extend(root.validate());
        }
        for mapping in &self.project_mappings {
            issues.extend(mapping.validate());
        }
        issues
    }
}
