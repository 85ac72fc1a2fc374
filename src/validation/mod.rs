//! Validation of boundary payloads
//!
//! Validators work on the untyped `serde_json::Value` form, since their job
//! is to describe what is wrong with data that may not decode at all. They
//! never stop at the first problem: every applicable error is collected so a
//! caller gets the full report in one pass.

pub mod note;
pub mod policy;
pub mod timeline;

pub use note::validate_note;
pub use policy::{validate_and_warn, InvalidDataPolicy};
pub use timeline::validate_timeline;

use serde::Serialize;

/// Outcome of a validation pass
///
/// Errors are fatal to the data's validity. Warnings are advisory and do
/// not affect `is_valid`.
#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn success() -> Self {
        Self::default()
    }

    pub fn failure(errors: Vec<String>) -> Self {
        Self {
            errors,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Combine two results, keeping `self`'s entries first
    pub fn merge(mut self, other: ValidationResult) -> Self {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self
    }

    fn from_errors(errors: Vec<String>) -> Self {
        if errors.is_empty() {
            Self::success()
        } else {
            Self::failure(errors)
        }
    }
}
