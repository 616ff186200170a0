//! Result object for user-input validation that is expected to fail.

use serde::{Deserialize, Serialize};

/// Outcome of a validation pass. All failures are collected, not just the first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    pub fn valid() -> Self {
        Self::from_errors(Vec::new())
    }

    /// Errors joined for single-line messages.
    pub fn joined_errors(&self) -> String {
        self.errors.join(", ")
    }
}
