//! Error types for planning requests.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors returned by the planner's fallible entry points.
///
/// A cyclic requirement graph is not an error: the plan is still produced
/// and the cycle is reported in its diagnostics.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// The input failed validation. Holds every problem found.
    #[error("invalid input: {}", join_messages(.0))]
    Validation(Vec<ValidationError>),

    /// The input is not parseable JSON, or did not match the expected shape.
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl PlannerError {
    /// Validation problems, if this is a validation failure.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            PlannerError::Validation(errors) => errors,
            PlannerError::Json(_) => &[],
        }
    }
}

impl From<Vec<ValidationError>> for PlannerError {
    fn from(errors: Vec<ValidationError>) -> Self {
        PlannerError::Validation(errors)
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
