//! Draw error taxonomy.
//!
//! Every failure surfaces as a [`DrawError`] variant; nothing is logged
//! and swallowed. Configuration problems fail before any modeling work,
//! infeasibility is reported with the final correction factor reached,
//! and validation failures abort the run before export.

use thiserror::Error;

use crate::ip::SolverError;
use crate::validation::ValidationError;

/// Top-level error for a draw run.
#[derive(Debug, Error)]
pub enum DrawError {
    /// Invalid configuration (heat count, roster, paths). Raised before
    /// any modeling work.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Every repair attempt up to the correction-factor bound was
    /// infeasible.
    #[error("no feasible start list after {attempts} attempts (correction factor reached {final_correction})")]
    Infeasible {
        /// Solve attempts made.
        attempts: u32,
        /// Largest correction factor tried.
        final_correction: u32,
    },

    /// The overall deadline elapsed between repair attempts.
    #[error("draw deadline exceeded after {attempts} attempts")]
    Timeout {
        /// Solve attempts completed before the deadline hit.
        attempts: u32,
    },

    /// The drawn start list failed post-solve validation; the assignment
    /// is discarded rather than exported.
    #[error("start list failed validation ({} issue(s))", .0.len())]
    Validation(Vec<ValidationError>),

    /// The external solver engine faulted (distinct from infeasibility).
    #[error("solver engine fault: {0}")]
    Solver(#[from] SolverError),

    /// File read/write failure at the import/export edge.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Malformed JSON at the import/settings edge.
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// XML rendering failure at the export edge.
    #[error("XML rendering failed: {0}")]
    Xml(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{ValidationError, ValidationErrorKind};

    #[test]
    fn test_infeasible_display() {
        let err = DrawError::Infeasible {
            attempts: 17,
            final_correction: 16,
        };
        let text = err.to_string();
        assert!(text.contains("17 attempts"));
        assert!(text.contains("16"));
    }

    #[test]
    fn test_validation_display_counts_issues() {
        let err = DrawError::Validation(vec![ValidationError::new(
            ValidationErrorKind::SlotCollision,
            "heat 0 slot 1 drawn twice",
        )]);
        assert!(err.to_string().contains("1 issue(s)"));
    }
}
