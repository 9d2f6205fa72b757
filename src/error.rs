//! Error type shared by every grading operation.

use rust_decimal::Decimal;

/// Failures surfaced by the grading engine.
///
/// Lookups against the registry return `Option`; the variants below are what
/// callers see once an absent entry has been turned into a domain error.
#[derive(Debug, thiserror::Error)]
pub enum GradeError {
    #[error("grading system not found: {id}")]
    GradingSystemNotFound { id: String },

    #[error("grade converter not found: {from} -> {to}")]
    ConverterNotFound { from: String, to: String },

    #[error("no range in grading system {system} contains {value}")]
    Classification { value: Decimal, system: String },

    #[error("text value '{label}' not found in grading system {system}")]
    LabelNotFound { label: String, system: String },

    #[error("cannot compute {0}")]
    CannotCompute(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("grade book is at its limit of {limit} grades")]
    BookFull { limit: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl GradeError {
    pub(crate) fn system_not_found(id: &str) -> Self {
        GradeError::GradingSystemNotFound { id: id.to_string() }
    }

    pub(crate) fn label_not_found(label: &str, system: &str) -> Self {
        GradeError::LabelNotFound {
            label: label.to_string(),
            system: system.to_string(),
        }
    }

    /// True for the two registry "not found" kinds.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            GradeError::GradingSystemNotFound { .. } | GradeError::ConverterNotFound { .. }
        )
    }
}

pub type Result<T, E = GradeError> = std::result::Result<T, E>;
