use std::fmt;

use thiserror::Error;

use crate::agenda::export::ExportError;
use crate::agenda::validator::ValidationError;
use crate::api::ApiError;

/// Why an agenda operation was aborted.
///
/// Validation failures never reach the network. API failures carry the
/// server's message. Neither is retried.
#[derive(Error, Debug)]
pub enum AgendaError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
}

impl AgendaError {
    /// Toast text for the operator.
    pub fn user_message(&self) -> String {
        match self {
            AgendaError::Validation(e) => e.to_string(),
            AgendaError::Api(e) => e.user_message(),
            AgendaError::Export(e) => format!("Export failed: {}", e),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AgendaError::Validation(_))
    }
}

/// A "nothing to do" condition. Reported to the operator, but not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    NoTargetDays,
    NothingToExport,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::NoTargetDays => write!(f, "Select at least one day to copy to"),
            Notice::NothingToExport => write!(f, "Nothing to export: this camp has no sessions yet"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_passes_through() {
        let err = AgendaError::from(ValidationError::MissingTitle);
        assert!(err.is_validation());
        assert_eq!(err.user_message(), "Title is required");
    }

    #[test]
    fn test_notice_text() {
        assert!(Notice::NothingToExport.to_string().starts_with("Nothing to export"));
    }
}
