use serde::Deserialize;
use thiserror::Error;

/// One field-level problem reported by the server's request validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub path: String,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Unauthorized - token may be expired")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("{message}")]
    Validation {
        message: String,
        fields: Vec<FieldIssue>,
    },

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Error body returned by the camp API: `{ "message": ..., "errors": [...] }`.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    errors: Vec<IssueBody>,
}

#[derive(Debug, Deserialize)]
struct IssueBody {
    #[serde(default)]
    path: Vec<serde_json::Value>,
    #[serde(default)]
    message: String,
}

impl IssueBody {
    fn into_issue(self) -> FieldIssue {
        let path = self
            .path
            .iter()
            .map(|p| match p {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(".");
        FieldIssue {
            path,
            message: self.message,
        }
    }
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!(
                "{}... (truncated, {} total bytes)",
                &body[..end],
                body.len()
            )
        }
    }

    /// Prefer the server-provided message; fall back to the raw body.
    fn server_message(body: &ErrorBody, raw: &str) -> String {
        body.message
            .clone()
            .or_else(|| body.error.clone())
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| Self::truncate_body(raw))
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        let message = Self::server_message(&parsed, body);
        match status.as_u16() {
            400 | 422 => ApiError::Validation {
                message,
                fields: parsed.errors.into_iter().map(IssueBody::into_issue).collect(),
            },
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(message),
            404 => ApiError::NotFound(message),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(message),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, message)),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }

    /// Text to show the operator, verbatim from the server where it sent one.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Validation { message, fields } if !fields.is_empty() => {
                let details = fields
                    .iter()
                    .map(|f| {
                        if f.path.is_empty() {
                            f.message.clone()
                        } else {
                            format!("{}: {}", f.path, f.message)
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("; ");
                format!("{} ({})", message, details)
            }
            ApiError::ServerError(message)
            | ApiError::AccessDenied(message)
            | ApiError::NotFound(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_server_message_is_kept_verbatim() {
        let err = ApiError::from_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"message": "Failed to create agenda item"}"#,
        );
        assert_eq!(err.user_message(), "Failed to create agenda item");
    }

    #[test]
    fn test_validation_body_collects_field_issues() {
        let body = r#"{
            "message": "Validation error",
            "errors": [{"path": ["startTime"], "message": "Required"}, {"path": ["staffIds", 0], "message": "Expected number"}]
        }"#;
        match ApiError::from_status(StatusCode::BAD_REQUEST, body) {
            ApiError::Validation { message, fields } => {
                assert_eq!(message, "Validation error");
                assert_eq!(fields[0].path, "startTime");
                assert_eq!(fields[1].path, "staffIds.0");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_plain_text_body_is_truncated() {
        let body = "x".repeat(MAX_ERROR_BODY_LENGTH + 20);
        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, &body);
        let msg = err.user_message();
        assert!(msg.contains("truncated"));
        assert!(msg.len() < body.len() + 40);
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
        assert!(ApiError::from_status(StatusCode::NOT_FOUND, "{}").is_not_found());
        assert!(matches!(
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, ""),
            ApiError::RateLimited
        ));
    }
}
