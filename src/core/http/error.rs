//! API error types

use serde::{Deserialize, Serialize};

/// One entry of a validation failure list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub msg: String,
    #[serde(default)]
    pub loc: Vec<serde_json::Value>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// The backend's `detail` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Validation(Vec<ValidationIssue>),
    Other(serde_json::Value),
}

impl ErrorDetail {
    /// Human-readable text; validation lists yield their first message.
    pub fn message(&self) -> Option<String> {
        match self {
            ErrorDetail::Message(msg) if !msg.is_empty() => Some(msg.clone()),
            ErrorDetail::Message(_) => None,
            ErrorDetail::Validation(issues) => issues.first().map(|i| i.msg.clone()),
            ErrorDetail::Other(value) => value
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: Option<ErrorDetail>,
}

/// Transport-level failures, before any HTTP status is known.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    #[error("Request timed out")]
    Timeout,

    #[error("{0}")]
    Network(String),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// The session was rejected and has been discarded.
    #[error("Your session has expired. Please sign in again.")]
    Unauthorized,

    #[error("{}", status_message(.status, .detail))]
    Status {
        status: u16,
        detail: Option<ErrorDetail>,
    },

    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Invalid request: {0}")]
    Encode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn detail(&self) -> Option<&ErrorDetail> {
        match self {
            ApiError::Status { detail, .. } => detail.as_ref(),
            _ => None,
        }
    }

    /// Timeouts, network failures and 5xx responses may succeed on a manual retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Timeout | ApiError::Network(_) => true,
            ApiError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// The backend's detail message, or `fallback` when there is none.
    pub fn message_or(&self, fallback: &str) -> String {
        self.detail()
            .and_then(ErrorDetail::message)
            .unwrap_or_else(|| fallback.to_string())
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout => ApiError::Timeout,
            TransportError::Network(msg) => ApiError::Network(msg),
        }
    }
}

fn status_message(status: &u16, detail: &Option<ErrorDetail>) -> String {
    match detail.as_ref().and_then(ErrorDetail::message) {
        Some(msg) => msg,
        None if *status >= 500 => format!("Server error ({})", status),
        None => format!("Request failed ({})", status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_shapes() {
        let msg: ErrorDetail = serde_json::from_str(r#""Incorrect email or password""#).unwrap();
        assert_eq!(msg.message().as_deref(), Some("Incorrect email or password"));

        let list: ErrorDetail = serde_json::from_str(
            r#"[{"loc":["body","email"],"msg":"value is not a valid email address","type":"value_error"}]"#,
        )
        .unwrap();
        assert!(matches!(list, ErrorDetail::Validation(_)));
        assert_eq!(list.message().as_deref(), Some("value is not a valid email address"));

        let other: ErrorDetail = serde_json::from_str(r#"{"code":7}"#).unwrap();
        assert_eq!(other.message(), None);
    }

    #[test]
    fn test_display_uses_detail() {
        let err = ApiError::Status {
            status: 400,
            detail: Some(ErrorDetail::Message("Email already registered".to_string())),
        };
        assert_eq!(err.to_string(), "Email already registered");

        let err = ApiError::Status {
            status: 503,
            detail: None,
        };
        assert_eq!(err.to_string(), "Server error (503)");
    }

    #[test]
    fn test_retryable() {
        assert!(ApiError::Timeout.is_retryable());
        assert!(ApiError::Network("offline".into()).is_retryable());
        assert!(
            ApiError::Status {
                status: 500,
                detail: None
            }
            .is_retryable()
        );
        assert!(
            !ApiError::Status {
                status: 404,
                detail: None
            }
            .is_retryable()
        );
        assert!(!ApiError::Unauthorized.is_retryable());
    }

    #[test]
    fn test_message_or_fallback() {
        assert_eq!(ApiError::Timeout.message_or("Login failed"), "Login failed");
    }
}
