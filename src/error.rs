use thiserror::Error;

use crate::validate::ValidationReport;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(ValidationReport),

    #[error("Request failed ({operation}): {message}")]
    RequestFailed {
        operation: &'static str,
        status: Option<u16>,
        message: String,
    },

    #[error("Malformed response ({operation}): {message}")]
    MalformedResponse {
        operation: &'static str,
        message: String,
    },

    #[error("A submission is already in progress")]
    SubmissionInProgress,

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Duplicate field key: {0}")]
    DuplicateFieldKey(String),

    #[error("Invalid pattern for field '{key}': {source}")]
    InvalidPattern {
        key: String,
        #[source]
        source: regex::Error,
    },

    #[error("Failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl From<figment::Error> for AppError {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl AppError {
    /// Network failures, non-success statuses and unparseable bodies all
    /// surface to the user as a failed request.
    pub fn is_request_failure(&self) -> bool {
        matches!(
            self,
            Self::RequestFailed { .. } | Self::MalformedResponse { .. }
        )
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => *status,
            _ => None,
        }
    }

    pub(crate) fn network(operation: &'static str, err: reqwest::Error) -> Self {
        Self::RequestFailed {
            operation,
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }

    pub(crate) fn malformed(operation: &'static str, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            operation,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_failure_classification() {
        let failed = AppError::RequestFailed {
            operation: "list",
            status: Some(500),
            message: "HTTP 500".into(),
        };
        assert!(failed.is_request_failure());
        assert_eq!(failed.status(), Some(500));

        let malformed = AppError::malformed("create", "expected a record");
        assert!(malformed.is_request_failure());
        assert_eq!(malformed.status(), None);

        assert!(!AppError::SubmissionInProgress.is_request_failure());
        assert!(!AppError::DuplicateFieldKey("email".into()).is_request_failure());
    }

    #[test]
    fn test_error_display() {
        let err = AppError::RequestFailed {
            operation: "delete",
            status: Some(404),
            message: "HTTP 404 Not Found".into(),
        };
        assert_eq!(
            err.to_string(),
            "Request failed (delete): HTTP 404 Not Found"
        );
        assert_eq!(
            AppError::DuplicateFieldKey("phone".into()).to_string(),
            "Duplicate field key: phone"
        );
    }
}
