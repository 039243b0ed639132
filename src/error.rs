//! Error types shared by the client and the domain model

use crate::data::ValidationErrors;

pub type Result<T> = std::result::Result<T, SeyrenError>;

/// Every failure the client can report
#[derive(Debug, thiserror::Error)]
pub enum SeyrenError {
    #[error("Failed to validate data: {0}")]
    DataValidation(#[from] ValidationErrors),

    #[error("Alert error: {message}")]
    Alert {
        message: String,
        status: Option<u16>,
    },

    #[error("Check error: {message}")]
    Check {
        message: String,
        status: Option<u16>,
    },

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl SeyrenError {
    pub fn alert(message: impl Into<String>) -> Self {
        SeyrenError::Alert {
            message: message.into(),
            status: None,
        }
    }

    pub fn check(message: impl Into<String>) -> Self {
        SeyrenError::Check {
            message: message.into(),
            status: None,
        }
    }

    /// HTTP status of the failed response, if the failure came from one
    pub fn status(&self) -> Option<u16> {
        match self {
            SeyrenError::Api { status, .. } => Some(*status),
            SeyrenError::Alert { status, .. } | SeyrenError::Check { status, .. } => *status,
            SeyrenError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, SeyrenError::DataValidation(_))
    }

    /// Re-scope a failed check operation as a check error
    pub(crate) fn for_check(self, check_id: &str, operation: &str) -> Self {
        match self {
            SeyrenError::Check { .. } | SeyrenError::DataValidation(_) => self,
            other => SeyrenError::Check {
                status: other.status(),
                message: format!("{} failed for check {}: {}", operation, check_id, other),
            },
        }
    }

    /// Re-scope a failed alert operation as an alert error
    pub(crate) fn for_alerts(self, check_id: &str, operation: &str) -> Self {
        match self {
            SeyrenError::Alert { .. } => self,
            other => SeyrenError::Alert {
                status: other.status(),
                message: format!("{} failed for check {}: {}", operation, check_id, other),
            },
        }
    }
}
