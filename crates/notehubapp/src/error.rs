use crate::validation::FormErrors;
use thiserror::Error;

/// Errors surfaced by notehub.
///
/// Variants carry owned strings rather than source errors so that a single
/// fetch outcome can be shared by every caller waiting on it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotehubError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Note not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(FormErrors),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl NotehubError {
    /// HTTP status associated with the error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            NotehubError::Http { status, .. } => Some(*status),
            NotehubError::NotFound(_) => Some(404),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, NotehubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_reports_404() {
        let err = NotehubError::NotFound("abc123".into());
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "Note not found: abc123");
    }

    #[test]
    fn network_errors_have_no_status() {
        assert_eq!(NotehubError::Network("refused".into()).status(), None);
    }

    #[test]
    fn http_error_display() {
        let err = NotehubError::Http {
            status: 401,
            message: "Unauthorized".into(),
        };
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.to_string(), "HTTP error 401: Unauthorized");
    }
}
