//! Error types for VIDHUB.

use thiserror::Error;

/// Common error type for VIDHUB.
#[derive(Error, Debug)]
pub enum VidhubError {
    /// Database error.
    ///
    /// This is a generic database error that wraps errors from the storage
    /// backend. Database errors from sqlx are automatically converted.
    #[error("database error: {0}")]
    Database(String),

    /// A store round-trip did not complete within its bound.
    #[error("database operation timed out")]
    DatabaseTimeout,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error (bad credentials, invalid/expired/reused token).
    #[error("authentication error: {0}")]
    Auth(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Duplicate unique field (user name or email already taken).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Hashing, signing or other internal failure.
    #[error("internal error: {0}")]
    Internal(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

// Conversion from sqlx errors
impl From<sqlx::Error> for VidhubError {
    fn from(e: sqlx::Error) -> Self {
        VidhubError::Database(e.to_string())
    }
}

/// Result type alias for VIDHUB operations.
pub type Result<T> = std::result::Result<T, VidhubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_display() {
        let err = VidhubError::Auth("invalid password".to_string());
        assert_eq!(err.to_string(), "authentication error: invalid password");
    }

    #[test]
    fn test_validation_error_display() {
        let err = VidhubError::Validation("user name too long".to_string());
        assert_eq!(err.to_string(), "validation error: user name too long");
    }

    #[test]
    fn test_conflict_error_display() {
        let err = VidhubError::Conflict("email already exists".to_string());
        assert_eq!(err.to_string(), "conflict: email already exists");
    }

    #[test]
    fn test_not_found_error_display() {
        let err = VidhubError::NotFound("user".to_string());
        assert_eq!(err.to_string(), "user not found");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: VidhubError = io_err.into();
        assert!(matches!(err, VidhubError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_result_alias() {
        fn sample_ok() -> Result<i32> {
            Ok(42)
        }

        fn sample_err() -> Result<i32> {
            Err(VidhubError::Auth("test".to_string()))
        }

        assert_eq!(sample_ok().unwrap(), 42);
        assert!(sample_err().is_err());
    }
}
