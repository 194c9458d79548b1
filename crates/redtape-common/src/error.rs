//! Common error types for the Red Tape form.

use thiserror::Error;

/// Errors surfaced by the form shell
#[derive(Debug, Error)]
pub enum RedTapeError {
    /// No live session under this token (never created, closed, or swept)
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Request is missing or carries an unusable value
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Image id outside the captcha catalog
    #[error("Unknown captcha image: {0}")]
    UnknownImage(u8),

    /// Action not allowed in the current captcha stage
    #[error("Not permitted: {0}")]
    NotPermitted(String),
}

impl RedTapeError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::SessionNotFound(_) => 404,
            Self::InvalidInput(_) => 400,
            Self::UnknownImage(_) => 400,
            Self::NotPermitted(_) => 409,
        }
    }

    /// Returns true if the user can fix this by acting differently
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_) | Self::UnknownImage(_) | Self::NotPermitted(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(RedTapeError::SessionNotFound("x".into()).status_code(), 404);
        assert_eq!(RedTapeError::UnknownImage(42).status_code(), 400);
        assert_eq!(RedTapeError::NotPermitted("close".into()).status_code(), 409);
        assert!(RedTapeError::UnknownImage(42).is_user_error());
        assert!(!RedTapeError::SessionNotFound("x".into()).is_user_error());
    }
}
