//! Error type definitions
//!
//! Defines the error taxonomy used throughout the unfollow tool. Platform
//! responses are decoded into these variants once, at the client boundary,
//! so callers match on kinds instead of inspecting response bodies.

use crate::types::TwoFactorInfo;
use thiserror::Error;

/// Main error type for the unfollow tool
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The cached session file could not be decoded
    #[error("Corrupt session state at {path}: {reason}")]
    CorruptState { path: String, reason: String },

    /// Login needs a second factor before it can complete
    #[error("Two-factor authentication required for {}", .0.username)]
    TwoFactorRequired(TwoFactorInfo),

    /// The platform wants the account to pass an anti-automation check
    #[error("Challenge required")]
    ChallengeRequired,

    /// The session is no longer authenticated
    #[error("Login required")]
    LoginRequired,

    /// Any other error reported by the platform API
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Interactive prompt failures
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Network/HTTP client errors
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a corrupt state error
    pub fn corrupt_state(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CorruptState {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an API error
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a prompt error
    pub fn prompt(msg: impl Into<String>) -> Self {
        Self::Prompt(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::config("IG_USERNAME is not set");
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(err.to_string(), "Configuration error: IG_USERNAME is not set");
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json");
        assert!(json_err.is_err());

        let err: Error = json_err.unwrap_err().into();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_corrupt_state_error() {
        let err = Error::corrupt_state("state.json", "expected value at line 1");
        assert!(matches!(err, Error::CorruptState { .. }));
        assert!(err.to_string().contains("state.json"));
    }

    #[test]
    fn test_two_factor_error_names_user() {
        let err = Error::TwoFactorRequired(TwoFactorInfo {
            username: "alice".to_string(),
            two_factor_identifier: "abc".to_string(),
            totp_two_factor_on: None,
        });
        assert_eq!(
            err.to_string(),
            "Two-factor authentication required for alice"
        );
    }

    #[test]
    fn test_api_error() {
        let err = Error::api(400, "feedback_required");
        assert!(matches!(err, Error::Api { status: 400, .. }));
        assert_eq!(err.to_string(), "API error (400): feedback_required");
    }
}
