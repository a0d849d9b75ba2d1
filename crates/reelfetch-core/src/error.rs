//! Error types for reelfetch
//!
//! Every failure carries a detailed `Display` message for logs and maps onto
//! a small fixed vocabulary of user-facing messages for HTTP responses.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Message returned for missing or unrecognised post URLs
pub const MSG_INVALID_URL: &str = "A valid Instagram URL is required.";

/// Message returned when a login-enabled deployment has no credentials
pub const MSG_NOT_CONFIGURED: &str =
    "The server is not configured for login. Please contact the administrator.";

/// Message returned for network and browser navigation failures
pub const MSG_FETCH_FAILED: &str =
    "Failed to fetch the Instagram page. The URL might be incorrect or the post private.";

/// Message returned when no extraction strategy found a video URL
pub const MSG_NOT_FOUND: &str = "Could not find the video URL. The post might be private, or Instagram's structure may have changed.";

/// Message returned when the login confirmation never appeared
pub const MSG_LOGIN_FAILED: &str = "Login to Instagram failed. The account may require verification (e.g. a security challenge).";

/// Message returned when the browser pool rejects a request
pub const MSG_BUSY: &str = "The server is busy. Please try again shortly.";

/// Error type for all reelfetch operations
///
/// Implements Display for detailed log messages and Serialize for
/// frontend compatibility. Use [`ReelfetchError::user_message`] for anything
/// that leaves the process.
#[derive(Error, Debug)]
pub enum ReelfetchError {
    /// Request URL missing or not a recognised post URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Required configuration (login credentials) is missing
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("Upstream returned status {0}")]
    UpstreamStatus(u16),

    /// Upstream answered with something other than an HTML document
    #[error("Unexpected content type: {0}")]
    UnexpectedContent(String),

    /// Browser navigation failed or timed out
    #[error("Navigation failed: {0}")]
    Navigation(String),

    /// Browser could not be launched or driven
    #[error("Browser error: {0}")]
    Browser(String),

    /// Login confirmation element never appeared
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// No extraction strategy produced a video URL
    #[error("Video not found: {0}")]
    NotFound(String),

    /// Browser pool is at capacity
    #[error("Browser pool exhausted ({0} sessions in use)")]
    Busy(usize),
}

impl ReelfetchError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidUrl(_) => 400,
            Self::Busy(_) => 503,
            _ => 500,
        }
    }

    /// Fixed user-facing message, free of internal detail
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidUrl(_) => MSG_INVALID_URL,
            Self::Configuration(_) => MSG_NOT_CONFIGURED,
            Self::HttpError(_)
            | Self::UpstreamStatus(_)
            | Self::UnexpectedContent(_)
            | Self::Navigation(_)
            | Self::Browser(_) => MSG_FETCH_FAILED,
            Self::Authentication(_) => MSG_LOGIN_FAILED,
            Self::NotFound(_) => MSG_NOT_FOUND,
            Self::Busy(_) => MSG_BUSY,
        }
    }

    /// Whether the failure happened while obtaining the page
    ///
    /// Used by the `auto` fetch mode to decide on a browser fallback.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Self::HttpError(_) | Self::UpstreamStatus(_) | Self::UnexpectedContent(_)
        )
    }

    /// Whether the browser path could not render the page at all
    pub fn is_browser_failure(&self) -> bool {
        matches!(self, Self::Busy(_) | Self::Browser(_) | Self::Navigation(_))
    }
}

impl From<chromiumoxide::error::CdpError> for ReelfetchError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Self::Browser(err.to_string())
    }
}

impl Serialize for ReelfetchError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Result type alias for reelfetch operations
pub type Result<T> = std::result::Result<T, ReelfetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_url() {
        let error = ReelfetchError::InvalidUrl("not-a-url".to_string());
        assert_eq!(error.to_string(), "Invalid URL: not-a-url");
    }

    #[test]
    fn test_error_display_upstream_status() {
        let error = ReelfetchError::UpstreamStatus(404);
        assert_eq!(error.to_string(), "Upstream returned status 404");
    }

    #[test]
    fn test_error_display_busy() {
        let error = ReelfetchError::Busy(2);
        assert_eq!(error.to_string(), "Browser pool exhausted (2 sessions in use)");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ReelfetchError::InvalidUrl(String::new()).status_code(), 400);
        assert_eq!(ReelfetchError::Configuration(String::new()).status_code(), 500);
        assert_eq!(ReelfetchError::NotFound(String::new()).status_code(), 500);
        assert_eq!(ReelfetchError::Authentication(String::new()).status_code(), 500);
        assert_eq!(ReelfetchError::Navigation(String::new()).status_code(), 500);
        assert_eq!(ReelfetchError::Busy(1).status_code(), 503);
    }

    #[test]
    fn test_user_message_hides_detail() {
        let error = ReelfetchError::Navigation("selector div._aagv timed out".to_string());
        assert_eq!(error.user_message(), MSG_FETCH_FAILED);
        assert!(!error.user_message().contains("_aagv"));
    }

    #[test]
    fn test_user_message_vocabulary() {
        assert_eq!(
            ReelfetchError::NotFound("x".into()).user_message(),
            MSG_NOT_FOUND
        );
        assert_eq!(
            ReelfetchError::Authentication("x".into()).user_message(),
            MSG_LOGIN_FAILED
        );
        assert_eq!(
            ReelfetchError::Configuration("x".into()).user_message(),
            MSG_NOT_CONFIGURED
        );
        assert_eq!(
            ReelfetchError::UnexpectedContent("image/png".into()).user_message(),
            MSG_FETCH_FAILED
        );
    }

    #[test]
    fn test_is_fetch_failure() {
        assert!(ReelfetchError::UpstreamStatus(500).is_fetch_failure());
        assert!(ReelfetchError::UnexpectedContent("x".into()).is_fetch_failure());
        assert!(!ReelfetchError::NotFound("x".into()).is_fetch_failure());
        assert!(!ReelfetchError::Navigation("x".into()).is_fetch_failure());
    }

    #[test]
    fn test_is_browser_failure() {
        assert!(ReelfetchError::Busy(2).is_browser_failure());
        assert!(ReelfetchError::Browser("x".into()).is_browser_failure());
        assert!(ReelfetchError::Navigation("x".into()).is_browser_failure());
        assert!(!ReelfetchError::NotFound("x".into()).is_browser_failure());
        assert!(!ReelfetchError::Authentication("x".into()).is_browser_failure());
    }

    #[test]
    fn test_error_serialize() {
        let error = ReelfetchError::Busy(3);
        let json = serde_json::to_string(&error).expect("Serialization should succeed");
        assert_eq!(json, "\"Browser pool exhausted (3 sessions in use)\"");
    }
}
