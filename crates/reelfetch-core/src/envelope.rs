//! Response envelope
//!
//! Maps an extraction outcome onto the JSON body returned to clients.
//! `success` is `true` exactly when a non-empty `video_url` is present.

use serde::{Deserialize, Serialize};

use crate::error::{MSG_NOT_FOUND, ReelfetchError};
use crate::types::ExtractionResult;

/// Warning attached to results whose source is an in-browser handle
pub const TRANSIENT_WARNING: &str = "The video source is a temporary in-browser reference and cannot be downloaded directly.";

/// Uniform JSON body for `/api/download`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResponseEnvelope {
    /// Failure body carrying one of the fixed user-facing messages
    pub fn failure(message: &str) -> Self {
        Self {
            success: false,
            video_url: None,
            thumbnail_url: None,
            warning: None,
            error: Some(message.to_string()),
        }
    }

    /// Maps a result to `(status, body)`
    ///
    /// A result without a usable video URL becomes a not-found failure.
    pub fn from_result(result: ExtractionResult) -> (u16, Self) {
        if !result.has_video() {
            return (500, Self::failure(MSG_NOT_FOUND));
        }

        let warning = result.transient.then(|| TRANSIENT_WARNING.to_string());
        let envelope = Self {
            success: true,
            video_url: result.video_url,
            thumbnail_url: Some(result.thumbnail_url.unwrap_or_default()),
            warning,
            error: None,
        };
        (200, envelope)
    }

    /// Maps an error to `(status, body)` without internal detail
    pub fn from_error(err: &ReelfetchError) -> (u16, Self) {
        (err.status_code(), Self::failure(err.user_message()))
    }

    /// Maps any extraction outcome to `(status, body)`
    pub fn from_outcome(outcome: Result<ExtractionResult, ReelfetchError>) -> (u16, Self) {
        match outcome {
            Ok(result) => Self::from_result(result),
            Err(err) => Self::from_error(&err),
        }
    }
}
