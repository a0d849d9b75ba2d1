//! Core data types for reelfetch
//!
//! Contains the request and result structures shared by the fetcher,
//! the extractor chain and the response formatter.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::url::{extract_shortcode, validate_post_url};

/// A validated extraction request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    /// Normalised absolute post URL
    pub url: String,

    /// Post shortcode, when the path carries one (log context only)
    pub shortcode: Option<String>,
}

impl ExtractionRequest {
    /// Validate a raw `url` parameter against the domain marker
    ///
    /// # Errors
    /// Returns `InvalidUrl` if the input is missing, malformed, or
    /// points outside `domain`.
    pub fn parse(raw: Option<&str>, domain: &str) -> Result<Self> {
        let url = validate_post_url(raw, domain)?;
        let shortcode = extract_shortcode(url.path());
        Ok(Self {
            url: url.to_string(),
            shortcode,
        })
    }
}

/// Media URLs found by one extraction strategy
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Direct video URL (absent or empty means nothing usable was found)
    pub video_url: Option<String>,

    /// Thumbnail image URL, best effort
    pub thumbnail_url: Option<String>,

    /// `true` when `video_url` is an in-browser `blob:` handle
    #[serde(default)]
    pub transient: bool,

    /// Name of the strategy that produced this result
    #[serde(skip)]
    pub strategy: &'static str,
}

impl ExtractionResult {
    /// Build a result from a video URL and optional thumbnail
    pub fn new(video_url: impl Into<String>, thumbnail_url: Option<String>) -> Self {
        Self {
            video_url: Some(video_url.into()),
            thumbnail_url,
            transient: false,
            strategy: "",
        }
    }

    /// Returns `true` if a non-empty video URL is present
    pub fn has_video(&self) -> bool {
        self.video_url.as_deref().is_some_and(|u| !u.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_parse_valid() {
        let req = ExtractionRequest::parse(
            Some("https://www.instagram.com/p/Cx1AbC/"),
            "instagram.com",
        )
        .unwrap();
        assert_eq!(req.url, "https://www.instagram.com/p/Cx1AbC/");
        assert_eq!(req.shortcode.as_deref(), Some("Cx1AbC"));
    }

    #[test]
    fn test_request_parse_missing() {
        assert!(ExtractionRequest::parse(None, "instagram.com").is_err());
    }

    #[test]
    fn test_has_video() {
        assert!(ExtractionResult::new("https://cdn.example/v.mp4", None).has_video());
        assert!(!ExtractionResult::new("", None).has_video());
        assert!(!ExtractionResult::new("   ", None).has_video());
        assert!(!ExtractionResult::default().has_video());
    }

    #[test]
    fn test_result_serialization_skips_strategy() {
        let mut result = ExtractionResult::new("https://cdn.example/v.mp4", None);
        result.strategy = "embedded_json";

        let json = serde_json::to_string(&result).expect("Serialization should succeed");
        assert!(!json.contains("embedded_json"));

        let back: ExtractionResult =
            serde_json::from_str(&json).expect("Deserialization should succeed");
        assert_eq!(back.video_url, result.video_url);
        assert!(!back.transient);
    }
}
