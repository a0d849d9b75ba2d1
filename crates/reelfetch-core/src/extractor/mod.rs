//! Extraction strategy chain
//!
//! Each strategy looks for a media URL in fetched content in its own way.
//! The chain tries them in a fixed order, cheapest first, and stops at the
//! first one that yields a non-empty video URL.

pub mod embedded_json;
pub mod raw_markup;
pub mod rendered_dom;
pub mod structured_path;

use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::browser::BrowserPage;
use crate::error::{ReelfetchError, Result};
use crate::types::ExtractionResult;

pub use embedded_json::EmbeddedJsonStrategy;
pub use raw_markup::RawMarkupStrategy;
pub use rendered_dom::RenderedDomStrategy;
pub use structured_path::StructuredPathStrategy;

/// Fetched content handed to each strategy
#[derive(Clone, Copy)]
pub struct PageContent<'a> {
    /// Static HTML, or the serialized DOM in browser mode
    pub html: &'a str,
    /// Live page, present only in browser mode
    pub page: Option<&'a dyn BrowserPage>,
}

impl<'a> PageContent<'a> {
    /// Content from a static fetch
    pub fn from_html(html: &'a str) -> Self {
        Self { html, page: None }
    }

    /// Content from a rendered page
    pub fn rendered(html: &'a str, page: &'a dyn BrowserPage) -> Self {
        Self {
            html,
            page: Some(page),
        }
    }
}

/// One way of locating a media URL
#[async_trait]
pub trait ExtractionStrategy: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Returns a result, or `None` if this strategy found nothing
    async fn try_extract(&self, content: &PageContent<'_>) -> Option<ExtractionResult>;
}

/// Ordered list of strategies
pub struct ExtractorChain {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl ExtractorChain {
    /// Chain with the given strategies in priority order
    pub fn new(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Embedded JSON, structured path, raw markup, rendered DOM
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(EmbeddedJsonStrategy),
            Box::new(StructuredPathStrategy),
            Box::new(RawMarkupStrategy),
            Box::new(RenderedDomStrategy::default()),
        ])
    }

    /// Strategy names in priority order
    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Run the strategies until one yields a video URL
    ///
    /// # Errors
    /// Returns `NotFound` if no strategy produced a non-empty video URL
    pub async fn extract(&self, content: &PageContent<'_>) -> Result<ExtractionResult> {
        for strategy in &self.strategies {
            debug!(strategy = strategy.name(), "trying extraction strategy");

            let Some(mut result) = strategy.try_extract(content).await else {
                continue;
            };
            if !result.has_video() {
                continue;
            }

            result.strategy = strategy.name();
            if result.transient {
                warn!(
                    strategy = result.strategy,
                    "video source is a transient in-browser handle"
                );
            } else {
                info!(strategy = result.strategy, "video URL found");
            }
            return Ok(result);
        }

        Err(ReelfetchError::NotFound(format!(
            "no match from [{}]",
            self.names().join(", ")
        )))
    }
}

impl Default for ExtractorChain {
    fn default() -> Self {
        Self::standard()
    }
}

/// Captures the string value of `"key":"..."` and JSON-unescapes it
///
/// Tolerates whitespace around the colon and escaped quotes inside the
/// value. Returns `None` if the key is absent or the value is empty.
pub(crate) fn capture_json_string(haystack: &str, key: &str) -> Option<String> {
    let pattern = format!(r#""{}"\s*:\s*"((?:[^"\\]|\\.)*)""#, regex::escape(key));
    let re = Regex::new(&pattern).ok()?;

    re.captures_iter(haystack)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| unescape_json_string(m.as_str()))
        .find(|value| !value.trim().is_empty())
}

/// Decodes the body of a JSON string literal (`https:\/\/a` → `https://a`)
pub(crate) fn unescape_json_string(raw: &str) -> Option<String> {
    serde_json::from_str::<String>(&format!("\"{raw}\"")).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakePage;

    struct Fixed(&'static str, Option<ExtractionResult>);

    #[async_trait]
    impl ExtractionStrategy for Fixed {
        fn name(&self) -> &'static str {
            self.0
        }

        async fn try_extract(&self, _content: &PageContent<'_>) -> Option<ExtractionResult> {
            self.1.clone()
        }
    }

    #[test]
    fn test_capture_json_string_unescapes() {
        let html = r#"{"video_url":"https:\/\/cdn.example\/v.mp4?a=1&b=2"}"#;
        assert_eq!(
            capture_json_string(html, "video_url"),
            Some("https://cdn.example/v.mp4?a=1&b=2".to_string())
        );
    }

    #[test]
    fn test_capture_json_string_whitespace_and_quotes() {
        let html = r#"{ "display_url" : "https://x/\"q\".jpg" }"#;
        assert_eq!(
            capture_json_string(html, "display_url"),
            Some("https://x/\"q\".jpg".to_string())
        );
    }

    #[test]
    fn test_capture_json_string_skips_empty() {
        let html = r#"{"video_url":"","video_url":"https://b/v.mp4"}"#;
        assert_eq!(
            capture_json_string(html, "video_url"),
            Some("https://b/v.mp4".to_string())
        );
    }

    #[test]
    fn test_capture_json_string_absent() {
        assert_eq!(capture_json_string(r#"{"video_url":null}"#, "video_url"), None);
        assert_eq!(capture_json_string("<html></html>", "video_url"), None);
    }

    #[test]
    fn test_standard_chain_order() {
        assert_eq!(
            ExtractorChain::standard().names(),
            vec!["embedded_json", "structured_path", "raw_markup", "rendered_dom"]
        );
    }

    #[tokio::test]
    async fn test_chain_stops_at_first_success() {
        let chain = ExtractorChain::new(vec![
            Box::new(Fixed("none", None)),
            Box::new(Fixed("empty", Some(ExtractionResult::new("", None)))),
            Box::new(Fixed(
                "first",
                Some(ExtractionResult::new("https://a/v.mp4", None)),
            )),
            Box::new(Fixed(
                "second",
                Some(ExtractionResult::new("https://b/v.mp4", None)),
            )),
        ]);

        let result = chain.extract(&PageContent::from_html("")).await.unwrap();
        assert_eq!(result.video_url.as_deref(), Some("https://a/v.mp4"));
        assert_eq!(result.strategy, "first");
    }

    #[tokio::test]
    async fn test_chain_not_found() {
        let chain = ExtractorChain::new(vec![Box::new(Fixed("none", None))]);
        let result = chain.extract(&PageContent::from_html("")).await;
        assert!(matches!(result, Err(ReelfetchError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_standard_chain_private_post() {
        let html = r#"<html><body><h2>This account is private</h2></body></html>"#;
        let page = FakePage::with_html(html);
        let chain = ExtractorChain::standard();

        let result = chain.extract(&PageContent::rendered(html, &page)).await;
        let err = result.unwrap_err();
        assert_eq!(err.user_message(), crate::error::MSG_NOT_FOUND);
    }
}
