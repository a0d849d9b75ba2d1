//! Regex scan over the raw page markup
//!
//! Catches payloads inlined in scripts without a JSON type, where neither
//! the JSON scan nor the path lookup can parse them.

use async_trait::async_trait;

use super::{ExtractionStrategy, PageContent, capture_json_string};
use crate::types::ExtractionResult;

/// `"video_url":"..."` anywhere in the document
pub struct RawMarkupStrategy;

impl RawMarkupStrategy {
    fn scan(html: &str) -> Option<ExtractionResult> {
        let video_url = capture_json_string(html, "video_url")?;
        let thumbnail_url = capture_json_string(html, "display_url");
        Some(ExtractionResult::new(video_url, thumbnail_url))
    }
}

#[async_trait]
impl ExtractionStrategy for RawMarkupStrategy {
    fn name(&self) -> &'static str {
        "raw_markup"
    }

    async fn try_extract(&self, content: &PageContent<'_>) -> Option<ExtractionResult> {
        Self::scan(content.html)
    }
}
