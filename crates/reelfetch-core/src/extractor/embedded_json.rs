//! Scan of structured-data `<script>` payloads
//!
//! Every JSON script is parsed on its own and searched for a `video_url`
//! key at any depth, so schema reshuffles between site revisions do not
//! matter. Scripts that fail to parse are skipped.

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::debug;

use super::{ExtractionStrategy, PageContent, capture_json_string};
use crate::types::ExtractionResult;

const JSON_SCRIPTS: &str = r#"script[type="application/json"], script[type="application/ld+json"]"#;

/// Full scan of every JSON script for `video_url` / `display_url`
pub struct EmbeddedJsonStrategy;

impl EmbeddedJsonStrategy {
    fn scan(html: &str) -> Option<ExtractionResult> {
        let document = Html::parse_document(html);
        let selector = Selector::parse(JSON_SCRIPTS).ok()?;

        for (index, script) in document.select(&selector).enumerate() {
            let body: String = script.text().collect();
            let value: serde_json::Value = match serde_json::from_str(body.trim()) {
                Ok(value) => value,
                Err(e) => {
                    debug!(index, "skipping unparsable JSON script: {e}");
                    continue;
                }
            };

            let flat = value.to_string();
            if let Some(video_url) = capture_json_string(&flat, "video_url") {
                let thumbnail_url = capture_json_string(&flat, "display_url");
                return Some(ExtractionResult::new(video_url, thumbnail_url));
            }
        }

        None
    }
}

#[async_trait]
impl ExtractionStrategy for EmbeddedJsonStrategy {
    fn name(&self) -> &'static str {
        "embedded_json"
    }

    async fn try_extract(&self, content: &PageContent<'_>) -> Option<ExtractionResult> {
        Self::scan(content.html)
    }
}
