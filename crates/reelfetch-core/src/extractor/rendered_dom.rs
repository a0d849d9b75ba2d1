//! Query of the live rendered DOM
//!
//! Only runs in browser mode. Reads the playback source of the first
//! `<video>` element. Sources served through Media Source Extensions show up
//! as `blob:` handles, which are reported as transient rather than dropped.

use async_trait::async_trait;
use tracing::debug;

use super::{ExtractionStrategy, PageContent};
use crate::browser::BrowserPage;
use crate::types::ExtractionResult;
use crate::url::is_transient_handle;

/// `(selector, attribute)` pairs holding the video source, in order
const VIDEO_SOURCES: [(&str, &str); 2] = [("video", "src"), ("video source", "src")];

/// `<video>` element lookup on the rendered page
pub struct RenderedDomStrategy {
    /// Best-effort selector for a thumbnail `<img>` when the video has no poster
    pub thumbnail_selector: String,
}

impl Default for RenderedDomStrategy {
    fn default() -> Self {
        Self {
            thumbnail_selector: "article img[src]".to_string(),
        }
    }
}

impl RenderedDomStrategy {
    async fn first_attribute(page: &dyn BrowserPage, pairs: &[(&str, &str)]) -> Option<String> {
        for (selector, attr) in pairs {
            match page.attribute(selector, attr).await {
                Ok(Some(value)) if !value.trim().is_empty() => return Some(value),
                Ok(_) => {}
                Err(e) => debug!(selector, "DOM query failed: {e}"),
            }
        }
        None
    }
}

#[async_trait]
impl ExtractionStrategy for RenderedDomStrategy {
    fn name(&self) -> &'static str {
        "rendered_dom"
    }

    async fn try_extract(&self, content: &PageContent<'_>) -> Option<ExtractionResult> {
        let page = content.page?;

        let video_url = Self::first_attribute(page, &VIDEO_SOURCES).await?;
        let thumbnail_url = Self::first_attribute(
            page,
            &[("video", "poster"), (self.thumbnail_selector.as_str(), "src")],
        )
        .await;

        let transient = is_transient_handle(&video_url);
        Some(ExtractionResult {
            video_url: Some(video_url),
            thumbnail_url,
            transient,
            strategy: "",
        })
    }
}
