//! Lookup along known post-data paths
//!
//! Finds JSON blobs assigned in page scripts (`window._sharedData`,
//! `__additionalDataLoaded`) or carried in JSON scripts, then walks the
//! known locations of the post's media object. Carousel posts fall back to
//! their first child when the post itself is not a video.

use async_trait::async_trait;
use scraper::{Html, Selector};
use serde_json::Value;

use super::{ExtractionStrategy, PageContent};
use crate::types::ExtractionResult;

/// Script assignments whose right-hand side is the post JSON
const ASSIGNMENT_MARKERS: [&str; 2] = ["window._sharedData", "window.__additionalDataLoaded("];

/// JSON pointers to a post media object, most specific first
const MEDIA_POINTERS: [&str; 5] = [
    "/entry_data/PostPage/0/graphql/shortcode_media",
    "/graphql/shortcode_media",
    "/data/xdt_shortcode_media",
    "/data/shortcode_media",
    "/items/0",
];

/// First-child pointers for multi-item posts
const CAROUSEL_POINTERS: [&str; 2] = ["/edge_sidecar_to_children/edges/0/node", "/carousel_media/0"];

/// Targeted lookup of `shortcode_media`-shaped objects
pub struct StructuredPathStrategy;

impl StructuredPathStrategy {
    fn lookup(html: &str) -> Option<ExtractionResult> {
        json_candidates(html).iter().find_map(|blob| {
            MEDIA_POINTERS
                .iter()
                .find_map(|pointer| blob.pointer(pointer))
                .and_then(media_result)
        })
    }
}

#[async_trait]
impl ExtractionStrategy for StructuredPathStrategy {
    fn name(&self) -> &'static str {
        "structured_path"
    }

    async fn try_extract(&self, content: &PageContent<'_>) -> Option<ExtractionResult> {
        Self::lookup(content.html)
    }
}

/// Reads media fields, descending into the first carousel item if needed
fn media_result(media: &Value) -> Option<ExtractionResult> {
    let thumbnail = thumbnail_of(media);

    if let Some(video) = video_of(media) {
        return Some(ExtractionResult::new(video, thumbnail));
    }

    let child = CAROUSEL_POINTERS.iter().find_map(|p| media.pointer(p))?;
    let video = video_of(child)?;
    Some(ExtractionResult::new(video, thumbnail_of(child).or(thumbnail)))
}

fn video_of(media: &Value) -> Option<String> {
    non_empty_str(media.get("video_url"))
        .or_else(|| non_empty_str(media.pointer("/video_versions/0/url")))
}

fn thumbnail_of(media: &Value) -> Option<String> {
    non_empty_str(media.get("display_url"))
        .or_else(|| non_empty_str(media.pointer("/image_versions2/candidates/0/url")))
        .or_else(|| non_empty_str(media.get("thumbnail_src")))
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(String::from)
}

/// Parses every JSON blob found in the page's scripts
fn json_candidates(html: &str) -> Vec<Value> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("script") else {
        return Vec::new();
    };

    let mut blobs = Vec::new();
    for script in document.select(&selector) {
        let body: String = script.text().collect();
        let body = body.trim();

        if body.starts_with('{') {
            if let Ok(value) = serde_json::from_str(body) {
                blobs.push(value);
            }
            continue;
        }

        for marker in ASSIGNMENT_MARKERS {
            let Some(pos) = body.find(marker) else {
                continue;
            };
            if let Some(object) = balanced_object(&body[pos + marker.len()..])
                && let Ok(value) = serde_json::from_str(object)
            {
                blobs.push(value);
            }
        }
    }
    blobs
}

/// Returns the first brace-balanced JSON object in `text`
///
/// Braces inside string literals are ignored.
fn balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth: u32 = 0;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in text[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }
    None
}
