//! Static page fetcher
//!
//! Plain HTTP client used for the cheap extraction path. Sends browser-like
//! headers and refuses anything that is not an HTML document.

use std::time::Duration;

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::debug;

use crate::error::{ReelfetchError, Result};

/// Desktop Chrome identity presented to upstream
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Configuration for the static HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// User-Agent header value
    pub user_agent: String,
    /// Accept-Language header value (default: "en-US,en;q=0.9")
    pub accept_language: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: USER_AGENT.to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
        }
    }
}

/// HTTP client wrapper for static HTML fetches
///
/// Single attempt per call: no retries, no caching.
pub struct PageClient {
    client: reqwest::Client,
}

impl PageClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        if let Ok(lang) = HeaderValue::from_str(&config.accept_language) {
            headers.insert(ACCEPT_LANGUAGE, lang);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent)
            .cookie_store(true)
            .default_headers(headers)
            .build()
            .map_err(ReelfetchError::HttpError)?;

        Ok(Self { client })
    }

    /// Fetch a page and return its HTML
    ///
    /// # Errors
    /// - `HttpError` - Network errors and timeouts
    /// - `UpstreamStatus` - Any non-2xx status after redirects
    /// - `UnexpectedContent` - A `Content-Type` that is not HTML
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ReelfetchError::HttpError)?;

        let status = response.status();
        debug!(%url, status = status.as_u16(), "static fetch response");

        if !status.is_success() {
            return Err(ReelfetchError::UpstreamStatus(status.as_u16()));
        }

        if let Some(content_type) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            && !is_html_content_type(content_type)
        {
            return Err(ReelfetchError::UnexpectedContent(content_type.to_string()));
        }

        response.text().await.map_err(ReelfetchError::HttpError)
    }
}

/// Returns `true` for HTML media types
fn is_html_content_type(value: &str) -> bool {
    let mime = value
        .split(';')
        .next()
        .unwrap_or(value)
        .trim()
        .to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}
