//! Headless browser access
//!
//! The rest of the crate talks to a rendered page only through
//! [`BrowserPage`]; [`ChromiumEngine`] is the production implementation and
//! [`BrowserPool`] bounds how many sessions run at once.

pub mod chromium;
pub mod pool;

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use crate::client::USER_AGENT;
use crate::error::Result;

pub use chromium::{ChromiumEngine, ChromiumPage};
pub use pool::{BrowserLease, BrowserPool};

/// Configuration for browser sessions
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Browser executable override (default: auto-detect)
    pub executable: Option<PathBuf>,
    /// Navigation timeout, including the network-idle wait (default: 60s)
    pub navigation_timeout: Duration,
    /// How long the resource count must stay unchanged to count as idle (default: 500ms)
    pub network_idle: Duration,
    /// User-Agent presented by the browser
    pub user_agent: String,
    /// Optional Accept-Language header
    pub accept_language: Option<String>,
    /// Run without a visible window (default: true)
    pub headless: bool,
    /// Maximum concurrent browser sessions (default: 2)
    pub pool_size: usize,
    /// How long a request may wait for a free session before rejection (default: 0)
    pub admission_wait: Duration,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            executable: None,
            navigation_timeout: Duration::from_secs(60),
            network_idle: Duration::from_millis(500),
            user_agent: USER_AGENT.to_string(),
            accept_language: Some("en-US,en;q=0.9".to_string()),
            headless: true,
            pool_size: 2,
            admission_wait: Duration::ZERO,
        }
    }
}

/// A live rendered page owned by one request
///
/// Element lookups take CSS selectors. Implementations own the whole
/// browser session; [`BrowserPage::close`] tears it down.
#[async_trait]
pub trait BrowserPage: Send + Sync {
    /// Navigate and wait until the network is mostly idle
    ///
    /// # Errors
    /// `Navigation` on failure or when the navigation timeout elapses
    async fn goto(&self, url: &str) -> Result<()>;

    /// Serialized DOM of the current document
    async fn content(&self) -> Result<String>;

    /// Attribute of the first element matching `selector`
    ///
    /// Returns `Ok(None)` when the element or the attribute is absent.
    async fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>>;

    /// Wait for an element to appear; `false` if `timeout` elapsed first
    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<bool>;

    /// Wait for the next top-level navigation; `false` if `timeout` elapsed first
    async fn wait_for_navigation(&self, timeout: Duration) -> Result<bool>;

    /// Click the first element matching `selector`
    async fn click(&self, selector: &str) -> Result<()>;

    /// Type `text` into an element one character at a time
    async fn type_text(&self, selector: &str, text: &str, delay: Duration) -> Result<()>;

    /// Release the page and its browser process
    async fn close(&self) -> Result<()>;
}

/// Launches browser sessions
#[async_trait]
pub trait BrowserEngine: Send + Sync {
    /// Start a fresh session and return its blank page
    async fn launch(&self) -> Result<Box<dyn BrowserPage>>;
}
