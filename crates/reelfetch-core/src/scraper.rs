//! Main scraper API for reelfetch
//!
//! Combines the static client, the browser pool, the optional login and
//! the extractor chain into one request pipeline.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{Instrument, error, info, info_span, warn};

use crate::auth::{AuthConfig, Authenticator, Credentials};
use crate::browser::{BrowserConfig, BrowserEngine, BrowserPage, BrowserPool, ChromiumEngine};
use crate::client::{ClientConfig, PageClient};
use crate::envelope::ResponseEnvelope;
use crate::error::{ReelfetchError, Result};
use crate::extractor::{ExtractorChain, PageContent};
use crate::types::{ExtractionRequest, ExtractionResult};
use crate::url::DEFAULT_DOMAIN;

/// How pages are obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// Plain HTTP only
    Static,
    /// Headless browser only
    Browser,
    /// Plain HTTP first, browser when that fails or finds nothing
    #[default]
    Auto,
}

impl FromStr for FetchMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "static" => Ok(Self::Static),
            "browser" => Ok(Self::Browser),
            "auto" => Ok(Self::Auto),
            other => Err(format!("unknown fetch mode: {other}")),
        }
    }
}

impl fmt::Display for FetchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Static => "static",
            Self::Browser => "browser",
            Self::Auto => "auto",
        };
        f.write_str(name)
    }
}

/// Configuration for the whole pipeline
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Domain marker post URLs must belong to (default: "instagram.com")
    pub domain: String,
    pub fetch_mode: FetchMode,
    pub client: ClientConfig,
    pub browser: BrowserConfig,
    pub auth: AuthConfig,
    /// Login credentials; enables the authenticated browser path
    pub credentials: Option<Credentials>,
    /// Refuse requests when credentials are missing
    pub require_login: bool,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            domain: DEFAULT_DOMAIN.to_string(),
            fetch_mode: FetchMode::default(),
            client: ClientConfig::default(),
            browser: BrowserConfig::default(),
            auth: AuthConfig::default(),
            credentials: None,
            require_login: false,
        }
    }
}

/// Main scraper API for reelfetch
///
/// Stateless between requests: every call validates, fetches, optionally
/// logs in, and extracts on its own. Browser sessions are leased from a
/// bounded pool and always released before the call returns.
pub struct ReelScraper {
    domain: String,
    fetch_mode: FetchMode,
    require_login: bool,
    client: PageClient,
    pool: BrowserPool,
    authenticator: Option<Authenticator>,
    chain: ExtractorChain,
}

impl ReelScraper {
    /// Create a new scraper with default configuration
    ///
    /// # Errors
    /// Returns error if HTTP client initialization fails
    pub fn new() -> Result<Self> {
        Self::with_config(ScraperConfig::default())
    }

    /// Create a new scraper driving Chromium
    ///
    /// # Errors
    /// Returns error if HTTP client initialization fails
    pub fn with_config(config: ScraperConfig) -> Result<Self> {
        let engine = Arc::new(ChromiumEngine::new(config.browser.clone()));
        Self::with_engine(config, engine)
    }

    /// Create a new scraper with a custom browser engine
    ///
    /// # Errors
    /// Returns error if HTTP client initialization fails
    pub fn with_engine(config: ScraperConfig, engine: Arc<dyn BrowserEngine>) -> Result<Self> {
        let client = PageClient::with_config(config.client)?;
        let pool = BrowserPool::new(
            engine,
            config.browser.pool_size,
            config.browser.admission_wait,
        );
        let authenticator = config
            .credentials
            .map(|creds| Authenticator::with_config(creds, config.auth));

        Ok(Self {
            domain: config.domain,
            fetch_mode: config.fetch_mode,
            require_login: config.require_login,
            client,
            pool,
            authenticator,
            chain: ExtractorChain::standard(),
        })
    }

    /// Replace the extractor chain
    pub fn with_chain(mut self, chain: ExtractorChain) -> Self {
        self.chain = chain;
        self
    }

    /// Configured fetch mode
    pub fn fetch_mode(&self) -> FetchMode {
        self.fetch_mode
    }

    /// Whether requests go through the login flow
    pub fn login_enabled(&self) -> bool {
        self.authenticator.is_some()
    }

    /// Browser pool backing the rendered path
    pub fn pool(&self) -> &BrowserPool {
        &self.pool
    }

    /// Validate a raw `url` parameter
    ///
    /// # Errors
    /// Returns `InvalidUrl` if the URL is missing or foreign
    pub fn validate(&self, raw_url: Option<&str>) -> Result<ExtractionRequest> {
        ExtractionRequest::parse(raw_url, &self.domain)
    }

    /// Extract media URLs for a post
    ///
    /// # Arguments
    /// * `raw_url` - The `url` parameter as received
    ///
    /// # Errors
    /// - `InvalidUrl` before any I/O
    /// - `Configuration` before any I/O, if login is required but not configured
    /// - `Busy`, `Browser`, `Navigation`, `HttpError`, `UpstreamStatus`,
    ///   `UnexpectedContent` while obtaining the page
    /// - `Authentication` if login was attempted and not confirmed
    /// - `NotFound` if no strategy produced a video URL
    pub async fn extract(&self, raw_url: Option<&str>) -> Result<ExtractionResult> {
        let request = self.validate(raw_url)?;
        self.ensure_configured()?;

        let span = info_span!(
            "extract",
            shortcode = request.shortcode.as_deref().unwrap_or("-"),
            mode = %self.fetch_mode,
        );
        self.run(&request.url).instrument(span).await
    }

    /// Extract and map the outcome to `(status, envelope)`
    ///
    /// Errors are logged here with full detail; the envelope only carries
    /// the fixed user-facing message.
    pub async fn download(&self, raw_url: Option<&str>) -> (u16, ResponseEnvelope) {
        let outcome = self.extract(raw_url).await;
        if let Err(ref e) = outcome {
            match e {
                ReelfetchError::InvalidUrl(_) => info!("rejected request: {e}"),
                _ => error!("extraction failed: {e}"),
            }
        }
        ResponseEnvelope::from_outcome(outcome)
    }

    fn ensure_configured(&self) -> Result<()> {
        if self.require_login && self.authenticator.is_none() {
            return Err(ReelfetchError::Configuration(
                "login required but INSTA_USER/INSTA_PASS are not set".to_string(),
            ));
        }
        Ok(())
    }

    async fn run(&self, url: &str) -> Result<ExtractionResult> {
        if self.authenticator.is_some() {
            return self.extract_rendered(url).await;
        }

        match self.fetch_mode {
            FetchMode::Static => self.extract_static(url).await,
            FetchMode::Browser => self.extract_rendered(url).await,
            FetchMode::Auto => match self.extract_static(url).await {
                Err(not_found @ ReelfetchError::NotFound(_)) => {
                    info!("no match in static page; falling back to browser");
                    match self.extract_rendered(url).await {
                        Err(e) if e.is_browser_failure() => {
                            warn!("browser fallback unavailable ({e}); keeping static result");
                            Err(not_found)
                        }
                        other => other,
                    }
                }
                Err(e) if e.is_fetch_failure() => {
                    info!("static fetch failed ({e}); falling back to browser");
                    self.extract_rendered(url).await
                }
                other => other,
            },
        }
    }

    async fn extract_static(&self, url: &str) -> Result<ExtractionResult> {
        let html = self.client.fetch(url).await?;
        self.chain.extract(&PageContent::from_html(&html)).await
    }

    async fn extract_rendered(&self, url: &str) -> Result<ExtractionResult> {
        let lease = self.pool.acquire().await?;
        let outcome = self.render_and_extract(lease.page(), url).await;
        lease.release().await;
        outcome
    }

    async fn render_and_extract(&self, page: &dyn BrowserPage, url: &str) -> Result<ExtractionResult> {
        if let Some(ref authenticator) = self.authenticator {
            authenticator.login(page).await?;
        }

        page.goto(url).await?;
        let html = page.content().await?;
        self.chain.extract(&PageContent::rendered(&html, page)).await
    }
}
