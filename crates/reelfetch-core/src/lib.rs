//! Reelfetch Core Library
//!
//! Provides an async API for resolving the direct video URL and thumbnail of
//! a public Instagram post, reel or IGTV page.
//!
//! # Overview
//!
//! This crate provides the whole extraction pipeline:
//! - URL validation restricted to the Instagram domain
//! - A plain HTTP client for server-rendered pages
//! - A bounded pool of headless Chromium sessions for client-rendered pages
//! - An optional login flow for gated posts
//! - An ordered chain of extraction strategies
//!
//! # Example
//!
//! ```no_run
//! use reelfetch_core::{ReelScraper, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let scraper = ReelScraper::new()?;
//!
//!     let result = scraper
//!         .extract(Some("https://www.instagram.com/reel/Cx1AbCdEfGh/"))
//!         .await?;
//!
//!     println!("video: {:?}", result.video_url);
//!     println!("thumbnail: {:?}", result.thumbnail_url);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Media URLs
//!
//! Returned CDN URLs are signed and expire. A `blob:` source found in the
//! rendered DOM only exists inside the browser session that produced it; it
//! is returned flagged as transient, with a warning in the response envelope.

mod auth;
pub mod browser;
mod client;
mod envelope;
mod error;
pub mod extractor;
mod scraper;
#[cfg(test)]
mod testing;
mod types;
pub mod url;

// Re-export login types
pub use auth::{AuthConfig, Authenticator, Credentials};

// Re-export browser types
pub use browser::{BrowserConfig, BrowserEngine, BrowserLease, BrowserPage, BrowserPool, ChromiumEngine};

// Re-export client types
pub use client::{ClientConfig, PageClient};

// Re-export response envelope
pub use envelope::{ResponseEnvelope, TRANSIENT_WARNING};

// Re-export error types
pub use error::{
    MSG_BUSY, MSG_FETCH_FAILED, MSG_INVALID_URL, MSG_LOGIN_FAILED, MSG_NOT_CONFIGURED,
    MSG_NOT_FOUND, ReelfetchError, Result,
};

// Re-export extractor chain
pub use extractor::{ExtractionStrategy, ExtractorChain, PageContent};

// Re-export main scraper API
pub use self::scraper::{FetchMode, ReelScraper, ScraperConfig};

// Re-export data types
pub use types::{ExtractionRequest, ExtractionResult};

// Re-export URL helper functions for convenience
pub use self::url::{extract_shortcode, is_transient_handle, validate_post_url};
