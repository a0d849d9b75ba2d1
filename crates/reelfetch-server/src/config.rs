//! Startup configuration read from the environment

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use reelfetch_core::{Credentials, FetchMode, ScraperConfig};
use tracing::warn;

/// Default listen port
pub const DEFAULT_PORT: u16 = 3000;

/// Default log filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "reelfetch_server=info,reelfetch_core=info,tower_http=info";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen port, bound on `0.0.0.0`
    pub port: u16,
    /// Pipeline configuration handed to the scraper
    pub scraper: ScraperConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            scraper: ScraperConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Read configuration from process environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    ///
    /// Unparseable values fall back to their defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        config.port = parse_or(get("PORT"), "PORT", DEFAULT_PORT);

        let scraper = &mut config.scraper;
        scraper.fetch_mode = parse_or(get("FETCH_MODE"), "FETCH_MODE", FetchMode::default());
        scraper.require_login = parse_flag(get("REQUIRE_LOGIN"), "REQUIRE_LOGIN");
        let password = lookup("INSTA_PASS").filter(|v| !v.trim().is_empty());
        scraper.credentials = Credentials::from_parts(get("INSTA_USER"), password);

        scraper.browser.executable = get("CHROME_BIN").map(PathBuf::from);
        scraper.browser.pool_size = parse_or(
            get("BROWSER_POOL_SIZE"),
            "BROWSER_POOL_SIZE",
            scraper.browser.pool_size,
        );
        scraper.browser.navigation_timeout = Duration::from_secs(parse_or(
            get("NAVIGATION_TIMEOUT_SECS"),
            "NAVIGATION_TIMEOUT_SECS",
            scraper.browser.navigation_timeout.as_secs(),
        ));
        scraper.client.timeout_secs = parse_or(
            get("REQUEST_TIMEOUT_SECS"),
            "REQUEST_TIMEOUT_SECS",
            scraper.client.timeout_secs,
        );

        config
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Debug,
{
    let Some(raw) = raw else {
        return default;
    };
    match raw.parse() {
        Ok(value) => value,
        Err(_) => {
            warn!("invalid {key}={raw:?}, using default {default:?}");
            default
        }
    }
}

fn parse_flag(raw: Option<String>, key: &str) -> bool {
    match raw.as_deref().map(str::to_ascii_lowercase).as_deref() {
        None => false,
        Some("1" | "true" | "yes" | "on") => true,
        Some("0" | "false" | "no" | "off") => false,
        Some(other) => {
            warn!("invalid {key}={other:?}, using default false");
            false
        }
    }
}
