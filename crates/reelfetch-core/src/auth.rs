//! Login form automation
//!
//! Drives the Instagram login form inside a leased browser page so that
//! gated posts render. Credentials are injected at construction.

use std::fmt;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::browser::BrowserPage;
use crate::error::{ReelfetchError, Result};
use crate::url::LOGIN_URL;

/// Login credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Build credentials when both parts are present and non-empty
    pub fn from_parts(username: Option<String>, password: Option<String>) -> Option<Self> {
        let username = username.filter(|u| !u.trim().is_empty())?;
        let password = password.filter(|p| !p.is_empty())?;
        Some(Self { username, password })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Selectors and timing for the login flow
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub login_url: String,
    /// Cookie-consent button, clicked if it shows up
    pub consent_selector: String,
    pub username_selector: String,
    pub password_selector: String,
    pub submit_selector: String,
    /// Element that only exists for a logged-in session
    pub confirmation_selector: String,
    /// Bound on the consent banner wait (default: 5s)
    pub consent_timeout: Duration,
    /// Bound on the input fields becoming available (default: 15s)
    pub field_timeout: Duration,
    /// Bound on the post-login confirmation (default: 30s)
    pub confirmation_timeout: Duration,
    /// Pause between keystrokes (default: 75ms)
    pub keystroke_delay: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            login_url: LOGIN_URL.to_string(),
            consent_selector: "button._a9--._a9_1".to_string(),
            username_selector: "input[name=\"username\"]".to_string(),
            password_selector: "input[name=\"password\"]".to_string(),
            submit_selector: "button[type=\"submit\"]".to_string(),
            confirmation_selector: "svg[aria-label=\"Home\"]".to_string(),
            consent_timeout: Duration::from_secs(5),
            field_timeout: Duration::from_secs(15),
            confirmation_timeout: Duration::from_secs(30),
            keystroke_delay: Duration::from_millis(75),
        }
    }
}

/// Logs a browser session into Instagram
pub struct Authenticator {
    credentials: Credentials,
    config: AuthConfig,
}

impl Authenticator {
    /// Create an authenticator with default selectors
    pub fn new(credentials: Credentials) -> Self {
        Self::with_config(credentials, AuthConfig::default())
    }

    /// Create an authenticator with custom selectors and timing
    pub fn with_config(credentials: Credentials, config: AuthConfig) -> Self {
        Self {
            credentials,
            config,
        }
    }

    /// Run the login flow on `page`
    ///
    /// # Errors
    /// - `Navigation` if the login page cannot be loaded
    /// - `Authentication` if the form never appears or the confirmation
    ///   element is not seen in time (verification challenge, CAPTCHA, bad
    ///   password). There is no retry.
    pub async fn login(&self, page: &dyn BrowserPage) -> Result<()> {
        let cfg = &self.config;
        info!(user = %self.credentials.username, "logging in");

        page.goto(&cfg.login_url).await?;
        self.dismiss_cookie_banner(page).await;

        for selector in [&cfg.username_selector, &cfg.password_selector] {
            if !page.wait_for(selector, cfg.field_timeout).await? {
                return Err(ReelfetchError::Authentication(format!(
                    "login field {selector} never appeared"
                )));
            }
        }

        page.type_text(
            &cfg.username_selector,
            &self.credentials.username,
            cfg.keystroke_delay,
        )
        .await?;
        page.type_text(
            &cfg.password_selector,
            &self.credentials.password,
            cfg.keystroke_delay,
        )
        .await?;
        page.click(&cfg.submit_selector).await?;

        match page.wait_for_navigation(cfg.confirmation_timeout).await {
            Ok(true) => debug!("post-login navigation observed"),
            Ok(false) => debug!("no post-login navigation"),
            Err(e) => debug!("post-login navigation error: {e}"),
        }

        if page
            .wait_for(&cfg.confirmation_selector, cfg.confirmation_timeout)
            .await?
        {
            info!("login confirmed");
            Ok(())
        } else {
            Err(ReelfetchError::Authentication(
                "confirmation element not found; a verification challenge may be pending"
                    .to_string(),
            ))
        }
    }

    /// Clicks the cookie-consent button if it appears; never fails
    async fn dismiss_cookie_banner(&self, page: &dyn BrowserPage) {
        let selector = &self.config.consent_selector;
        match page.wait_for(selector, self.config.consent_timeout).await {
            Ok(true) => match page.click(selector).await {
                Ok(()) => debug!("cookie banner dismissed"),
                Err(e) => warn!("cookie banner click failed: {e}"),
            },
            Ok(false) => debug!("no cookie banner"),
            Err(e) => warn!("cookie banner check failed: {e}"),
        }
    }
}
