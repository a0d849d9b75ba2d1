//! Chromium implementation of [`BrowserPage`] over the DevTools protocol

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as CdpBrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{BrowserConfig, BrowserEngine, BrowserPage};
use crate::error::{ReelfetchError, Result};

/// Poll interval for element and idle checks
const POLL_INTERVAL: Duration = Duration::from_millis(250);

const RESOURCE_COUNT_JS: &str = "performance.getEntriesByType('resource').length";

/// Launches one headless Chromium process per session
pub struct ChromiumEngine {
    config: BrowserConfig,
}

impl ChromiumEngine {
    /// Create a new engine
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }

    fn cdp_config(&self) -> Result<CdpBrowserConfig> {
        let mut builder = CdpBrowserConfig::builder()
            .request_timeout(self.config.navigation_timeout)
            .no_sandbox()
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--mute-audio");

        if !self.config.headless {
            builder = builder.with_head();
        }

        if let Some(ref path) = self.config.executable {
            builder = builder.chrome_executable(path);
        }

        builder.build().map_err(ReelfetchError::Browser)
    }
}

#[async_trait]
impl BrowserEngine for ChromiumEngine {
    async fn launch(&self) -> Result<Box<dyn BrowserPage>> {
        info!(headless = self.config.headless, "launching browser");

        let (mut browser, mut handler) = Browser::launch(self.cdp_config()?)
            .await
            .map_err(|e| ReelfetchError::Browser(format!("launch failed: {e}")))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("browser handler error: {e}");
                }
            }
        });

        let page = match open_page(&browser, &self.config).await {
            Ok(page) => page,
            Err(e) => {
                // the process is already running; don't leak it
                let _ = browser.close().await;
                let _ = browser.wait().await;
                handler_task.abort();
                return Err(e);
            }
        };

        Ok(Box::new(ChromiumPage {
            browser: Mutex::new(browser),
            page,
            handler_task,
            navigation_timeout: self.config.navigation_timeout,
            network_idle: self.config.network_idle,
        }))
    }
}

async fn open_page(browser: &Browser, config: &BrowserConfig) -> Result<Page> {
    let page = browser.new_page("about:blank").await?;

    let mut identity = SetUserAgentOverrideParams::builder().user_agent(config.user_agent.clone());
    if let Some(ref lang) = config.accept_language {
        identity = identity.accept_language(lang.clone());
    }
    let identity = identity.build().map_err(ReelfetchError::Browser)?;
    page.execute(identity).await?;

    Ok(page)
}

/// A page inside a dedicated Chromium process
pub struct ChromiumPage {
    browser: Mutex<Browser>,
    page: Page,
    handler_task: JoinHandle<()>,
    navigation_timeout: Duration,
    network_idle: Duration,
}

impl ChromiumPage {
    /// Waits until the number of loaded resources stops changing
    async fn wait_for_network_idle(&self) {
        let mut last = None;
        let mut stable_for = Duration::ZERO;

        while stable_for < self.network_idle {
            tokio::time::sleep(POLL_INTERVAL).await;

            let count = match self.page.evaluate(RESOURCE_COUNT_JS.to_string()).await {
                Ok(result) => result.into_value::<u64>().ok(),
                Err(e) => {
                    debug!("resource count unavailable: {e}");
                    None
                }
            };

            if count.is_some() && count == last {
                stable_for += POLL_INTERVAL;
            } else {
                stable_for = Duration::ZERO;
                last = count;
            }
        }
    }
}

#[async_trait]
impl BrowserPage for ChromiumPage {
    async fn goto(&self, url: &str) -> Result<()> {
        let navigation = async {
            self.page
                .goto(url)
                .await
                .map_err(|e| ReelfetchError::Navigation(format!("{url}: {e}")))?;
            self.wait_for_network_idle().await;
            Ok(())
        };

        tokio::time::timeout(self.navigation_timeout, navigation)
            .await
            .map_err(|_| {
                ReelfetchError::Navigation(format!(
                    "{url}: timed out after {}s",
                    self.navigation_timeout.as_secs()
                ))
            })?
    }

    async fn content(&self) -> Result<String> {
        Ok(self.page.content().await?)
    }

    async fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>> {
        match self.page.find_element(selector).await {
            Ok(element) => Ok(element.attribute(name).await?),
            Err(e) => {
                debug!(selector, "element not found: {e}");
                Ok(None)
            }
        }
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<bool> {
        let poll = async {
            loop {
                if self.page.find_element(selector).await.is_ok() {
                    return;
                }
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        };
        Ok(tokio::time::timeout(timeout, poll).await.is_ok())
    }

    async fn wait_for_navigation(&self, timeout: Duration) -> Result<bool> {
        match tokio::time::timeout(timeout, self.page.wait_for_navigation()).await {
            Ok(Ok(_)) => Ok(true),
            Ok(Err(e)) => Err(ReelfetchError::Navigation(e.to_string())),
            Err(_) => Ok(false),
        }
    }

    async fn click(&self, selector: &str) -> Result<()> {
        self.page.find_element(selector).await?.click().await?;
        Ok(())
    }

    async fn type_text(&self, selector: &str, text: &str, delay: Duration) -> Result<()> {
        let element = self.page.find_element(selector).await?;
        element.click().await?;
        for ch in text.chars() {
            element.type_str(ch.to_string()).await?;
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        if let Err(e) = self.page.clone().close().await {
            debug!("page close failed: {e}");
        }

        let mut browser = self.browser.lock().await;
        let closed = browser.close().await;
        if let Err(e) = browser.wait().await {
            warn!("browser process wait failed: {e}");
        }
        self.handler_task.abort();

        closed.map(|_| ()).map_err(ReelfetchError::from)
    }
}
