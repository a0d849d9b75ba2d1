//! Bounded pool of browser sessions
//!
//! Each lease launches a fresh session and holds one semaphore permit.
//! Requests beyond capacity are rejected instead of spawning more browsers.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, warn};

use super::{BrowserEngine, BrowserPage};
use crate::error::{ReelfetchError, Result};

/// Admission-controlled source of browser sessions
pub struct BrowserPool {
    engine: Arc<dyn BrowserEngine>,
    permits: Arc<Semaphore>,
    size: usize,
    admission_wait: Duration,
}

impl BrowserPool {
    /// Create a pool allowing `size` concurrent sessions
    ///
    /// A `size` of zero is treated as one.
    pub fn new(engine: Arc<dyn BrowserEngine>, size: usize, admission_wait: Duration) -> Self {
        let size = size.max(1);
        Self {
            engine,
            permits: Arc::new(Semaphore::new(size)),
            size,
            admission_wait,
        }
    }

    /// Maximum concurrent sessions
    pub fn size(&self) -> usize {
        self.size
    }

    /// Sessions that could be leased right now
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Lease a fresh browser session
    ///
    /// # Errors
    /// - `Busy` if no session frees up within the admission wait
    /// - `Browser` if the engine fails to launch
    pub async fn acquire(&self) -> Result<BrowserLease> {
        let permit = self.admit().await?;
        let page = self.engine.launch().await?;
        debug!(available = self.available(), "browser session leased");

        Ok(BrowserLease {
            page: Some(page),
            permit: Some(permit),
        })
    }

    async fn admit(&self) -> Result<OwnedSemaphorePermit> {
        if self.admission_wait.is_zero() {
            return Arc::clone(&self.permits)
                .try_acquire_owned()
                .map_err(|_| ReelfetchError::Busy(self.size));
        }

        match tokio::time::timeout(
            self.admission_wait,
            Arc::clone(&self.permits).acquire_owned(),
        )
        .await
        {
            Ok(Ok(permit)) => Ok(permit),
            _ => Err(ReelfetchError::Busy(self.size)),
        }
    }
}

/// One request's browser session
///
/// Call [`BrowserLease::release`] on every path. If a lease is dropped
/// without it (panic, cancelled request), the session is closed in the
/// background instead, and the permit is held until that close finishes.
pub struct BrowserLease {
    page: Option<Box<dyn BrowserPage>>,
    permit: Option<OwnedSemaphorePermit>,
}

impl BrowserLease {
    /// The leased page
    pub fn page(&self) -> &dyn BrowserPage {
        match self.page.as_deref() {
            Some(page) => page,
            None => &ReleasedPage,
        }
    }

    /// Close the session and return the permit
    pub async fn release(mut self) {
        if let Some(page) = self.page.take()
            && let Err(e) = page.close().await
        {
            warn!("browser session close failed: {e}");
        }
    }
}

impl Drop for BrowserLease {
    fn drop(&mut self) {
        let Some(page) = self.page.take() else {
            return;
        };

        warn!("browser lease dropped without release; closing in background");
        let permit = self.permit.take();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = page.close().await {
                        warn!("background browser close failed: {e}");
                    }
                    drop(permit);
                });
            }
            Err(_) => warn!("no runtime available; browser session leaked"),
        }
    }
}

/// Stand-in returned after the real page has been released
struct ReleasedPage;

impl ReleasedPage {
    fn gone<T>() -> Result<T> {
        Err(ReelfetchError::Browser("session already released".to_string()))
    }
}

#[async_trait]
impl BrowserPage for ReleasedPage {
    async fn goto(&self, _url: &str) -> Result<()> {
        Self::gone()
    }

    async fn content(&self) -> Result<String> {
        Self::gone()
    }

    async fn attribute(&self, _selector: &str, _name: &str) -> Result<Option<String>> {
        Self::gone()
    }

    async fn wait_for(&self, _selector: &str, _timeout: Duration) -> Result<bool> {
        Self::gone()
    }

    async fn wait_for_navigation(&self, _timeout: Duration) -> Result<bool> {
        Self::gone()
    }

    async fn click(&self, _selector: &str) -> Result<()> {
        Self::gone()
    }

    async fn type_text(&self, _selector: &str, _text: &str, _delay: Duration) -> Result<()> {
        Self::gone()
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
