//! In-memory browser used by unit tests

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::browser::{BrowserEngine, BrowserPage};
use crate::error::{ReelfetchError, Result};

/// Scripted page: fixed DOM, fixed attributes, recorded interactions
#[derive(Clone, Default)]
pub struct FakePage {
    pub html: String,
    pub attributes: HashMap<(String, String), String>,
    pub present: HashSet<String>,
    pub fail_navigation: bool,
    pub events: Arc<Mutex<Vec<String>>>,
    close_delay: Duration,
    closes: Arc<AtomicUsize>,
}

impl FakePage {
    pub fn with_html(html: &str) -> Self {
        Self {
            html: html.to_string(),
            ..Self::default()
        }
    }

    pub fn attr(mut self, selector: &str, name: &str, value: &str) -> Self {
        self.attributes
            .insert((selector.to_string(), name.to_string()), value.to_string());
        self.present.insert(selector.to_string());
        self
    }

    pub fn element(mut self, selector: &str) -> Self {
        self.present.insert(selector.to_string());
        self
    }

    pub fn failing_navigation(mut self) -> Self {
        self.fail_navigation = true;
        self
    }

    /// Makes `close` take `delay` before it counts as done
    pub fn slow_close(mut self, delay: Duration) -> Self {
        self.close_delay = delay;
        self
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    fn record(&self, event: String) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

#[async_trait]
impl BrowserPage for FakePage {
    async fn goto(&self, url: &str) -> Result<()> {
        self.record(format!("goto {url}"));
        if self.fail_navigation {
            return Err(ReelfetchError::Navigation(format!("{url}: timed out")));
        }
        Ok(())
    }

    async fn content(&self) -> Result<String> {
        Ok(self.html.clone())
    }

    async fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>> {
        Ok(self
            .attributes
            .get(&(selector.to_string(), name.to_string()))
            .cloned())
    }

    async fn wait_for(&self, selector: &str, _timeout: Duration) -> Result<bool> {
        self.record(format!("wait {selector}"));
        Ok(self.present.contains(selector))
    }

    async fn wait_for_navigation(&self, _timeout: Duration) -> Result<bool> {
        Ok(true)
    }

    async fn click(&self, selector: &str) -> Result<()> {
        if !self.present.contains(selector) {
            return Err(ReelfetchError::Browser(format!("no element {selector}")));
        }
        self.record(format!("click {selector}"));
        Ok(())
    }

    async fn type_text(&self, selector: &str, text: &str, _delay: Duration) -> Result<()> {
        self.record(format!("type {selector} {text}"));
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        if !self.close_delay.is_zero() {
            tokio::time::sleep(self.close_delay).await;
        }
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Engine handing out clones of one scripted page
pub struct FakeEngine {
    template: Option<FakePage>,
    launches: AtomicUsize,
}

impl FakeEngine {
    pub fn new(page: FakePage) -> Self {
        Self {
            template: Some(page),
            launches: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            template: None,
            launches: AtomicUsize::new(0),
        }
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.template.as_ref().map(FakePage::closes).unwrap_or(0)
    }
}

#[async_trait]
impl BrowserEngine for FakeEngine {
    async fn launch(&self) -> Result<Box<dyn BrowserPage>> {
        let Some(ref page) = self.template else {
            return Err(ReelfetchError::Browser("launch failed".to_string()));
        };
        self.launches.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(page.clone()))
    }
}
