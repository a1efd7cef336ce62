//! Browser session: the single point of entry for page navigation.
//!
//! ARCHITECTURAL RULE: no other module talks to a `Browser` directly. The
//! session owns the one navigable page; `visit` holds the lock across
//! "navigate, then take the snapshot" so two callers can never interleave.
//! Snapshots come back as `Arc<PageState>` and can be shared with
//! concurrent readers after the lock is released.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::graph::store::Snapshot;
use crate::graph::value::Value;

pub mod http;
#[cfg(test)]
pub mod memory;

#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{address} returned status {status}")]
    Status { address: String, status: u16 },

    #[error("no page state found at {0}")]
    MissingState(String),

    #[error("page state parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no page at {0}")]
    NotFound(String),
}

/// When a navigation counts as finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitCondition {
    Load,
    DomContentLoaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigateOptions {
    /// `None` waits indefinitely.
    pub timeout: Option<Duration>,
    pub wait_until: WaitCondition,
}

impl NavigateOptions {
    pub fn bounded(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            wait_until: WaitCondition::Load,
        }
    }

    pub fn unbounded(wait_until: WaitCondition) -> Self {
        Self {
            timeout: None,
            wait_until,
        }
    }
}

/// The page's client cache (`window.appCache`) at one point in time.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageState {
    #[serde(default)]
    pub app_version: Option<String>,
    #[serde(default)]
    pub initial_state: Value,
    #[serde(default)]
    pub apollo_state: Snapshot,
}

impl PageState {
    pub fn from_json(json: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(json)
    }
}

/// A navigable page that exposes its cache snapshot.
#[async_trait]
pub trait Browser: Send + Sync {
    /// Loads `address`. On error the previous snapshot stays current.
    async fn navigate(
        &mut self,
        address: &str,
        options: NavigateOptions,
    ) -> Result<(), NavigationError>;

    fn snapshot(&self) -> Arc<PageState>;
}

pub struct Session {
    browser: Mutex<Box<dyn Browser>>,
}

impl Session {
    pub fn new(browser: impl Browser + 'static) -> Self {
        Self {
            browser: Mutex::new(Box::new(browser)),
        }
    }

    /// Navigates and returns the resulting snapshot as one atomic step.
    /// Navigation failures are logged and swallowed; the caller then sees
    /// whatever snapshot the page still holds.
    pub async fn visit(&self, address: &str, options: NavigateOptions) -> Arc<PageState> {
        let mut browser = self.browser.lock().await;
        debug!("Navigating to {address} ({options:?})");
        if let Err(e) = browser.navigate(address, options).await {
            warn!("Navigation to {address} failed: {e}");
        }
        browser.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::memory::MemoryBrowser;
    use super::*;
    use serde_json::json;

    fn page(version: &str) -> PageState {
        PageState::from_json(json!({"appVersion": version, "apolloState": {}})).unwrap()
    }

    #[test]
    fn test_page_state_defaults_missing_sections() {
        let state = PageState::from_json(json!({})).unwrap();
        assert!(state.app_version.is_none());
        assert!(state.initial_state.is_null());
        assert!(state.apollo_state.is_empty());
    }

    #[tokio::test]
    async fn test_visit_returns_new_snapshot() {
        let browser = MemoryBrowser::new().with_page("https://a", page("1"));
        let session = Session::new(browser);
        let state = session
            .visit("https://a", NavigateOptions::unbounded(WaitCondition::Load))
            .await;
        assert_eq!(state.app_version.as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_failed_visit_keeps_previous_snapshot() {
        let browser = MemoryBrowser::new().with_page("https://a", page("1"));
        let session = Session::new(browser);
        let options = NavigateOptions::bounded(Duration::from_secs(1));
        session.visit("https://a", options).await;
        let state = session.visit("https://missing", options).await;
        assert_eq!(state.app_version.as_deref(), Some("1"));
    }
}
