//! In-memory browser serving canned page states by address. Stands in for
//! the HTTP browser in tests of everything above the session.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{Browser, NavigateOptions, NavigationError, PageState};

#[derive(Default)]
pub struct MemoryBrowser {
    pages: HashMap<String, Arc<PageState>>,
    current: Arc<PageState>,
    history: Arc<Mutex<Vec<String>>>,
}

impl MemoryBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, address: &str, state: PageState) -> Self {
        self.pages.insert(address.to_string(), Arc::new(state));
        self
    }

    /// Every address navigated to, in order, including failed ones.
    /// The handle stays valid after the browser moves into a `Session`.
    pub fn history(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.history)
    }
}

#[async_trait]
impl Browser for MemoryBrowser {
    async fn navigate(
        &mut self,
        address: &str,
        _options: NavigateOptions,
    ) -> Result<(), NavigationError> {
        if let Ok(mut history) = self.history.lock() {
            history.push(address.to_string());
        }
        let state = self
            .pages
            .get(address)
            .ok_or_else(|| NavigationError::NotFound(address.to_string()))?;
        self.current = Arc::clone(state);
        Ok(())
    }

    fn snapshot(&self) -> Arc<PageState> {
        Arc::clone(&self.current)
    }
}
