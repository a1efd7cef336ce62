//! HTTP-backed browser. Fetches the server-rendered page and lifts the
//! `window.appCache = {...}` literal out of its inline script.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use super::{Browser, NavigateOptions, NavigationError, PageState};

const APP_CACHE_MARKER: &str = "window.appCache";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct HttpBrowser {
    client: Client,
    current: Arc<PageState>,
}

impl HttpBrowser {
    pub fn new(user_agent: &str) -> Result<Self, NavigationError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            current: Arc::new(PageState::default()),
        })
    }
}

#[async_trait]
impl Browser for HttpBrowser {
    async fn navigate(
        &mut self,
        address: &str,
        options: NavigateOptions,
    ) -> Result<(), NavigationError> {
        let mut request = self.client.get(address);
        if let Some(timeout) = options.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(NavigationError::NotFound(address.to_string()));
        }
        if !status.is_success() {
            return Err(NavigationError::Status {
                address: address.to_string(),
                status: status.as_u16(),
            });
        }

        // The cache literal is in the initial document, so every wait
        // condition is satisfied once the body has arrived.
        let html = response.text().await?;
        let state = extract_page_state(&html).map_err(|e| match e {
            NavigationError::MissingState(_) => {
                NavigationError::MissingState(address.to_string())
            }
            other => other,
        })?;
        if state.apollo_state.is_empty() {
            warn!("{address} carries an empty page cache");
        }
        debug!(
            "Loaded {address}: {} snapshot records, app version {:?}",
            state.apollo_state.len(),
            state.app_version
        );

        self.current = Arc::new(state);
        Ok(())
    }

    fn snapshot(&self) -> Arc<PageState> {
        Arc::clone(&self.current)
    }
}

/// Parses the first JSON value assigned to `window.appCache` in `html`.
/// Anything after that value (`;</script>` and the rest of the page) is ignored.
pub fn extract_page_state(html: &str) -> Result<PageState, NavigationError> {
    let missing = || NavigationError::MissingState(APP_CACHE_MARKER.to_string());

    let start = html.find(APP_CACHE_MARKER).ok_or_else(missing)?;
    let literal = html[start + APP_CACHE_MARKER.len()..]
        .trim_start()
        .strip_prefix('=')
        .ok_or_else(missing)?;

    let mut values = serde_json::Deserializer::from_str(literal).into_iter::<serde_json::Value>();
    match values.next() {
        Some(Ok(json)) => Ok(PageState::from_json(json)?),
        Some(Err(e)) => Err(NavigationError::Parse(e)),
        None => Err(missing()),
    }
}
