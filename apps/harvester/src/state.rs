use std::sync::Arc;

use tokio::sync::watch;

use crate::config::Config;
use crate::session::Session;

/// Shared application state handed to every command.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Session>,
    pub config: Config,
    /// Flips to `true` once on Ctrl-C. Long runs check it between pages.
    pub cancel: watch::Receiver<bool>,
}
