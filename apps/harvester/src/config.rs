use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_SITE_BASE_URL: &str = "https://www.glassdoor.com";
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub site_base_url: String,
    pub output_dir: PathBuf,
    /// Applied to navigations that are not explicitly unbounded.
    pub nav_timeout: Duration,
    pub reviews_page_size: u32,
    pub user_agent: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            site_base_url: env_or("SITE_BASE_URL", DEFAULT_SITE_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            output_dir: PathBuf::from(env_or("OUTPUT_DIR", ".")),
            nav_timeout: Duration::from_secs(parse_env("NAV_TIMEOUT_SECS", 30)?),
            reviews_page_size: parse_env("REVIEWS_PAGE_SIZE", 10)?,
            user_agent: env_or("HTTP_USER_AGENT", DEFAULT_USER_AGENT),
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("{key} must be a valid number, got '{raw}'"))
}
