//! Configuration management for hypemcli.
//!
//! Configuration values come from environment variables, optionally loaded
//! from a `.env` file in the local data directory. Every value has a default
//! so the client works out of the box against the public API.
//!
//! Lookup order:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Built-in defaults

use std::{env, path::PathBuf, time::Duration};

use crate::hypem::{
    ClientBuilder, HypemClient,
    auth::DEFAULT_SITE_KEY,
    client::{DEFAULT_API_URL, DEFAULT_CACHE_TTL_SECS, DEFAULT_DOCS_URL, DEFAULT_SITE_URL},
};

/// Directory holding the `.env` file and the cached session.
///
/// - Linux: `~/.local/share/hypemcli`
/// - macOS: `~/Library/Application Support/hypemcli`
/// - Windows: `%LOCALAPPDATA%/hypemcli`
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("hypemcli");
    path
}

/// Loads environment variables from `<data_dir>/.env`.
///
/// Creates the data directory if needed. A missing `.env` file is not an
/// error; an unreadable one is.
pub async fn load_env() -> Result<(), String> {
    let dir = data_dir();
    async_fs::create_dir_all(&dir)
        .await
        .map_err(|e| e.to_string())?;

    let path = dir.join(".env");
    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Site key identifying the application (`HYPEM_API_KEY`).
pub fn api_key() -> String {
    var_or("HYPEM_API_KEY", DEFAULT_SITE_KEY)
}

/// API base URL (`HYPEM_API_URL`).
pub fn api_url() -> String {
    var_or("HYPEM_API_URL", DEFAULT_API_URL)
}

/// Website base URL used for scraping (`HYPEM_SITE_URL`).
pub fn site_url() -> String {
    var_or("HYPEM_SITE_URL", DEFAULT_SITE_URL)
}

/// Location of the API documentation (`HYPEM_DOCS_URL`).
pub fn docs_url() -> String {
    var_or("HYPEM_DOCS_URL", DEFAULT_DOCS_URL)
}

/// Lifetime of memoized responses (`HYPEM_CACHE_TTL_SECS`).
///
/// Unparsable values fall back to the default.
pub fn cache_ttl() -> Duration {
    let secs = env::var("HYPEM_CACHE_TTL_SECS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_CACHE_TTL_SECS);
    Duration::from_secs(secs)
}

/// Optional request timeout (`HYPEM_TIMEOUT_SECS`).
pub fn timeout() -> Option<Duration> {
    env::var("HYPEM_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}

/// Session token supplied through the environment (`HYPEM_TOKEN`).
pub fn session_token() -> Option<String> {
    env::var("HYPEM_TOKEN").ok().filter(|v| !v.trim().is_empty())
}

/// Client builder populated from the configuration above.
pub fn client_builder() -> ClientBuilder {
    let mut builder = HypemClient::builder()
        .api_url(api_url())
        .site_url(site_url())
        .docs_url(docs_url())
        .site_key(api_key())
        .cache_ttl(cache_ttl());

    if let Some(timeout) = timeout() {
        builder = builder.timeout(timeout);
    }
    if let Some(token) = session_token() {
        builder = builder.session_token(token);
    }
    builder
}
