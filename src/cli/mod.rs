//! # CLI Module
//!
//! Command implementations behind the `hypemcli` binary. Each command builds
//! a [`HypemClient`] from the configuration (see [`crate::config`]), runs one
//! library operation and prints the result.
//!
//! ## Commands
//!
//! - [`call`] - run any endpoint by name (or alias) with `name=value` params
//! - [`login`], [`signup`], [`logout`] - manage the persisted session token
//! - [`endpoints`] - list the endpoint table, optionally from the live docs
//! - [`tags`], [`stream`] - data scraped from a track page
//!
//! ## Usage Patterns
//!
//! ```bash
//! hypemcli call get_tracks -p q=jazz -p sort=loved
//! hypemcli login --username me --password secret
//! hypemcli call favorites_me --session
//! hypemcli stream 2fv7a
//! ```
//!
//! Failures are reported with the `error!` macro, which exits the process.

mod auth;
mod call;
mod endpoints;
mod scrape;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{config, error, hypem::HypemClient, management::SessionManager, warning};

pub use auth::{login, logout, signup};
pub use call::call;
pub use endpoints::endpoints;
pub use scrape::{stream, tags};

/// Client built from the configuration. With `with_session`, the persisted
/// session token (if any) is attached.
async fn build_client(with_session: bool) -> HypemClient {
    let mut client = match config::client_builder().build() {
        Ok(c) => c,
        Err(e) => error!("Cannot create HTTP client. Err: {}", e),
    };

    if with_session && client.session_token().is_none() {
        match SessionManager::load().await {
            Ok(session) => client.set_session_token(session.token()),
            Err(_) => warning!("No stored session. Run hypemcli login first."),
        }
    }

    client
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}
