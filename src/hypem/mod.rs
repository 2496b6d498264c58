//! # Hype Machine Integration Module
//!
//! Client for the Hype Machine v2 HTTP API and the two pieces of track data
//! that are only available on the public website.
//!
//! ## Architecture
//!
//! ```text
//! Typed methods (api)          Generic call(operation, params)
//!          ↓                              ↓
//!     Endpoint table lookup (endpoints, docs) + alias resolution
//!          ↓
//!     Validation: allowed values, required params, session token (auth)
//!          ↓
//!     Memoization of GET results (cache)
//!          ↓
//!     Query/form formatting (params) → HTTP (client)
//!          ↓
//!     Status interpretation + JSON decoding (response)
//! ```
//!
//! ## Status codes
//!
//! - 2xx → decoded JSON (an empty body is a protocol error)
//! - 403 → [`crate::error::HypemError::RateLimit`]
//! - 401 → [`crate::error::HypemError::Api`] with the server's `error_msg`
//! - anything else → [`crate::error::HypemError::UnhandledStatus`]
//!
//! No request is ever retried; every error reaches the caller as-is.
//!
//! ## Authentication
//!
//! Requests carry the site key (`key`, `swagger` by default). Operations
//! under `/me` additionally need a session token (`hm_token`) which comes
//! from the call itself or, failing that, from the client
//! ([`HypemClient::login`], [`HypemClient::register`] or the builder). A
//! missing token is reported before anything is sent.
//!
//! ## Caching
//!
//! GET results are memoized per canonical operation and argument list for the
//! client's TTL. The default cache is shared by every client in the process;
//! inject a private [`MemoCache`] through the builder to isolate a client.

pub mod api;
pub mod auth;
pub mod cache;
pub mod client;
pub mod docs;
pub mod endpoints;
pub mod params;
pub mod response;
pub mod scrape;

pub use auth::Credentials;
pub use cache::{CacheKey, MemoCache};
pub use client::{ClientBuilder, HypemClient};
pub use endpoints::EndpointTable;
