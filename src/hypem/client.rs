//! HTTP client for the Hype Machine API.
//!
//! [`HypemClient`] owns one `reqwest` session, the credentials, a handle to a
//! [`MemoCache`] and the [`EndpointTable`]. Every endpoint goes through
//! [`HypemClient::call`]:
//!
//! 1. resolve the operation name (aliases included)
//! 2. validate parameters, fill defaults, resolve the session token
//! 3. render the path, then GET (memoized) or POST/DELETE a form body
//! 4. interpret the status code and decode the JSON body
//!
//! Nothing is sent when step 2 fails.
//!
//! # Example
//!
//! ```no_run
//! use hypemcli::hypem::HypemClient;
//! use hypemcli::types::Params;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HypemClient::new()?;
//!     let track = client.call("get_track", Params::new().with("itemid", "2fv7a")).await?;
//!     println!("{}", track);
//!     Ok(())
//! }
//! ```

use std::{sync::Arc, time::Duration};

use reqwest::{Client, RequestBuilder, header};
use serde_json::Value;

use crate::{
    error::{Result, ValidationError},
    hypem::{
        auth::{Credentials, DEFAULT_SITE_KEY},
        cache::{CacheKey, MemoCache},
        endpoints::EndpointTable,
        params::{self, SITE_KEY_PARAM, TOKEN_PARAM},
        response,
    },
    types::{EndpointDef, HttpVerb, ParamValue, Params, RawResponse},
    utils,
};

/// Default API base URL
pub const DEFAULT_API_URL: &str = "https://api.hypem.com/v2";

/// Default website URL, used for scraping
pub const DEFAULT_SITE_URL: &str = "https://hypem.com";

/// Default location of the API's self-description
pub const DEFAULT_DOCS_URL: &str = "https://api.hypem.com/api-docs";

/// Default lifetime of memoized responses
pub const DEFAULT_CACHE_TTL_SECS: u64 = 600;

/// User-Agent sent with every request
pub const USER_AGENT: &str = concat!("hypemcli/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct HypemClient {
    pub(crate) http: Client,
    api_url: String,
    pub(crate) site_url: String,
    docs_url: String,
    user_agent: String,
    pub(crate) credentials: Credentials,
    pub(crate) cache: Arc<MemoCache>,
    pub(crate) cache_ttl: Duration,
    endpoints: Arc<EndpointTable>,
}

/// A call that passed validation and is ready to be sent.
#[derive(Debug)]
struct PreparedCall {
    path: String,
    params: Params,
    exclude: Vec<String>,
}

impl PreparedCall {
    /// Argument values for the cache key. Values that are not sent at all
    /// (`Absent`, empty text) collapse to `Absent` so equivalent requests
    /// share one entry.
    fn cache_args(&self) -> Vec<ParamValue> {
        self.params
            .iter()
            .map(|(_, v)| if v.is_present() { v.clone() } else { ParamValue::Absent })
            .collect()
    }
}

impl HypemClient {
    /// Client with default settings and the process-wide cache.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    pub fn docs_url(&self) -> &str {
        &self.docs_url
    }

    pub fn cache(&self) -> &Arc<MemoCache> {
        &self.cache
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl
    }

    pub fn endpoints(&self) -> &EndpointTable {
        &self.endpoints
    }

    /// Replaces the endpoint table, e.g. with one built from the API docs.
    pub fn set_endpoints(&mut self, table: EndpointTable) {
        self.endpoints = Arc::new(table);
    }

    /// Executes an operation from the endpoint table.
    ///
    /// This is the single entry point behind every typed endpoint method. It
    /// validates the call against the operation's definition, builds the
    /// request and interprets the response.
    ///
    /// # Arguments
    ///
    /// * `operation` - Canonical operation name (`get_track`) or a legacy
    ///   alias (`get_track_info`); both share cache entries
    /// * `params` - Named argument values. Names must be declared by the
    ///   operation. Path identifiers (`itemid`, `playlist_id`, ...) are
    ///   rendered into the path and left out of the query or body.
    ///   `hm_token` may be `Bool(true)` to mean "the stored token".
    ///
    /// # Returns
    ///
    /// - `Ok(Value)` - The decoded JSON body
    /// - `Err(HypemError)` - See below
    ///
    /// # Validation
    ///
    /// All of it happens before any network I/O. Declared defaults are filled
    /// in first (`get_artists` sends `sort=popular`), then:
    /// - Unknown operation → `ValidationError::UnknownOperation`
    /// - Undeclared parameter → `ValidationError::UnexpectedParameter`
    /// - Required `hm_token` without an explicit or stored token →
    ///   `ValidationError::AuthenticationRequired`
    /// - Missing required parameter → `ValidationError::MissingParameter`
    /// - Present value outside the allowed set →
    ///   `ValidationError::InvalidChoice`
    ///
    /// # Errors
    ///
    /// After validation, errors come from [`response::interpret`]
    /// (`RateLimit`, `Api`, `UnhandledStatus`, `Protocol`) or from the
    /// transport (`Http`). No error is retried.
    ///
    /// # Caching
    ///
    /// GET results are memoized under the canonical operation name and the
    /// ordered argument values, including the token actually sent, for the
    /// client's cache TTL. POST and DELETE always hit the network. Failures
    /// are never cached.
    ///
    /// # Example
    ///
    /// ```
    /// let params = Params::new().with("q", "jazz").with("sort", "loved");
    /// let tracks = client.call("get_tracks", params).await?;
    ///
    /// // same cache entry as get_track
    /// let track = client.call("get_track_info", Params::new().with("itemid", "2fv7a")).await?;
    /// ```
    pub async fn call(&self, operation: &str, params: Params) -> Result<Value> {
        let endpoint = self
            .endpoints
            .resolve(operation)
            .ok_or_else(|| ValidationError::UnknownOperation(operation.to_string()))?;
        let prepared = self.prepare(endpoint, params)?;

        tracing::debug!(operation = %endpoint.name, verb = %endpoint.verb, path = %prepared.path, "dispatching");

        match endpoint.verb {
            HttpVerb::Get => {
                let key = CacheKey::new(&endpoint.name, prepared.cache_args());
                self.cache
                    .get_or_compute(key, self.cache_ttl, || {
                        self.perform_get(&prepared.path, &prepared.params, &prepared.exclude)
                    })
                    .await
            }
            HttpVerb::Post => {
                self.perform_post(&prepared.path, &prepared.params, &prepared.exclude)
                    .await
            }
            HttpVerb::Delete => {
                self.perform_delete(&prepared.path, &prepared.params, &prepared.exclude)
                    .await
            }
        }
    }

    /// Validates `params` against `endpoint` and puts them in definition
    /// order with defaults filled and the session token resolved.
    fn prepare(&self, endpoint: &EndpointDef, mut params: Params) -> Result<PreparedCall> {
        if let Some(name) = params.names().find(|n| endpoint.param(n).is_none()) {
            return Err(ValidationError::UnexpectedParameter {
                operation: endpoint.name.clone(),
                param: name.to_string(),
            }
            .into());
        }

        let mut ordered = Params::new();
        for def in &endpoint.params {
            let mut value = params.remove(&def.name).unwrap_or_default();
            if !value.is_present() {
                if let Some(default) = &def.default {
                    value = ParamValue::from(default.as_str());
                }
            }

            if def.name == TOKEN_PARAM {
                value = if def.required {
                    let token = self
                        .credentials
                        .resolve_token(value.as_text(), &endpoint.name)?;
                    ParamValue::Text(token)
                } else {
                    params::resolve_placeholder(TOKEN_PARAM, &value, self.credentials.session_token())
                };
            } else if def.required && !value.is_present() {
                return Err(ValidationError::MissingParameter {
                    operation: endpoint.name.clone(),
                    param: def.name.clone(),
                }
                .into());
            }

            if !def.allowed.is_empty() && value.is_present() {
                let rendered = value.to_string();
                if !def.allowed.contains(&rendered) {
                    return Err(ValidationError::InvalidChoice {
                        param: def.name.clone(),
                        value: rendered,
                        allowed: def.allowed.clone(),
                    }
                    .into());
                }
            }

            ordered.set(&def.name, value);
        }

        let path = utils::render_path(&endpoint.path, &ordered).map_err(|param| {
            ValidationError::MissingParameter {
                operation: endpoint.name.clone(),
                param,
            }
        })?;

        Ok(PreparedCall {
            path,
            params: ordered,
            exclude: endpoint.path_params(),
        })
    }

    /// Sends a GET request and decodes the JSON response, without validation
    /// or caching.
    ///
    /// The URL is `api_url + path + "?" + query + "key=" + site_key`, where
    /// the query is [`params::format_many`] over `params`. Falsy values are
    /// left out and the `hm_token` placeholder is replaced by the stored
    /// token.
    ///
    /// # Arguments
    ///
    /// * `path` - Already rendered path, e.g. `/tracks/2fv7a`
    /// * `params` - Query parameters in the order they should appear
    /// * `exclude` - Names to leave out, usually the path identifiers
    ///
    /// # Errors
    ///
    /// - `HypemError::Http` on transport failure
    /// - Any error of [`response::interpret`]
    pub async fn perform_get(&self, path: &str, params: &Params, exclude: &[String]) -> Result<Value> {
        let url = format!(
            "{base}{path}?{query}{key}={site_key}",
            base = self.api_url,
            query = params::format_many(params, exclude, self.credentials.session_token()),
            key = SITE_KEY_PARAM,
            site_key = urlencoding::encode(self.credentials.site_key()),
        );

        let raw = self.execute(self.http.get(&url)).await?;
        response::interpret(&raw)
    }

    /// Sends a POST request with a form-encoded body and decodes the JSON
    /// response, without validation.
    ///
    /// The body is [`params::payload`] over `params` followed by
    /// `key=<site_key>`.
    ///
    /// # Arguments
    ///
    /// * `path` - Already rendered path, e.g. `/me/favorites`
    /// * `params` - Form fields; falsy values are left out
    /// * `exclude` - Names to leave out, usually the path identifiers
    ///
    /// # Errors
    ///
    /// Same as [`HypemClient::perform_get`].
    pub async fn perform_post(&self, path: &str, params: &Params, exclude: &[String]) -> Result<Value> {
        let url = format!("{}{}", self.api_url, path);
        self.send_form(self.http.post(&url), params, exclude).await
    }

    /// Sends a DELETE request with the same form-body rules as
    /// [`HypemClient::perform_post`].
    pub async fn perform_delete(&self, path: &str, params: &Params, exclude: &[String]) -> Result<Value> {
        let url = format!("{}{}", self.api_url, path);
        self.send_form(self.http.delete(&url), params, exclude).await
    }

    async fn send_form(&self, request: RequestBuilder, params: &Params, exclude: &[String]) -> Result<Value> {
        let mut form = params::payload(params, exclude, self.credentials.session_token());
        form.push((
            SITE_KEY_PARAM.to_string(),
            self.credentials.site_key().to_string(),
        ));

        let raw = self.execute(request.form(&form)).await?;
        response::interpret(&raw)
    }

    /// Sends `request` with the client's User-Agent and collects status, URL
    /// and body.
    pub(crate) async fn execute(&self, request: RequestBuilder) -> Result<RawResponse> {
        let response = request
            .header(header::USER_AGENT, &self.user_agent)
            .send()
            .await?;

        let status = response.status().as_u16();
        let mut url = response.url().clone();
        url.set_query(None);
        let body = response.text().await?;

        tracing::debug!(status, url = %url, bytes = body.len(), "response received");

        Ok(RawResponse {
            status,
            url: url.to_string(),
            body,
        })
    }
}

/// Builder for [`HypemClient`].
///
/// Every setting has a default: the public API and website URLs, the
/// `swagger` site key, no session token, the process-wide cache with a
/// 600 second TTL, no request timeout and the built-in endpoint table.
///
/// # Example
///
/// ```
/// let client = HypemClient::builder()
///     .site_key("my-app")
///     .session_token(token)
///     .cache(Arc::new(MemoCache::new()))
///     .cache_ttl(Duration::from_secs(60))
///     .timeout(Duration::from_secs(10))
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    api_url: String,
    site_url: String,
    docs_url: String,
    user_agent: String,
    site_key: String,
    session_token: Option<String>,
    cache: Option<Arc<MemoCache>>,
    cache_ttl: Duration,
    timeout: Option<Duration>,
    http: Option<Client>,
    endpoints: Option<EndpointTable>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            site_url: DEFAULT_SITE_URL.to_string(),
            docs_url: DEFAULT_DOCS_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
            site_key: DEFAULT_SITE_KEY.to_string(),
            session_token: None,
            cache: None,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            timeout: None,
            http: None,
            endpoints: None,
        }
    }
}

impl ClientBuilder {
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn site_url(mut self, url: impl Into<String>) -> Self {
        self.site_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn docs_url(mut self, url: impl Into<String>) -> Self {
        self.docs_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn site_key(mut self, key: impl Into<String>) -> Self {
        self.site_key = key.into();
        self
    }

    pub fn session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    /// Use `cache` instead of the process-wide one.
    pub fn cache(mut self, cache: Arc<MemoCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Per-request timeout. Ignored when a custom HTTP client is supplied.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn http_client(mut self, client: Client) -> Self {
        self.http = Some(client);
        self
    }

    pub fn endpoints(mut self, table: EndpointTable) -> Self {
        self.endpoints = Some(table);
        self
    }

    /// Creates the client.
    ///
    /// # Errors
    ///
    /// - `HypemError::Http` if the HTTP client cannot be built (TLS backend
    ///   initialisation)
    pub fn build(self) -> Result<HypemClient> {
        let http = match self.http {
            Some(client) => client,
            None => {
                let mut builder = Client::builder().cookie_store(true);
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                builder.build()?
            }
        };

        let mut credentials = Credentials::new(&self.site_key);
        if let Some(token) = &self.session_token {
            credentials.set_session_token(token);
        }

        Ok(HypemClient {
            http,
            api_url: self.api_url,
            site_url: self.site_url,
            docs_url: self.docs_url,
            user_agent: self.user_agent,
            credentials,
            cache: self.cache.unwrap_or_else(MemoCache::shared),
            cache_ttl: self.cache_ttl,
            endpoints: Arc::new(self.endpoints.unwrap_or_else(EndpointTable::builtin)),
        })
    }
}
