//! Site key and session-token management.
//!
//! Every request carries the site key (`key`) identifying the application.
//! Operations under `/me` and the write operations additionally need a
//! session token (`hm_token`) identifying the user. Tokens are obtained with
//! [`HypemClient::login`] or [`HypemClient::register`], or supplied directly
//! through [`HypemClient::set_session_token`] or the client builder.

use serde_json::Value;

use crate::{
    error::{HypemError, Result, ValidationError},
    hypem::{client::HypemClient, params::TOKEN_PARAM},
    types::{LoginCredentials, Params, Signup},
    utils,
};

/// Site key documented for public use of the API.
pub const DEFAULT_SITE_KEY: &str = "swagger";

/// The site key identifying the application and the optional session token
/// identifying the end user.
#[derive(Debug, Clone)]
pub struct Credentials {
    site_key: String,
    session_token: Option<String>,
}

impl Default for Credentials {
    fn default() -> Self {
        Self::new(DEFAULT_SITE_KEY)
    }
}

impl Credentials {
    pub fn new(site_key: &str) -> Self {
        Self {
            site_key: site_key.to_string(),
            session_token: None,
        }
    }

    pub fn site_key(&self) -> &str {
        &self.site_key
    }

    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref().filter(|t| !t.is_empty())
    }

    pub fn set_site_key(&mut self, key: &str) {
        self.site_key = key.to_string();
    }

    pub fn set_session_token(&mut self, token: &str) {
        self.session_token = Some(token.to_string()).filter(|t| !t.is_empty());
    }

    pub fn clear_session_token(&mut self) {
        self.session_token = None;
    }

    /// Picks the token for an authenticated call.
    ///
    /// # Arguments
    ///
    /// * `explicit` - Token passed with the call; empty strings count as
    ///   absent
    /// * `operation` - Operation name used in the error
    ///
    /// # Returns
    ///
    /// - `Ok(String)` - The explicit token if given, otherwise the stored one
    /// - `Err(HypemError)` - `ValidationError::AuthenticationRequired` when
    ///   neither exists
    pub fn resolve_token(&self, explicit: Option<&str>, operation: &str) -> Result<String> {
        explicit
            .filter(|t| !t.is_empty())
            .or(self.session_token())
            .map(str::to_string)
            .ok_or_else(|| {
                ValidationError::AuthenticationRequired {
                    operation: operation.to_string(),
                }
                .into()
            })
    }
}

fn filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

fn missing(msg: &str) -> HypemError {
    ValidationError::MissingCredentials(msg.to_string()).into()
}

fn check_twitter_pair(token: &Option<String>, secret: &Option<String>) -> Result<()> {
    if filled(token) != filled(secret) {
        return Err(missing("Must provide both twitter token and secret"));
    }
    Ok(())
}

/// Accepts username + password, a facebook token, or a twitter token pair.
pub fn validate_login(credentials: &LoginCredentials) -> Result<()> {
    if filled(&credentials.username) != filled(&credentials.password) {
        return Err(missing("Must pass both username and password"));
    }
    check_twitter_pair(&credentials.tw_oauth_token, &credentials.tw_oauth_token_secret)?;

    let has_any = filled(&credentials.username)
        || filled(&credentials.fb_oauth_token)
        || filled(&credentials.tw_oauth_token);
    if !has_any {
        return Err(missing(
            "Requires username and password, a facebook token, or a twitter token and secret",
        ));
    }
    Ok(())
}

fn extract_token(response: &Value) -> Result<String> {
    response
        .get(TOKEN_PARAM)
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .ok_or_else(|| HypemError::protocol("response does not contain an hm_token"))
}

impl HypemClient {
    /// Obtains a session token from `/get_token`, stores it on the client
    /// and returns it.
    ///
    /// At least one login method must be complete:
    /// - `username` and `password`
    /// - `fb_oauth_token` (the account must already be connected to Facebook
    ///   on the website)
    /// - `tw_oauth_token` and `tw_oauth_token_secret`
    ///
    /// A random 16-hex-character `device_id` is generated for every login.
    ///
    /// # Arguments
    ///
    /// * `credentials` - Login method, see above
    ///
    /// # Returns
    ///
    /// - `Ok(String)` - The new session token, now also used by every call
    ///   that needs one
    /// - `Err(HypemError)` - See below
    ///
    /// # Errors
    ///
    /// - `ValidationError::MissingCredentials` if no method is complete, or
    ///   a username comes without a password (or the reverse), or a twitter
    ///   token comes without its secret (or the reverse). Nothing is sent.
    /// - `HypemError::Api` for wrong credentials (401)
    /// - `HypemError::Protocol` if a successful response has no `hm_token`
    /// - Any other error of [`HypemClient::call`]
    ///
    /// The stored token is left unchanged when login fails.
    ///
    /// # Example
    ///
    /// ```
    /// let mut client = HypemClient::new()?;
    /// let token = client.login(LoginCredentials::password("me", "secret")).await?;
    /// let feed = client.get_my_feed(None, None, None, None).await?;
    /// ```
    pub async fn login(&mut self, credentials: LoginCredentials) -> Result<String> {
        validate_login(&credentials)?;

        let params = Params::new()
            .with("username", credentials.username)
            .with("password", credentials.password)
            .with("fb_oauth_token", credentials.fb_oauth_token)
            .with("tw_oauth_token", credentials.tw_oauth_token)
            .with("tw_oauth_token_secret", credentials.tw_oauth_token_secret)
            .with("device_id", utils::generate_device_id());

        let response = self.call("get_token", params).await?;
        let token = extract_token(&response)?;
        self.credentials.set_session_token(&token);
        tracing::debug!("session token acquired via /get_token");
        Ok(token)
    }

    /// Creates an account via `/signup`, stores the returned session token
    /// and returns it.
    ///
    /// # Arguments
    ///
    /// * `signup` - `username`, `email` and `password` are required;
    ///   `newsletter` is sent only when true; `device_id` is generated when
    ///   absent; the facebook and twitter fields are optional
    ///
    /// # Errors
    ///
    /// - `ValidationError::MissingCredentials` if only one of the twitter
    ///   token and secret is set
    /// - `ValidationError::MissingParameter` if username, email or password
    ///   is empty
    /// - `HypemError::Protocol` if a successful response has no `hm_token`
    /// - Any other error of [`HypemClient::call`]
    ///
    /// Validation errors are raised before anything is sent.
    pub async fn register(&mut self, signup: Signup) -> Result<String> {
        check_twitter_pair(&signup.tw_oauth_token, &signup.tw_oauth_token_secret)?;

        let device_id = signup
            .device_id
            .filter(|d| !d.is_empty())
            .unwrap_or_else(utils::generate_device_id);

        let params = Params::new()
            .with("username", signup.username)
            .with("email", signup.email)
            .with("password", signup.password)
            .with("newsletter", signup.newsletter)
            .with("device_id", device_id)
            .with("fb_uid", signup.fb_uid)
            .with("fb_oauth_token", signup.fb_oauth_token)
            .with("tw_oauth_token", signup.tw_oauth_token)
            .with("tw_oauth_token_secret", signup.tw_oauth_token_secret);

        let response = self.call("signup", params).await?;
        let token = extract_token(&response)?;
        self.credentials.set_session_token(&token);
        tracing::debug!("session token acquired via /signup");
        Ok(token)
    }

    /// Forgets the stored session token. Nothing is sent to the service.
    pub fn logout(&mut self) {
        self.credentials.clear_session_token();
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn session_token(&self) -> Option<&str> {
        self.credentials.session_token()
    }

    pub fn set_session_token(&mut self, token: &str) {
        self.credentials.set_session_token(token);
    }

    pub fn set_site_key(&mut self, key: &str) {
        self.credentials.set_site_key(key);
    }
}
