//! Error types for the Hype Machine client.
//!
//! Every failure the library can produce is a [`HypemError`]. Errors raised
//! before any network traffic happens are grouped under
//! [`HypemError::Validation`] so callers can tell "nothing was sent" apart
//! from failures reported by the remote service.

/// Result type alias for Hype Machine operations.
pub type Result<T> = std::result::Result<T, HypemError>;

/// Errors that can occur when using the Hype Machine client.
#[derive(Debug, thiserror::Error)]
pub enum HypemError {
    /// The call was rejected locally, before any request was made.
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),

    /// The service answered with 403.
    #[error("403 Error/Rate Limit Encountered")]
    RateLimit,

    /// The service answered with 401 and an `error_msg`.
    #[error("API error: {message}")]
    Api { message: String },

    /// Any status code the client has no rule for.
    #[error("Status code unhandled: {status} ({url})")]
    UnhandledStatus { status: u16, url: String },

    /// A successful status with a body that breaks the service contract.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Transport failure (DNS, TLS, connection reset, timeout...)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Local JSON (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// API documentation could not be turned into endpoint definitions.
    #[error("Malformed API documentation: {0}")]
    Docs(String),
}

/// Reasons a call is refused before it reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("\"{param}\" must be one of {allowed:?}, got \"{value}\"")]
    InvalidChoice {
        param: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("missing required parameter \"{param}\" for {operation}")]
    MissingParameter { operation: String, param: String },

    #[error("{operation} does not accept a parameter named \"{param}\"")]
    UnexpectedParameter { operation: String, param: String },

    #[error("{operation} requires a session token (hm_token) and none is available")]
    AuthenticationRequired { operation: String },

    #[error("{0}")]
    MissingCredentials(String),

    #[error("unknown operation \"{0}\"")]
    UnknownOperation(String),
}

impl HypemError {
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    pub fn docs(msg: impl Into<String>) -> Self {
        Self::Docs(msg.into())
    }

    /// True when the error was raised without touching the network.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
