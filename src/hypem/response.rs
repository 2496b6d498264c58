//! Classification of HTTP responses into values and errors.

use serde_json::Value;

use crate::{
    error::{HypemError, Result},
    types::RawResponse,
};

/// Classifies a response by status code without looking at a successful body.
///
/// - 2xx: ok
/// - 403: [`HypemError::RateLimit`]
/// - 401: [`HypemError::Api`] with the body's `error_msg`
/// - anything else: [`HypemError::UnhandledStatus`]
pub fn check_status(response: &RawResponse) -> Result<()> {
    match response.status {
        200..=299 => Ok(()),
        403 => Err(HypemError::RateLimit),
        401 => Err(HypemError::Api {
            message: error_message(&response.body),
        }),
        status => Err(HypemError::UnhandledStatus {
            status,
            url: response.url.clone(),
        }),
    }
}

/// Checks the status and decodes a successful body as JSON.
///
/// # Arguments
///
/// * `response` - Status, final URL (without query string) and body text
///
/// # Returns
///
/// - `Ok(Value)` - The decoded body of a 2xx response
/// - `Err(HypemError)` - See below
///
/// # Errors
///
/// - `HypemError::RateLimit` - status 403
/// - `HypemError::Api` - status 401; the message is the body's `error_msg`,
///   or the whole trimmed body when there is none
/// - `HypemError::UnhandledStatus` - any other non-2xx status, with the URL
/// - `HypemError::Protocol` - 2xx with a blank or non-JSON body
///
/// # Example
///
/// ```
/// let raw = RawResponse { status: 401, url, body: r#"{"error_msg":"bad token"}"#.into() };
/// assert!(matches!(interpret(&raw), Err(HypemError::Api { .. })));
/// ```
pub fn interpret(response: &RawResponse) -> Result<Value> {
    check_status(response)?;

    if response.body.trim().is_empty() {
        return Err(HypemError::protocol(format!(
            "empty body with status {} from {}",
            response.status, response.url
        )));
    }

    serde_json::from_str(&response.body).map_err(|e| {
        HypemError::protocol(format!("response from {} is not JSON: {e}", response.url))
    })
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| json.get("error_msg").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}
