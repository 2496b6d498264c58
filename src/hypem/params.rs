//! Query-string and form-payload formatting.
//!
//! Only truthy values are serialized. The session-token parameter accepts a
//! `Bool(true)` placeholder meaning "whatever token the client holds", which
//! is swapped in at serialization time.

use crate::types::{ParamValue, Params};

/// Name of the session-token parameter.
pub const TOKEN_PARAM: &str = "hm_token";

/// Name of the site-key parameter appended to every request.
pub const SITE_KEY_PARAM: &str = "key";

/// Replaces the `hm_token` placeholder with the stored token. Every other
/// value is returned unchanged.
pub fn resolve_placeholder(name: &str, value: &ParamValue, session_token: Option<&str>) -> ParamValue {
    if name == TOKEN_PARAM && *value == ParamValue::Bool(true) {
        return session_token.map(ParamValue::from).unwrap_or_default();
    }
    value.clone()
}

/// Formats one parameter as a query-string fragment.
///
/// # Arguments
///
/// * `name` - Parameter name, written as-is
/// * `value` - Parameter value; its string form is percent-encoded
/// * `session_token` - Stored token, used when `name` is `hm_token` and
///   `value` is `Bool(true)`
///
/// # Returns
///
/// `"name=value&"`, or an empty string when the (resolved) value is falsy:
/// `Absent`, `Bool(false)`, `Int(0)` or empty text. `Bool(true)` is written
/// as `1`.
///
/// # Example
///
/// ```
/// assert_eq!(format_param("q", &"jazz".into(), None), "q=jazz&");
/// assert_eq!(format_param("page", &ParamValue::Int(0), None), "");
/// assert_eq!(format_param("hm_token", &true.into(), Some("t")), "hm_token=t&");
/// ```
pub fn format_param(name: &str, value: &ParamValue, session_token: Option<&str>) -> String {
    let value = resolve_placeholder(name, value, session_token);
    if !value.is_truthy() {
        return String::new();
    }
    format!("{name}={}&", urlencoding::encode(&value.to_string()))
}

/// Concatenates [`format_param`] over `params` in insertion order, skipping
/// the names listed in `exclude`.
pub fn format_many(params: &Params, exclude: &[String], session_token: Option<&str>) -> String {
    params
        .iter()
        .filter(|(name, _)| !exclude.iter().any(|e| e == name))
        .map(|(name, value)| format_param(name, value, session_token))
        .collect()
}

/// Form-body pairs with the same filtering rules as [`format_many`].
pub fn payload(params: &Params, exclude: &[String], session_token: Option<&str>) -> Vec<(String, String)> {
    params
        .iter()
        .filter(|(name, _)| !exclude.iter().any(|e| e == name))
        .filter_map(|(name, value)| {
            let value = resolve_placeholder(name, value, session_token);
            value
                .is_truthy()
                .then(|| (name.to_string(), value.to_string()))
        })
        .collect()
}
