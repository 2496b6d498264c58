use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// A single request parameter value.
///
/// Values are hashable and compare by value so they can take part in
/// cache keys. `Absent`, `Bool(false)`, `Int(0)` and `Text("")` are falsy
/// and never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ParamValue {
    #[default]
    Absent,
    Bool(bool),
    Int(i64),
    Text(String),
}

impl ParamValue {
    pub fn is_truthy(&self) -> bool {
        match self {
            ParamValue::Absent => false,
            ParamValue::Bool(b) => *b,
            ParamValue::Int(i) => *i != 0,
            ParamValue::Text(s) => !s.is_empty(),
        }
    }

    /// Present means "the caller supplied something", even a falsy number.
    /// Path identifiers such as playlist `0` rely on this.
    pub fn is_present(&self) -> bool {
        match self {
            ParamValue::Absent => false,
            ParamValue::Text(s) => !s.is_empty(),
            _ => true,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Absent => Ok(()),
            ParamValue::Bool(true) => f.write_str("1"),
            ParamValue::Bool(false) => f.write_str("0"),
            ParamValue::Int(i) => write!(f, "{i}"),
            ParamValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        ParamValue::Text(value.clone())
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Int(value as i64)
    }
}

impl From<u8> for ParamValue {
    fn from(value: u8) -> Self {
        ParamValue::Int(value as i64)
    }
}

impl From<TokenArg> for ParamValue {
    fn from(value: TokenArg) -> Self {
        match value {
            TokenArg::None => ParamValue::Absent,
            TokenArg::Stored => ParamValue::Bool(true),
            TokenArg::Explicit(token) => ParamValue::Text(token),
        }
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(ParamValue::Absent)
    }
}

/// Ordered name/value mapping used for query strings and form payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, ParamValue)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Params::set`].
    pub fn with(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Sets a value, keeping the original position when the name exists.
    pub fn set(&mut self, name: &str, value: impl Into<ParamValue>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn remove(&mut self, name: &str) -> Option<ParamValue> {
        let idx = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (name, value) in iter {
            params.set(name.as_ref(), value);
        }
        params
    }
}

/// Per-call session token argument of the typed endpoint methods.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TokenArg {
    /// Send no token.
    #[default]
    None,
    /// Send the token stored on the client, if there is one.
    Stored,
    /// Send this token.
    Explicit(String),
}

impl From<Option<&str>> for TokenArg {
    fn from(value: Option<&str>) -> Self {
        match value {
            Some(token) if !token.is_empty() => TokenArg::Explicit(token.to_string()),
            _ => TokenArg::None,
        }
    }
}

impl From<&str> for TokenArg {
    fn from(value: &str) -> Self {
        TokenArg::from(Some(value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpVerb {
    Get,
    Post,
    Delete,
}

impl HttpVerb {
    pub fn parse(method: &str) -> Option<Self> {
        match method.to_ascii_uppercase().as_str() {
            "GET" => Some(HttpVerb::Get),
            "POST" => Some(HttpVerb::Post),
            "DELETE" => Some(HttpVerb::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HttpVerb::Get => "GET",
            HttpVerb::Post => "POST",
            HttpVerb::Delete => "DELETE",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDef {
    pub name: String,
    pub required: bool,
    pub allowed: Vec<String>,
    pub default: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointDef {
    pub name: String,
    pub verb: HttpVerb,
    pub path: String,
    pub params: Vec<ParamDef>,
    pub summary: String,
}

/// Status, URL and body of an HTTP exchange, detached from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub url: String,
    pub body: String,
}

/// Credentials accepted by `/get_token`.
#[derive(Debug, Clone, Default)]
pub struct LoginCredentials {
    pub username: Option<String>,
    pub password: Option<String>,
    pub fb_oauth_token: Option<String>,
    pub tw_oauth_token: Option<String>,
    pub tw_oauth_token_secret: Option<String>,
}

impl LoginCredentials {
    pub fn password(username: &str, password: &str) -> Self {
        Self {
            username: Some(username.to_string()),
            password: Some(password.to_string()),
            ..Default::default()
        }
    }
}

/// Account details accepted by `/signup`.
#[derive(Debug, Clone, Default)]
pub struct Signup {
    pub username: String,
    pub email: String,
    pub password: String,
    pub newsletter: bool,
    pub device_id: Option<String>,
    pub fb_uid: Option<String>,
    pub fb_oauth_token: Option<String>,
    pub tw_oauth_token: Option<String>,
    pub tw_oauth_token_secret: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub hm_token: String,
    pub username: Option<String>,
    pub obtained_at: DateTime<Utc>,
}

/// Playback entry embedded in a track page's `displayList-data` script.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayListTrack {
    pub id: String,
    pub key: String,
    #[serde(rename = "type", default)]
    pub kind: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayList {
    pub tracks: Vec<DisplayListTrack>,
}

#[derive(Tabled)]
pub struct EndpointTableRow {
    pub name: String,
    pub verb: String,
    pub path: String,
    pub auth: String,
    pub params: String,
}
