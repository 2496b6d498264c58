//! Data the API does not expose, read from the public track pages.
//!
//! Please be nice to their servers: both lookups are memoized like any
//! other read.

use reqwest::header;
use scraper::{Html, Selector};
use serde_json::Value;

use crate::{
    error::Result,
    hypem::{cache::CacheKey, client::HypemClient, response},
    types::{DisplayList, DisplayListTrack, ParamValue},
};

/// Text of every `ul.tags li` element on a track page.
pub fn parse_track_tags(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("ul.tags li") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .map(|li| li.text().collect::<String>().trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// First entry of the page's `displayList-data` JSON, if the page has one.
pub fn parse_display_list(html: &str) -> Option<DisplayListTrack> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("#displayList-data").ok()?;
    let script = document.select(&selector).next()?;
    let raw: String = script.text().collect();

    match serde_json::from_str::<DisplayList>(raw.trim()) {
        Ok(list) => list.tracks.into_iter().next(),
        Err(e) => {
            tracing::debug!("unreadable displayList-data: {}", e);
            None
        }
    }
}

/// Python-style truthiness of the `type` field; falsy means the stream is
/// no longer available.
fn is_streamable(track: &DisplayListTrack) -> bool {
    match &track.kind {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

impl HypemClient {
    async fn track_page(&self, track_id: &str) -> Result<String> {
        let url = format!(
            "{}/track/{}",
            self.site_url,
            urlencoding::encode(track_id)
        );
        let raw = self.execute(self.http.get(&url)).await?;
        response::check_status(&raw)?;
        Ok(raw.body)
    }

    /// Genre tags shown on a track's page.
    ///
    /// The page is `{site_url}/track/{track_id}`; tags are the text of its
    /// `ul.tags li` elements. Results are memoized under `get_track_tags`.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<String>)` - Tags in page order, empty when the page has none
    ///
    /// # Errors
    ///
    /// - `HypemError::RateLimit`, `HypemError::Api` or
    ///   `HypemError::UnhandledStatus` for a non-2xx page (404 for unknown
    ///   tracks)
    /// - `HypemError::Http` on transport failure
    pub async fn get_track_tags(&self, track_id: &str) -> Result<Vec<String>> {
        let key = CacheKey::new("get_track_tags", vec![ParamValue::from(track_id)]);
        let value = self
            .cache
            .get_or_compute(key, self.cache_ttl, || self.scrape_tags(track_id))
            .await?;

        Ok(serde_json::from_value(value)?)
    }

    /// URL of a track's audio stream.
    ///
    /// Reads the first entry of the page's `displayList-data` JSON and asks
    /// `{site_url}/serve/source/{id}/{key}` for the URL. Session cookies set
    /// by the page are sent along. Results are memoized under
    /// `get_track_stream`.
    ///
    /// # Returns
    ///
    /// - `Ok(String)` - The stream URL, or an empty string when the page has
    ///   no playable entry or its `type` is falsy
    ///
    /// # Errors
    ///
    /// Same as [`HypemClient::get_track_tags`], plus any error of
    /// [`response::interpret`] for the serve request.
    ///
    /// # Example
    ///
    /// ```
    /// let url = client.get_track_stream("2fv7a").await?;
    /// if url.is_empty() {
    ///     warning!("not streamable");
    /// }
    /// ```
    pub async fn get_track_stream(&self, track_id: &str) -> Result<String> {
        let key = CacheKey::new("get_track_stream", vec![ParamValue::from(track_id)]);
        let value = self
            .cache
            .get_or_compute(key, self.cache_ttl, || self.scrape_stream(track_id))
            .await?;

        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn scrape_tags(&self, track_id: &str) -> Result<Value> {
        let html = self.track_page(track_id).await?;
        Ok(Value::from(parse_track_tags(&html)))
    }

    async fn scrape_stream(&self, track_id: &str) -> Result<Value> {
        let html = self.track_page(track_id).await?;
        let url = match parse_display_list(&html) {
            Some(track) if is_streamable(&track) => self.serve_url(&track).await?,
            _ => String::new(),
        };
        Ok(Value::from(url))
    }

    async fn serve_url(&self, track: &DisplayListTrack) -> Result<String> {
        let url = format!("{}/serve/source/{}/{}", self.site_url, track.id, track.key);
        let request = self
            .http
            .get(&url)
            .header(header::CONTENT_TYPE, "application/json");
        let raw = self.execute(request).await?;
        let json = response::interpret(&raw)?;

        Ok(json
            .get("url")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string())
    }
}
