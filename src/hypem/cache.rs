//! Time-limited memoization of decoded responses.
//!
//! Entries are keyed by the canonical operation name and the ordered
//! argument values of the call. An entry is served while its age is below the
//! TTL passed to [`MemoCache::get_or_compute`]; stale entries are overwritten
//! in place on the next successful call. Nothing is evicted otherwise.
//!
//! The store is never locked while a value is being computed, so a slow
//! request only delays callers asking for the same key.
//!
//! One [`MemoCache`] may be shared by any number of clients, which means
//! clients holding different credentials observe each other's anonymous
//! results. [`MemoCache::shared`] returns the process-wide instance the client
//! builder uses by default.

use std::{
    collections::HashMap,
    future::Future,
    sync::Arc,
    time::{Duration, Instant},
};

use once_cell::sync::Lazy;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::{error::Result, types::ParamValue};

static SHARED: Lazy<Arc<MemoCache>> = Lazy::new(|| Arc::new(MemoCache::new()));

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub operation: String,
    pub args: Vec<ParamValue>,
}

impl CacheKey {
    pub fn new(operation: impl Into<String>, args: Vec<ParamValue>) -> Self {
        Self {
            operation: operation.into(),
            args,
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    created_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() < ttl
    }
}

/// Memoization store shared by any number of clients.
///
/// Two locks are involved and neither is held across a network call:
///
/// - `entries` guards the stored values and is only taken for a lookup or an
///   insert.
/// - `flights` hands out one async mutex per key. A caller that has to
///   compute holds its key's mutex for the duration, so concurrent callers
///   for the *same* key wait and then read the stored value, while callers
///   for other keys proceed immediately.
#[derive(Debug, Default)]
pub struct MemoCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    flights: Mutex<HashMap<CacheKey, Arc<Mutex<()>>>>,
}

impl MemoCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache.
    pub fn shared() -> Arc<MemoCache> {
        Arc::clone(&SHARED)
    }

    /// Returns the cached value for `key` if it is younger than `ttl`,
    /// otherwise runs `compute`, stores its result and returns it.
    ///
    /// # Arguments
    ///
    /// * `key` - Canonical operation name plus the ordered argument values
    /// * `ttl` - Maximum age of a stored value that may still be served
    /// * `compute` - Produces the value on a miss, usually one HTTP round trip
    ///
    /// # Returns
    ///
    /// - `Ok(Value)` - The stored value on a hit, the freshly computed one on
    ///   a miss
    /// - `Err(HypemError)` - Whatever `compute` returned
    ///
    /// # Concurrency
    ///
    /// Only one `compute` runs per key at a time. Callers asking for the same
    /// key while it is being computed wait for it and are then served from
    /// the cache. Callers asking for other keys are never blocked by an
    /// in-flight computation.
    ///
    /// # Errors
    ///
    /// Errors are returned as-is and leave the cache untouched, so the next
    /// call for the same key tries again.
    ///
    /// # Example
    ///
    /// ```
    /// let key = CacheKey::new("get_tags", vec![ParamValue::Absent]);
    /// let tags = cache
    ///     .get_or_compute(key, Duration::from_secs(600), || fetch_tags())
    ///     .await?;
    /// ```
    pub async fn get_or_compute<F, Fut>(&self, key: CacheKey, ttl: Duration, compute: F) -> Result<Value>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value>>,
    {
        if let Some(value) = self.lookup(&key, ttl).await {
            return Ok(value);
        }

        let flight = self.flight(&key).await;
        let result = {
            let _guard = flight.lock().await;

            // filled while we were waiting for the key
            match self.lookup(&key, ttl).await {
                Some(value) => Ok(value),
                None => self.compute_and_store(key.clone(), compute).await,
            }
        };

        self.release_flight(&key, flight).await;
        result
    }

    async fn lookup(&self, key: &CacheKey, ttl: Duration) -> Option<Value> {
        let entries = self.entries.lock().await;
        let entry = entries.get(key)?;
        if entry.is_fresh(ttl) {
            tracing::debug!(operation = %key.operation, "cache hit");
            Some(entry.value.clone())
        } else {
            tracing::debug!(operation = %key.operation, "cache entry expired");
            None
        }
    }

    async fn compute_and_store<F, Fut>(&self, key: CacheKey, compute: F) -> Result<Value>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value>>,
    {
        let value = compute().await?;
        self.entries.lock().await.insert(
            key,
            CacheEntry {
                value: value.clone(),
                created_at: Instant::now(),
            },
        );
        Ok(value)
    }

    async fn flight(&self, key: &CacheKey) -> Arc<Mutex<()>> {
        let mut flights = self.flights.lock().await;
        Arc::clone(flights.entry(key.clone()).or_default())
    }

    /// Drops the per-key mutex once no other caller holds a handle to it.
    async fn release_flight(&self, key: &CacheKey, flight: Arc<Mutex<()>>) {
        let mut flights = self.flights.lock().await;
        // one handle in the map, one here
        if Arc::strong_count(&flight) <= 2 {
            flights.remove(key);
        }
    }

    /// True if a fresh entry exists for `key`.
    pub async fn contains(&self, key: &CacheKey, ttl: Duration) -> bool {
        self.entries
            .lock()
            .await
            .get(key)
            .is_some_and(|entry| entry.is_fresh(ttl))
    }

    /// Number of stored entries, stale ones included.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }
}
