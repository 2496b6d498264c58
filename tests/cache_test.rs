use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use hypemcli::error::HypemError;
use hypemcli::hypem::{CacheKey, MemoCache};
use hypemcli::types::ParamValue;
use serde_json::{Value, json};

const TTL: Duration = Duration::from_secs(600);

// Helper function to build a key for get_track with one item id
fn track_key(itemid: &str) -> CacheKey {
    CacheKey::new("get_track", vec![ParamValue::from(itemid), ParamValue::Absent])
}

#[tokio::test]
async fn test_hit_within_ttl() {
    let cache = MemoCache::new();
    let calls = AtomicUsize::new(0);

    for _ in 0..3 {
        let value = cache
            .get_or_compute(track_key("2fv7a"), TTL, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(json!({"itemid": "2fv7a"}))
            })
            .await
            .unwrap();
        assert_eq!(value["itemid"], "2fv7a");
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(cache.len().await, 1);
    assert!(cache.contains(&track_key("2fv7a"), TTL).await);
}

#[tokio::test]
async fn test_different_arguments_are_different_entries() {
    let cache = MemoCache::new();

    cache
        .get_or_compute(track_key("a"), TTL, || async { Ok(json!(1)) })
        .await
        .unwrap();
    let value = cache
        .get_or_compute(track_key("b"), TTL, || async { Ok(json!(2)) })
        .await
        .unwrap();

    assert_eq!(value, json!(2));
    assert_eq!(cache.len().await, 2);

    // Same arguments under another operation name do not collide
    let other = CacheKey::new("get_track_blogs", vec![ParamValue::from("a"), ParamValue::Absent]);
    assert!(!cache.contains(&other, TTL).await);
}

#[tokio::test]
async fn test_recompute_after_ttl() {
    let cache = MemoCache::new();
    let ttl = Duration::from_millis(50);

    let first = cache
        .get_or_compute(track_key("x"), ttl, || async { Ok(json!("old")) })
        .await
        .unwrap();
    assert_eq!(first, json!("old"));

    tokio::time::sleep(Duration::from_millis(80)).await;
    assert!(!cache.contains(&track_key("x"), ttl).await);

    let second = cache
        .get_or_compute(track_key("x"), ttl, || async { Ok(json!("new")) })
        .await
        .unwrap();
    assert_eq!(second, json!("new"));

    // The stale entry was replaced, not duplicated
    assert_eq!(cache.len().await, 1);
}

#[tokio::test]
async fn test_zero_ttl_never_serves_cached_values() {
    let cache = MemoCache::new();
    let calls = AtomicUsize::new(0);

    for _ in 0..2 {
        cache
            .get_or_compute(track_key("x"), Duration::ZERO, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(Value::Null)
            })
            .await
            .unwrap();
    }

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_errors_are_not_cached() {
    let cache = MemoCache::new();

    let err = cache
        .get_or_compute(track_key("x"), TTL, || async { Err(HypemError::RateLimit) })
        .await
        .unwrap_err();
    assert!(matches!(err, HypemError::RateLimit));
    assert!(cache.is_empty().await);

    let value = cache
        .get_or_compute(track_key("x"), TTL, || async { Ok(json!("ok")) })
        .await
        .unwrap();
    assert_eq!(value, json!("ok"));
}

#[tokio::test]
async fn test_concurrent_callers_compute_once() {
    let cache = Arc::new(MemoCache::new());
    let calls = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let cache = Arc::clone(&cache);
        let calls = Arc::clone(&calls);
        handles.push(tokio::spawn(async move {
            cache
                .get_or_compute(track_key("shared"), TTL, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    Ok(json!("value"))
                })
                .await
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), json!("value"));
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_clear() {
    let cache = MemoCache::new();
    cache
        .get_or_compute(track_key("x"), TTL, || async { Ok(json!(1)) })
        .await
        .unwrap();

    cache.clear().await;
    assert!(cache.is_empty().await);
}

#[tokio::test]
async fn test_slow_computation_does_not_block_other_keys() {
    let cache = Arc::new(MemoCache::new());

    let slow = {
        let cache = Arc::clone(&cache);
        tokio::spawn(async move {
            cache
                .get_or_compute(track_key("slow"), TTL, || async {
                    tokio::time::sleep(Duration::from_millis(1500)).await;
                    Ok(json!("slow"))
                })
                .await
        })
    };

    // Let the slow computation start
    tokio::time::sleep(Duration::from_millis(50)).await;

    let fast = tokio::time::timeout(
        Duration::from_millis(500),
        cache.get_or_compute(track_key("fast"), TTL, || async { Ok(json!("fast")) }),
    )
    .await
    .expect("another key must not wait for the slow computation")
    .unwrap();
    assert_eq!(fast, json!("fast"));

    // A stored key is readable while the slow one is still running
    assert!(cache.contains(&track_key("fast"), TTL).await);
    assert!(!slow.is_finished());

    assert_eq!(slow.await.unwrap().unwrap(), json!("slow"));
    assert_eq!(cache.len().await, 2);
}

#[tokio::test]
async fn test_waiting_caller_reads_value_of_finished_computation() {
    let cache = Arc::new(MemoCache::new());
    let calls = Arc::new(AtomicUsize::new(0));

    let first = {
        let cache = Arc::clone(&cache);
        let calls = Arc::clone(&calls);
        tokio::spawn(async move {
            cache
                .get_or_compute(track_key("x"), TTL, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    Ok(json!("first"))
                })
                .await
        })
    };

    tokio::time::sleep(Duration::from_millis(20)).await;

    // Same key: waits for the first caller and never computes
    let second = cache
        .get_or_compute(track_key("x"), TTL, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(json!("second"))
        })
        .await
        .unwrap();

    assert_eq!(second, json!("first"));
    assert_eq!(first.await.unwrap().unwrap(), json!("first"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failed_computation_lets_waiting_caller_retry() {
    let cache = Arc::new(MemoCache::new());

    let failing = {
        let cache = Arc::clone(&cache);
        tokio::spawn(async move {
            cache
                .get_or_compute(track_key("x"), TTL, || async {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    Err(HypemError::RateLimit)
                })
                .await
        })
    };

    tokio::time::sleep(Duration::from_millis(10)).await;

    let value = cache
        .get_or_compute(track_key("x"), TTL, || async { Ok(json!("retried")) })
        .await
        .unwrap();

    assert!(matches!(failing.await.unwrap(), Err(HypemError::RateLimit)));
    assert_eq!(value, json!("retried"));
}
