// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;
use std::time::Duration;

use super::SessionStore;

const TTL: Duration = Duration::from_secs(3600);

#[tokio::test]
async fn put_then_get_returns_stored_pair() -> anyhow::Result<()> {
    let store = SessionStore::new();
    store.put("42", "cap-key".into(), "id-token".into(), TTL).await;

    assert_eq!(store.capability_key("42").await.as_deref(), Some("cap-key"));
    assert_eq!(store.identity_token("42").await.as_deref(), Some("id-token"));
    assert_eq!(store.active_count().await, 1);
    Ok(())
}

#[tokio::test]
async fn unknown_user_is_a_miss() -> anyhow::Result<()> {
    let store = SessionStore::new();
    assert_eq!(store.capability_key("nobody").await, None);
    assert_eq!(store.identity_token("nobody").await, None);
    Ok(())
}

#[tokio::test]
async fn expired_record_is_evicted_on_read() -> anyhow::Result<()> {
    let store = SessionStore::new();
    store.put("42", "cap-key".into(), "id-token".into(), Duration::ZERO).await;
    tokio::time::sleep(Duration::from_millis(5)).await;

    assert_eq!(store.capability_key("42").await, None);
    assert_eq!(store.active_count().await, 0);
    // The read deleted the record; nothing is left for a sweep to find.
    assert_eq!(store.sweep_expired().await, 0);
    Ok(())
}

#[tokio::test]
async fn put_overwrites_and_resets_expiry() -> anyhow::Result<()> {
    let store = SessionStore::new();
    store.put("42", "old-key".into(), "old-token".into(), Duration::ZERO).await;
    store.put("42", "new-key".into(), "new-token".into(), TTL).await;
    tokio::time::sleep(Duration::from_millis(5)).await;

    assert_eq!(store.capability_key("42").await.as_deref(), Some("new-key"));
    assert_eq!(store.identity_token("42").await.as_deref(), Some("new-token"));
    Ok(())
}

#[tokio::test]
async fn remove_reports_presence() -> anyhow::Result<()> {
    let store = SessionStore::new();
    store.put("42", "cap-key".into(), "id-token".into(), TTL).await;

    assert!(store.remove("42").await);
    assert_eq!(store.capability_key("42").await, None);
    assert!(!store.remove("42").await);
    Ok(())
}

#[tokio::test]
async fn sweep_removes_exactly_the_expired() -> anyhow::Result<()> {
    let store = SessionStore::new();
    store.put("live-1", "k1".into(), "t1".into(), TTL).await;
    store.put("live-2", "k2".into(), "t2".into(), TTL).await;
    store.put("dead", "k3".into(), "t3".into(), Duration::ZERO).await;
    tokio::time::sleep(Duration::from_millis(5)).await;

    let active_before = store.active_count().await;
    assert_eq!(active_before, 2);

    assert_eq!(store.sweep_expired().await, 1);
    assert_eq!(store.active_count().await, active_before);
    assert!(store.capability_key("live-1").await.is_some());
    assert!(store.capability_key("live-2").await.is_some());
    assert_eq!(store.capability_key("dead").await, None);
    Ok(())
}

#[tokio::test]
async fn concurrent_puts_for_distinct_users_all_land() -> anyhow::Result<()> {
    let store = Arc::new(SessionStore::new());
    let mut tasks = Vec::new();
    for i in 0..64 {
        let store = Arc::clone(&store);
        tasks.push(tokio::spawn(async move {
            store.put(&format!("user-{i}"), format!("key-{i}"), format!("tok-{i}"), TTL).await;
        }));
    }
    for task in tasks {
        task.await?;
    }

    assert_eq!(store.active_count().await, 64);
    for i in 0..64 {
        assert_eq!(store.capability_key(&format!("user-{i}")).await, Some(format!("key-{i}")));
    }
    Ok(())
}
