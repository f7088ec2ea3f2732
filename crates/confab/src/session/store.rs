// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory TTL store for per-user session credentials.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::session::{epoch_ms, CredentialRecord};
use crate::state::AppState;

/// Thread-safe map of user id to credential record with TTL expiry.
///
/// A single lock guards the whole table; every critical section is short
/// and never awaits. Eviction is lazy: any read past expiry deletes the
/// record and reports a miss, so no background sweep is required for
/// correctness. There is no size bound; memory grows with the number of
/// distinct users inside the TTL window.
pub struct SessionStore {
    records: Mutex<HashMap<String, CredentialRecord>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self { records: Mutex::new(HashMap::new()) }
    }

    /// Insert or overwrite the record for `user_id`, resetting its expiry.
    /// Last writer wins when two logins for the same user race.
    pub async fn put(
        &self,
        user_id: &str,
        capability_key: String,
        identity_token: String,
        ttl: Duration,
    ) {
        let now = epoch_ms();
        let record = CredentialRecord {
            user_id: user_id.to_owned(),
            capability_key,
            identity_token,
            created_at: now,
            expires_at: now.saturating_add(ttl.as_millis() as u64),
        };
        let expires_at = record.expires_at;
        self.records.lock().await.insert(user_id.to_owned(), record);
        tracing::info!(user_id = %user_id, expires_at, "stored session credentials");
    }

    /// Capability key for `user_id`, or `None` if absent or expired.
    pub async fn capability_key(&self, user_id: &str) -> Option<String> {
        self.live_record(user_id).await.map(|r| r.capability_key)
    }

    /// Identity token for `user_id`, same expiry semantics as
    /// [`Self::capability_key`].
    pub async fn identity_token(&self, user_id: &str) -> Option<String> {
        self.live_record(user_id).await.map(|r| r.identity_token)
    }

    /// Unconditionally delete the record for `user_id` (logout). Returns
    /// whether a record existed.
    pub async fn remove(&self, user_id: &str) -> bool {
        let removed = self.records.lock().await.remove(user_id).is_some();
        if removed {
            tracing::info!(user_id = %user_id, "removed session credentials");
        }
        removed
    }

    /// Delete every record past its expiry; returns how many were removed.
    pub async fn sweep_expired(&self) -> usize {
        let now = epoch_ms();
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|_, r| r.expires_at >= now);
        let removed = before - records.len();
        if removed > 0 {
            tracing::info!(removed, "swept expired session credentials");
        }
        removed
    }

    /// Number of non-expired records at this instant.
    pub async fn active_count(&self) -> usize {
        let now = epoch_ms();
        self.records.lock().await.values().filter(|r| now <= r.expires_at).count()
    }

    /// Fetch a clone of the live record, deleting it if found expired.
    async fn live_record(&self, user_id: &str) -> Option<CredentialRecord> {
        let mut records = self.records.lock().await;
        let record = records.get(user_id)?;
        if epoch_ms() > record.expires_at {
            records.remove(user_id);
            tracing::debug!(user_id = %user_id, "evicted expired session credentials");
            return None;
        }
        Some(record.clone())
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawn a background task that periodically sweeps expired records, so
/// sessions of users who never come back don't linger until a read
/// happens to touch them.
pub fn spawn_sweeper(state: Arc<AppState>, shutdown: CancellationToken) {
    let interval = state.config.sweep_interval();

    tokio::spawn(async move {
        let mut timer = tokio::time::interval(interval);
        timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = timer.tick() => {}
            }
            state.store.sweep_expired().await;
        }
    });
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
