// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session credential brokering: the TTL store and the identity token reader.

pub mod store;
pub mod token;

/// One authenticated session's credentials.
///
/// Owned exclusively by the [`store::SessionStore`]; other components see
/// at most a clone scoped to a single operation. Cache-only: a process
/// restart forces every session to re-authenticate.
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    /// Stable external user identity; the store key.
    pub user_id: String,
    /// Authorizes calls to the downstream agent backend for this user.
    pub capability_key: String,
    /// Authorizes calls back to the identity server.
    pub identity_token: String,
    /// Epoch millis at insertion.
    pub created_at: u64,
    /// `created_at + ttl`; the record is retrievable while `now <= expires_at`.
    pub expires_at: u64,
}

/// Current epoch millis.
pub(crate) fn epoch_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
