// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Authentication orchestrator: the two-step handshake against the remote
//! identity server (verify identity, then mint a capability key).

use std::time::Duration;

use serde::Deserialize;

use crate::error::BrokerError;

/// Bounded timeout per remote call; callers never block indefinitely.
const REMOTE_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of a completed handshake.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user_id: String,
    pub identity_token: String,
    pub capability_key: String,
    /// Public attributes of the authenticated principal, passed through to
    /// the client unmodified.
    pub profile: serde_json::Value,
}

/// `{success, data, error}` envelope used by the identity server.
#[derive(Debug, Deserialize)]
struct RemoteEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: serde_json::Value,
    #[serde(default)]
    error: Option<String>,
}

/// Client for the remote identity server. Stateless; one instance is
/// shared process-wide.
pub struct IdentityClient {
    base_url: String,
    http: reqwest::Client,
}

impl IdentityClient {
    pub fn new(base_url: &str) -> Self {
        let http = reqwest::Client::builder().timeout(REMOTE_TIMEOUT).build().unwrap_or_default();
        Self { base_url: base_url.trim_end_matches('/').to_owned(), http }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Run the handshake: login, then mint a capability key authorized by
    /// the fresh identity token. A single failed step aborts the whole
    /// operation; no caching and no retries here, the caller decides
    /// whether to retry.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthSession, BrokerError> {
        let (identity_token, profile, user_id) = self.login(username, password).await?;
        let capability_key = self.issue_capability_key(username, &identity_token).await?;

        tracing::info!(user_id = %user_id, username = %username, "handshake complete, capability key issued");
        Ok(AuthSession { user_id, identity_token, capability_key, profile })
    }

    /// Step 1: `POST {base}/login` with the submitted credentials.
    async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(String, serde_json::Value, String), BrokerError> {
        let resp = self
            .http
            .post(self.url("/login"))
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(err = %e, "login request failed");
                BrokerError::transport("unable to connect to authentication server")
            })?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(%status, username = %username, "login rejected by identity server");
            return Err(BrokerError::rejected("authentication failed"));
        }

        let envelope: RemoteEnvelope = resp.json().await.map_err(|e| {
            tracing::error!(err = %e, "malformed login response");
            BrokerError::transport("authentication server error")
        })?;
        if !envelope.success {
            let message = envelope.error.unwrap_or_else(|| "authentication failed".to_owned());
            tracing::warn!(username = %username, error = %message, "login rejected by identity server");
            return Err(BrokerError::rejected(message));
        }

        let identity_token = envelope
            .data
            .get("token")
            .and_then(|v| v.as_str())
            .map(str::to_owned)
            .ok_or_else(|| BrokerError::transport("authentication server error"))?;
        let profile = envelope
            .data
            .get("user")
            .cloned()
            .ok_or_else(|| BrokerError::transport("authentication server error"))?;
        let user_id = profile
            .get("id")
            .and_then(id_string)
            .ok_or_else(|| BrokerError::transport("authentication server error"))?;

        Ok((identity_token, profile, user_id))
    }

    /// Step 2: `POST {base}/api-keys` authorized with the identity token,
    /// requesting a key labeled for traceability.
    async fn issue_capability_key(
        &self,
        username: &str,
        identity_token: &str,
    ) -> Result<String, BrokerError> {
        let resp = self
            .http
            .post(self.url("/api-keys"))
            .bearer_auth(identity_token)
            .json(&serde_json::json!({ "name": format!("confab session - {username}") }))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(err = %e, "capability key request failed");
                BrokerError::transport("unable to connect to authentication server")
            })?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(%status, username = %username, "capability key issuance failed");
            return Err(BrokerError::key_issuance_failed("failed to generate API key"));
        }

        let envelope: RemoteEnvelope = resp.json().await.map_err(|e| {
            tracing::error!(err = %e, "malformed capability key response");
            BrokerError::transport("authentication server error")
        })?;
        if !envelope.success {
            let message = envelope.error.unwrap_or_else(|| "API key generation failed".to_owned());
            tracing::warn!(username = %username, error = %message, "capability key issuance rejected");
            return Err(BrokerError::key_issuance_failed(message));
        }

        envelope
            .data
            .get("key")
            .and_then(|v| v.as_str())
            .map(str::to_owned)
            .ok_or_else(|| BrokerError::transport("authentication server error"))
    }
}

/// The identity server encodes user ids as numbers; stringify either form.
fn id_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
