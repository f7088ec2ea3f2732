// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Downstream agent client and the capability-key-bound binding in front
//! of it.

use std::time::Duration;

use tokio::sync::Mutex;

/// Generation is much slower than control-plane traffic; still bounded.
const AGENT_TIMEOUT: Duration = Duration::from_secs(120);

/// HTTP client for the external agent backend, bound to one capability key.
#[derive(Clone)]
pub struct AgentClient {
    base_url: String,
    capability_key: String,
    http: reqwest::Client,
}

impl AgentClient {
    pub fn new(base_url: &str, capability_key: &str) -> Self {
        let http = reqwest::Client::builder().timeout(AGENT_TIMEOUT).build().unwrap_or_default();
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            capability_key: capability_key.to_owned(),
            http,
        }
    }

    /// Send one message to the agent and return its reply text.
    pub async fn generate(&self, message: &str) -> anyhow::Result<String> {
        let resp = self
            .http
            .post(format!("{}/generate", self.base_url))
            .bearer_auth(&self.capability_key)
            .json(&serde_json::json!({ "message": message }))
            .send()
            .await?
            .error_for_status()?;

        let body: serde_json::Value = resp.json().await?;
        match body.get("message").and_then(|v| v.as_str()) {
            Some(text) => Ok(text.to_owned()),
            None => anyhow::bail!("agent response missing message"),
        }
    }
}

/// Lazily-bound agent client, re-established whenever the resolved
/// capability key changes so a stale binding never serves one user's
/// agent session to another.
pub struct AgentBinding {
    base_url: String,
    bound: Mutex<Option<AgentClient>>,
}

impl AgentBinding {
    pub fn new(base_url: &str) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_owned(), bound: Mutex::new(None) }
    }

    /// Resolve the client for `capability_key`, rebinding if the key
    /// differs from the bound one, then run one generation. The rebind is
    /// applied in full under the binding lock; the network call runs after
    /// the lock is released.
    pub async fn generate(&self, capability_key: &str, message: &str) -> anyhow::Result<String> {
        let client = {
            let mut bound = self.bound.lock().await;
            let stale = !matches!(bound.as_ref(), Some(c) if c.capability_key == capability_key);
            if stale {
                if bound.is_some() {
                    tracing::info!("rebinding agent client to a different capability key");
                }
                *bound = Some(AgentClient::new(&self.base_url, capability_key));
            }
            match bound.as_ref() {
                Some(c) => c.clone(),
                // Unreachable: the binding was just installed above.
                None => AgentClient::new(&self.base_url, capability_key),
            }
        };

        client.generate(message).await
    }
}
