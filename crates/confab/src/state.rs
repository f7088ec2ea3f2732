// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::agent::AgentBinding;
use crate::config::Config;
use crate::identity::IdentityClient;
use crate::session::store::SessionStore;

/// Shared broker state, constructed once in [`crate::run`] and injected
/// into every handler. No hidden globals.
pub struct AppState {
    pub config: Config,
    pub store: SessionStore,
    pub identity: IdentityClient,
    pub agent: AgentBinding,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let identity = IdentityClient::new(&config.identity_url);
        let agent = AgentBinding::new(&config.agent_url);
        Self { config, store: SessionStore::new(), identity, agent }
    }
}
