// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Confab: session credential broker between a chat client, a remote
//! identity server, and a downstream agent backend.
//!
//! Login runs a two-step handshake against the identity server (verify
//! identity, then mint a capability key) and caches the resulting pair in
//! an in-memory TTL store. Chat requests resolve a capability key from
//! that store, fall back to a static system key when configured, and
//! invoke the agent backend with it.

pub mod agent;
pub mod config;
pub mod error;
pub mod identity;
pub mod session;
pub mod state;
pub mod transport;

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::session::store::spawn_sweeper;
use crate::state::AppState;
use crate::transport::build_router;

/// Run the broker until shutdown.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let shutdown = CancellationToken::new();

    let state = Arc::new(AppState::new(config));

    // Opportunistic expiry sweep; reads evict lazily so this is not
    // required for correctness.
    spawn_sweeper(Arc::clone(&state), shutdown.clone());

    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                shutdown.cancel();
            }
        });
    }

    tracing::info!(
        identity_url = %state.config.identity_url,
        agent_url = %state.config.agent_url,
        "confab listening on {addr}"
    );
    let router = build_router(Arc::clone(&state));
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, router).with_graceful_shutdown(shutdown.cancelled_owned()).await?;

    Ok(())
}
