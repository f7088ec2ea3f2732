// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::Parser;
use tracing::error;

use confab::config::Config;

#[tokio::main]
async fn main() {
    // reqwest is built against rustls without a baked-in provider; the
    // process default must be installed before any client is constructed.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let config = Config::parse();

    let default_filter = if config.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    if let Err(e) = confab::run(config).await {
        error!("fatal: {e:#}");
        std::process::exit(1);
    }
}
