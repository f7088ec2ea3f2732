// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

/// Configuration for the confab broker.
#[derive(Debug, Clone, clap::Parser)]
#[command(name = "confab", about = "Session credential broker for an agent chat backend")]
pub struct Config {
    /// Host to bind on.
    #[arg(long, default_value = "0.0.0.0", env = "CONFAB_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 8001, env = "CONFAB_PORT")]
    pub port: u16,

    /// Base URL of the remote identity server.
    #[arg(long, env = "CONFAB_IDENTITY_URL")]
    pub identity_url: String,

    /// Base URL of the downstream agent backend.
    #[arg(long, env = "CONFAB_AGENT_URL")]
    pub agent_url: String,

    /// Static system-level capability key used when no per-user key resolves.
    #[arg(long, env = "CONFAB_SYSTEM_KEY")]
    pub system_key: Option<String>,

    /// Origin allowed for cross-origin requests from the web client.
    #[arg(long, default_value = "http://localhost:5173", env = "CONFAB_ALLOWED_ORIGIN")]
    pub allowed_origin: String,

    /// Hours until a stored session credential expires.
    #[arg(long, default_value_t = 24, env = "CONFAB_SESSION_TTL_HOURS")]
    pub session_ttl_hours: u64,

    /// Interval in seconds between background expired-credential sweeps.
    #[arg(long, default_value_t = 600, env = "CONFAB_SWEEP_INTERVAL_SECS")]
    pub sweep_interval_secs: u64,

    /// Enable debug logging.
    #[arg(long, env = "CONFAB_DEBUG")]
    pub debug: bool,
}

impl Config {
    pub fn session_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.session_ttl_hours * 3600)
    }

    pub fn sweep_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.sweep_interval_secs)
    }
}
