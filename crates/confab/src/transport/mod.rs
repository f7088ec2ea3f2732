// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP transport for the broker.

pub mod http;

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::state::AppState;

/// Build the axum `Router` with all broker routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.allowed_origin);
    Router::new()
        .route("/", get(http::root))
        .route("/health", get(http::health))
        .route("/auth/login", post(http::login))
        .route("/auth/logout", post(http::logout))
        .route("/auth/status", get(http::auth_status))
        .route("/api/v1/chat", post(http::chat))
        .layer(cors)
        .with_state(state)
}

/// CORS restricted to the configured client origin. Falls back to a
/// permissive layer when the origin is not a valid header value.
fn cors_layer(allowed_origin: &str) -> CorsLayer {
    match allowed_origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_credentials(true),
        Err(e) => {
            tracing::warn!(origin = %allowed_origin, err = %e, "invalid allowed origin, permitting any");
            CorsLayer::permissive()
        }
    }
}
