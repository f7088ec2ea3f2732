// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP handlers: request/response envelopes and the capability-key
//! resolution path in front of the agent.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::BrokerError;
use crate::session::token;
use crate::state::AppState;

// -- Request/Response types ---------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ServiceInfoResponse {
    pub service: String,
    pub version: String,
    pub health: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub data: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct AuthStatusResponse {
    pub service: String,
    pub status: String,
    pub active_sessions: usize,
    pub cleaned_expired: usize,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub message: String,
    pub is_error: bool,
}

// -- Handlers -----------------------------------------------------------------

/// `GET /` — basic service information.
pub async fn root() -> Json<ServiceInfoResponse> {
    Json(ServiceInfoResponse {
        service: "confab".to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
        health: "/health".to_owned(),
    })
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
    })
}

/// `POST /auth/login` — run the identity handshake and cache the session.
///
/// Failures come back as `success: false` in the envelope; the HTTP status
/// stays 200. A login whose key-issuance step fails writes nothing to the
/// store.
pub async fn login(
    State(s): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Json<LoginResponse> {
    tracing::info!(username = %req.username, "login attempt");

    match s.identity.authenticate(&req.username, &req.password).await {
        Ok(session) => {
            s.store
                .put(
                    &session.user_id,
                    session.capability_key.clone(),
                    session.identity_token.clone(),
                    s.config.session_ttl(),
                )
                .await;
            tracing::info!(username = %req.username, user_id = %session.user_id, "login succeeded");
            Json(LoginResponse {
                success: true,
                data: serde_json::json!({
                    "user": session.profile,
                    "token": session.identity_token,
                }),
                error: None,
            })
        }
        Err(e) => {
            tracing::warn!(username = %req.username, code = e.kind.as_str(), error = %e.message, "login failed");
            Json(LoginResponse { success: false, data: serde_json::json!({}), error: Some(e.message) })
        }
    }
}

/// `POST /auth/logout` — drop the caller's cached session credentials.
///
/// Soft logout: the store entry is removed and the client discards its
/// token, but the capability key is not revoked upstream and stays valid
/// there until its own TTL elapses.
pub async fn logout(State(s): State<Arc<AppState>>, headers: HeaderMap) -> Json<LogoutResponse> {
    let Some(user_id) = token::extract_user_id(bearer_header(&headers)) else {
        return Json(LogoutResponse {
            success: false,
            message: "invalid or missing session token".to_owned(),
        });
    };

    let removed = s.store.remove(&user_id).await;
    tracing::info!(user_id = %user_id, removed, "logout");
    Json(LogoutResponse { success: true, message: "Logged out successfully".to_owned() })
}

/// `GET /auth/status` — read-only introspection, plus an expiry sweep as a
/// side effect. `active_sessions` reflects the instant before the sweep.
pub async fn auth_status(State(s): State<Arc<AppState>>) -> Json<AuthStatusResponse> {
    let active = s.store.active_count().await;
    let cleaned = s.store.sweep_expired().await;
    Json(AuthStatusResponse {
        service: "authentication".to_owned(),
        status: "healthy".to_owned(),
        active_sessions: active,
        cleaned_expired: cleaned,
    })
}

/// `POST /api/v1/chat` — resolve a capability key and invoke the agent.
///
/// Always answers HTTP 200; failures ride in the body so the client-facing
/// contract stays uniform.
pub async fn chat(
    State(s): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let capability_key = match resolve_capability_key(&s, &headers).await {
        Ok(key) => key,
        Err(e) => {
            tracing::warn!(code = e.kind.as_str(), "chat request had no usable credential");
            return Json(ChatResponse { message: e.message, is_error: true });
        }
    };

    match s.agent.generate(&capability_key, &req.message).await {
        Ok(reply) => Json(ChatResponse { message: reply, is_error: false }),
        Err(e) => {
            tracing::error!(err = %e, "agent call failed");
            let e = BrokerError::agent_failure(&e.to_string());
            Json(ChatResponse { message: e.message, is_error: true })
        }
    }
}

/// Resolution order for the key that authorizes the agent call: the
/// caller's session credential, then the static system key, then a typed
/// failure. An unparseable token downgrades the request to unauthenticated
/// rather than failing it.
async fn resolve_capability_key(s: &AppState, headers: &HeaderMap) -> Result<String, BrokerError> {
    let presented = bearer_header(headers);
    let user_id = match presented {
        Some(header) => {
            let extracted = token::extract_user_id(Some(header));
            if extracted.is_none() {
                tracing::warn!("unparseable identity token on chat request");
            }
            extracted
        }
        None => None,
    };

    if let Some(ref user_id) = user_id {
        if let Some(key) = s.store.capability_key(user_id).await {
            tracing::debug!(user_id = %user_id, "chat authorized with session credential");
            return Ok(key);
        }
    }

    if let Some(ref key) = s.config.system_key {
        tracing::debug!("chat authorized with system capability key");
        return Ok(key.clone());
    }

    match user_id {
        Some(_) => Err(BrokerError::session_expired()),
        None => Err(BrokerError::service_unavailable()),
    }
}

fn bearer_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok())
}
