// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identity token reader: parses bearer tokens from the trusted issuer.
//!
//! This is the unverified-trusted-token variant: tokens are decoded with
//! no signature or expiry check, on the assumption that they reach this
//! process over an authenticated path from the identity server. A
//! verifying reader can replace this module without changing call sites.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

/// Decoded identity token payload. Ephemeral; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPayload {
    /// Stable user id (the `sub` claim).
    pub subject: String,
    /// Display identity (the `user` claim).
    pub principal: String,
    /// Issue timestamp (the `iat` claim), informational only.
    pub issued_at: i64,
}

/// Extract the user id from an `Authorization` header value, if it carries
/// a well-formed token with a subject.
pub fn extract_user_id(header: Option<&str>) -> Option<String> {
    decode_token(header?).map(|p| p.subject)
}

/// Decode a bearer token into its payload without verifying it.
///
/// Returns `None` when the token is not a three-segment JWT, the payload
/// segment is not base64url JSON, or the mandatory `sub` claim is absent
/// or empty. Pure; no I/O.
pub fn decode_token(token: &str) -> Option<TokenPayload> {
    let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();

    let mut segments = token.split('.');
    let (_header, payload) = (segments.next()?, segments.next()?);
    // The signature segment must exist even though it is not checked.
    segments.next()?;
    if segments.next().is_some() {
        return None;
    }

    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;

    let subject = claim_string(&claims, "sub")?;
    if subject.is_empty() {
        return None;
    }

    Some(TokenPayload {
        subject,
        principal: claim_string(&claims, "user").unwrap_or_default(),
        issued_at: claims.get("iat").and_then(|v| v.as_i64()).unwrap_or(0),
    })
}

/// Read a claim that may be encoded as a JSON string or number.
fn claim_string(claims: &serde_json::Value, key: &str) -> Option<String> {
    match claims.get(key)? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
#[path = "token_tests.rs"]
mod tests;
