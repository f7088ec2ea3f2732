// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use super::{decode_token, extract_user_id};

fn make_token(payload: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{header}.{body}.stub-signature")
}

#[test]
fn well_formed_token_yields_payload() -> anyhow::Result<()> {
    let token =
        make_token(&serde_json::json!({ "sub": "42", "user": "meera", "iat": 1_700_000_000 }));
    let payload = decode_token(&token).ok_or_else(|| anyhow::anyhow!("expected a payload"))?;

    assert_eq!(payload.subject, "42");
    assert_eq!(payload.principal, "meera");
    assert_eq!(payload.issued_at, 1_700_000_000);
    Ok(())
}

#[test]
fn numeric_subject_is_stringified() -> anyhow::Result<()> {
    let token = make_token(&serde_json::json!({ "sub": 42, "user": "meera" }));
    assert_eq!(extract_user_id(Some(&token)).as_deref(), Some("42"));
    Ok(())
}

#[test]
fn bearer_prefix_is_stripped() -> anyhow::Result<()> {
    let token = make_token(&serde_json::json!({ "sub": "42" }));
    assert_eq!(extract_user_id(Some(&format!("Bearer {token}"))).as_deref(), Some("42"));
    Ok(())
}

#[test]
fn missing_subject_is_rejected() -> anyhow::Result<()> {
    let token = make_token(&serde_json::json!({ "user": "meera", "iat": 1 }));
    assert_eq!(decode_token(&token), None);
    Ok(())
}

#[test]
fn empty_subject_is_rejected() -> anyhow::Result<()> {
    let token = make_token(&serde_json::json!({ "sub": "" }));
    assert_eq!(decode_token(&token), None);
    Ok(())
}

#[test]
fn absent_header_is_a_quiet_miss() -> anyhow::Result<()> {
    assert_eq!(extract_user_id(None), None);
    assert_eq!(extract_user_id(Some("")), None);
    Ok(())
}

#[test]
fn malformed_tokens_are_rejected() -> anyhow::Result<()> {
    assert_eq!(decode_token("not-a-token"), None);
    assert_eq!(decode_token("only.two"), None);
    assert_eq!(decode_token("one.two.three.four"), None);
    Ok(())
}

#[test]
fn non_json_payload_is_rejected() -> anyhow::Result<()> {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none"}"#);
    let body = URL_SAFE_NO_PAD.encode("definitely not json");
    assert_eq!(decode_token(&format!("{header}.{body}.sig")), None);
    Ok(())
}
