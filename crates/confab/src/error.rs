// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt;

/// Longest agent error detail allowed into a response body.
const MAX_AGENT_ERROR_DETAIL: usize = 240;

/// Failure kinds for the broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad credentials; not retryable without new input.
    Rejected,
    /// Identity step succeeded but the capability key could not be minted.
    KeyIssuanceFailed,
    /// Network-level failure talking to a collaborator; retryable.
    Transport,
    /// A known user had no valid stored credential.
    SessionExpired,
    /// No credential path exists for the request at all.
    ServiceUnavailable,
    /// The downstream agent call failed.
    AgentFailure,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rejected => "REJECTED",
            Self::KeyIssuanceFailed => "KEY_ISSUANCE_FAILED",
            Self::Transport => "TRANSPORT",
            Self::SessionExpired => "SESSION_EXPIRED",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::AgentFailure => "AGENT_FAILURE",
        }
    }
}

/// A normalized broker error: a kind plus a short message safe to show to
/// the caller. Raw transport and parsing failures are converted into one
/// of these at the boundary where they occur.
#[derive(Debug, Clone)]
pub struct BrokerError {
    pub kind: ErrorKind,
    pub message: String,
}

impl BrokerError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Rejected, message)
    }

    pub fn key_issuance_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::KeyIssuanceFailed, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    pub fn session_expired() -> Self {
        Self::new(ErrorKind::SessionExpired, "Your session has expired, please log in again.")
    }

    pub fn service_unavailable() -> Self {
        Self::new(
            ErrorKind::ServiceUnavailable,
            "Service unavailable: no credentials are configured for this request.",
        )
    }

    /// Wrap a downstream agent failure, truncating the detail so the
    /// response body stays size-bounded.
    pub fn agent_failure(detail: &str) -> Self {
        Self::new(
            ErrorKind::AgentFailure,
            format!("Sorry, I ran into an error handling that request: {}", truncate_detail(detail)),
        )
    }
}

impl fmt::Display for BrokerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.as_str(), self.message)
    }
}

impl std::error::Error for BrokerError {}

fn truncate_detail(detail: &str) -> String {
    if detail.chars().count() <= MAX_AGENT_ERROR_DETAIL {
        return detail.to_owned();
    }
    let mut out: String = detail.chars().take(MAX_AGENT_ERROR_DETAIL).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_detail_passes_through() {
        assert_eq!(truncate_detail("connection reset"), "connection reset");
    }

    #[test]
    fn long_detail_is_truncated() {
        let detail = "x".repeat(1000);
        let out = truncate_detail(&detail);
        assert_eq!(out.chars().count(), MAX_AGENT_ERROR_DETAIL + 3);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let detail = "é".repeat(MAX_AGENT_ERROR_DETAIL + 10);
        let out = truncate_detail(&detail);
        assert_eq!(out.chars().count(), MAX_AGENT_ERROR_DETAIL + 3);
    }

    #[test]
    fn agent_failure_is_size_bounded() {
        let e = BrokerError::agent_failure(&"boom ".repeat(500));
        assert!(e.message.chars().count() < MAX_AGENT_ERROR_DETAIL + 64);
        assert_eq!(e.kind, ErrorKind::AgentFailure);
    }
}
