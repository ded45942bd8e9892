// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde_json::Value;
use std::fmt;

/// Status the backend uses to reject a missing, expired, or forged credential.
pub const UNAUTHORIZED: u16 = 401;

/// Failure of a single outbound call through the gateway.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// Transport failed before any response was obtained.
    Network(String),
    /// The backend answered with a non-success status.
    Http { status: u16, payload: Value },
    /// The backend answered 2xx but the body did not match the expected shape.
    Decode(String),
}

impl GatewayError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for the authentication-rejected signal that evicts the credential.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(UNAUTHORIZED)
    }

    /// Server-supplied explanation, if the error payload carries one.
    ///
    /// The backend reports failures as `{"error": "..."}`; `message` is
    /// accepted as well.
    pub fn server_message(&self) -> Option<&str> {
        let Self::Http { payload, .. } = self else {
            return None;
        };
        ["error", "message"]
            .iter()
            .filter_map(|key| payload.get(key).and_then(Value::as_str))
            .map(str::trim)
            .find(|msg| !msg.is_empty())
    }

    /// Short message suitable for showing to a user.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_owned()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network(_) => "NETWORK",
            Self::Http { status: UNAUTHORIZED, .. } => "UNAUTHORIZED",
            Self::Http { .. } => "HTTP",
            Self::Decode(_) => "DECODE",
        }
    }
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(e) => write!(f, "request failed: {e}"),
            Self::Http { status, .. } => match self.server_message() {
                Some(msg) => write!(f, "server returned {status}: {msg}"),
                None => write!(f, "server returned {status}"),
            },
            Self::Decode(e) => write!(f, "invalid response: {e}"),
        }
    }
}

impl std::error::Error for GatewayError {}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }
}

/// A sign-in or registration failure, already reduced to a user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthFailure {
    pub message: String,
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for AuthFailure {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
