// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted credential slot.
//!
//! Exactly one bearer credential is current at a time. The gateway reads it
//! before every call and evicts it on 401; the session store writes it on
//! login and clears it on logout or failed rehydration.

pub mod persist;

use std::path::PathBuf;

use parking_lot::Mutex;

/// Fixed storage key the credential is persisted under.
pub const TOKEN_KEY: &str = "token";

/// Single-writer storage slot for the current credential.
///
/// Writes are visible to the next `get` on any thread as soon as the call
/// returns. Durability failures are logged by the implementation and never
/// surface to callers.
pub trait CredentialSlot: Send + Sync {
    fn get(&self) -> Option<String>;
    fn set(&self, token: &str);
    fn clear(&self);
}

/// In-process slot with no backing file.
#[derive(Debug, Default)]
pub struct MemorySlot {
    token: Mutex<Option<String>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self { token: Mutex::new(Some(token.into())) }
    }
}

impl CredentialSlot for MemorySlot {
    fn get(&self) -> Option<String> {
        self.token.lock().clone()
    }

    fn set(&self, token: &str) {
        *self.token.lock() = Some(token.to_owned());
    }

    fn clear(&self) {
        self.token.lock().take();
    }
}

/// Resolve the state directory for client data.
///
/// Checks `COLINK_STATE_DIR`, then `$XDG_STATE_HOME/colink`,
/// then `$HOME/.local/state/colink`.
pub fn state_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("COLINK_STATE_DIR") {
        return PathBuf::from(dir);
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return PathBuf::from(xdg).join("colink");
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".local/state/colink");
    }
    PathBuf::from(".colink")
}
