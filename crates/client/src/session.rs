// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client-side session lifecycle.
//!
//! ```text
//!              rehydrate ok
//! Unresolved ───────────────► Authenticated ◄──┐
//!     │                          │   ▲          │ login
//!     │ no credential /          │   │ login    │
//!     │ rehydrate failed  logout │   │          │
//!     ▼                          ▼   │          │
//! Anonymous ◄────────────────────────┴──────────┘
//! ```
//!
//! `Unresolved` is visited once per store. Protected views consult
//! [`SessionStore::gate`] and must not render content until it yields
//! [`RouteGate::Render`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

use crate::api::{self, UserRecord};
use crate::credential::CredentialSlot;
use crate::error::AuthFailure;
use crate::gateway::RequestGateway;

/// Where a protected view sends an anonymous visitor.
pub const ANONYMOUS_ENTRY: &str = "/login";

/// Shown when the backend gives no reason for a failed sign-in.
pub const LOGIN_FAILED: &str = "Login failed. Check your email and password.";

/// Shown when the backend gives no reason for a failed registration.
pub const REGISTER_FAILED: &str = "Registration failed. Please try again.";

/// Authentication state of this client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Startup rehydration has not finished.
    Unresolved,
    Anonymous,
    Authenticated(UserRecord),
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Unresolved)
    }

    pub fn user(&self) -> Option<&UserRecord> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unresolved => "unresolved",
            Self::Anonymous => "anonymous",
            Self::Authenticated(_) => "authenticated",
        }
    }
}

/// What a protected view should do for the current session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteGate {
    /// Show a neutral waiting indicator.
    Waiting,
    /// Send the visitor to the given entry point.
    Redirect(&'static str),
    /// Render protected content for this user.
    Render(UserRecord),
}

/// Owner of the session state. Share it by `Arc`; all transitions go
/// through its methods.
pub struct SessionStore {
    gateway: Arc<RequestGateway>,
    state: watch::Sender<SessionState>,
    /// Set once the store has left `Unresolved` by any path.
    resolved: AtomicBool,
}

impl SessionStore {
    pub fn new(gateway: Arc<RequestGateway>) -> Self {
        Self {
            gateway,
            state: watch::Sender::new(SessionState::Unresolved),
            resolved: AtomicBool::new(false),
        }
    }

    pub fn gateway(&self) -> &Arc<RequestGateway> {
        &self.gateway
    }

    fn slot(&self) -> &Arc<dyn CredentialSlot> {
        self.gateway.slot()
    }

    /// Current state snapshot.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    pub fn user(&self) -> Option<UserRecord> {
        self.state.borrow().user().cloned()
    }

    /// Observe state transitions.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Reconstruct the session from the persisted credential.
    ///
    /// Runs at most once; later calls return the current state. Failures
    /// are expected whenever no valid session exists and are not surfaced.
    pub async fn rehydrate(&self) -> SessionState {
        if self.resolved.swap(true, Ordering::AcqRel) {
            return self.state();
        }

        let next = match self.slot().get() {
            None => {
                debug!("no persisted credential");
                SessionState::Anonymous
            }
            Some(token) => match api::me(&self.gateway).await {
                Ok(user) => {
                    info!(user_id = user.id, email = %user.email, "session rehydrated");
                    SessionState::Authenticated(user)
                }
                Err(e) => {
                    debug!(err = %e, "rehydration failed, discarding credential");
                    // A login may have replaced the credential while the call was in flight.
                    if self.slot().get().as_deref() == Some(token.as_str()) {
                        self.slot().clear();
                    }
                    SessionState::Anonymous
                }
            },
        };

        self.state.send_if_modified(|state| {
            if state.is_loading() {
                *state = next;
                true
            } else {
                false
            }
        });
        self.state()
    }

    /// Install a freshly issued credential and user record.
    ///
    /// Overwrites any existing session.
    pub fn login(&self, token: &str, user: UserRecord) {
        self.resolved.store(true, Ordering::Release);
        self.slot().set(token);
        info!(user_id = user.id, email = %user.email, "logged in");
        self.state.send_replace(SessionState::Authenticated(user));
    }

    /// Drop the credential and return to `Anonymous`. Idempotent.
    pub fn logout(&self) {
        self.resolved.store(true, Ordering::Release);
        self.slot().clear();
        let prev = self.state.send_replace(SessionState::Anonymous);
        if prev.user().is_some() {
            info!("logged out");
        }
    }

    /// Demote an authenticated session whose credential was evicted by the
    /// gateway since the last transition.
    pub fn sync_with_slot(&self) -> SessionState {
        if self.slot().get().is_none() {
            self.state.send_if_modified(|state| {
                if state.user().is_some() {
                    info!("credential evicted, session ended");
                    *state = SessionState::Anonymous;
                    true
                } else {
                    false
                }
            });
        }
        self.state()
    }

    /// Wait until rehydration has settled and return the resolved state.
    pub async fn wait_resolved(&self) -> SessionState {
        let mut rx = self.state.subscribe();
        let resolved = rx.wait_for(|state| !state.is_loading()).await.map(|s| (*s).clone());
        resolved.unwrap_or_else(|_| self.state())
    }

    /// Route decision for a protected view.
    pub fn gate(&self) -> RouteGate {
        match self.sync_with_slot() {
            SessionState::Unresolved => RouteGate::Waiting,
            SessionState::Anonymous => RouteGate::Redirect(ANONYMOUS_ENTRY),
            SessionState::Authenticated(user) => RouteGate::Render(user),
        }
    }

    /// Exchange email and password for a session.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<UserRecord, AuthFailure> {
        match api::login(&self.gateway, email, password).await {
            Ok(resp) => {
                self.login(&resp.token, resp.user.clone());
                Ok(resp.user)
            }
            Err(e) => {
                debug!(email, err = %e, "sign-in failed");
                self.sync_with_slot();
                Err(AuthFailure { message: e.user_message(LOGIN_FAILED) })
            }
        }
    }

    /// Create an account. Does not sign in; the caller should direct the
    /// user to [`ANONYMOUS_ENTRY`].
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<(), AuthFailure> {
        match api::register(&self.gateway, email, password).await {
            Ok(()) => {
                info!(email, "registered");
                Ok(())
            }
            Err(e) => {
                debug!(email, err = %e, "registration failed");
                self.sync_with_slot();
                Err(AuthFailure { message: e.user_message(REGISTER_FAILED) })
            }
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
