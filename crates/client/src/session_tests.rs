// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use super::*;
use crate::credential::MemorySlot;

fn user(id: i64) -> UserRecord {
    UserRecord {
        id,
        email: format!("user{id}@example.com"),
        api_token: format!("sk-colink-{id}"),
        client_token: format!("client-{id}"),
        total_api_calls: 3,
        total_provided_calls: 1,
    }
}

/// Store whose gateway points at a closed port; tests here never reach it.
fn store_with(slot: Arc<MemorySlot>) -> anyhow::Result<SessionStore> {
    let gateway = RequestGateway::new("http://127.0.0.1:9", slot, Duration::from_millis(200))?;
    Ok(SessionStore::new(Arc::new(gateway)))
}

#[test]
fn starts_unresolved_and_gates_on_waiting() -> anyhow::Result<()> {
    let store = store_with(Arc::new(MemorySlot::new()))?;
    assert_eq!(store.state(), SessionState::Unresolved);
    assert!(store.is_loading());
    assert_eq!(store.gate(), RouteGate::Waiting);
    Ok(())
}

#[test]
fn login_yields_authenticated_with_exact_user() -> anyhow::Result<()> {
    let slot = Arc::new(MemorySlot::new());
    let store = store_with(Arc::clone(&slot))?;

    store.login("t1", user(1));

    assert_eq!(store.state(), SessionState::Authenticated(user(1)));
    assert_eq!(slot.get().as_deref(), Some("t1"));
    assert_eq!(store.gate(), RouteGate::Render(user(1)));
    Ok(())
}

#[test]
fn login_while_authenticated_overwrites() -> anyhow::Result<()> {
    let slot = Arc::new(MemorySlot::new());
    let store = store_with(Arc::clone(&slot))?;

    store.login("t1", user(1));
    store.login("t2", user(2));

    assert_eq!(store.user(), Some(user(2)));
    assert_eq!(slot.get().as_deref(), Some("t2"));
    Ok(())
}

#[test]
fn logout_from_any_state_is_anonymous() -> anyhow::Result<()> {
    // None: still unresolved, Some(false): anonymous, Some(true): authenticated.
    for setup in [None, Some(false), Some(true)] {
        let slot = Arc::new(MemorySlot::with_token("stale"));
        let store = store_with(Arc::clone(&slot))?;
        match setup {
            None => {}
            Some(false) => store.logout(),
            Some(true) => store.login("t1", user(1)),
        }

        store.logout();
        store.logout();

        assert_eq!(store.state(), SessionState::Anonymous, "setup {setup:?}");
        assert_eq!(slot.get(), None);
        assert_eq!(store.gate(), RouteGate::Redirect(ANONYMOUS_ENTRY));
    }
    Ok(())
}

#[test]
fn evicted_credential_demotes_session_on_next_read() -> anyhow::Result<()> {
    let slot = Arc::new(MemorySlot::new());
    let store = store_with(Arc::clone(&slot))?;
    store.login("t1", user(1));

    // What the gateway does on a 401 from any endpoint.
    slot.clear();

    assert_eq!(store.gate(), RouteGate::Redirect(ANONYMOUS_ENTRY));
    assert_eq!(store.state(), SessionState::Anonymous);
    Ok(())
}

#[tokio::test]
async fn rehydrate_after_login_does_not_call_backend() -> anyhow::Result<()> {
    let slot = Arc::new(MemorySlot::new());
    let store = store_with(Arc::clone(&slot))?;
    store.login("t1", user(1));

    // The gateway points at a closed port; a call would fail and clear the slot.
    let state = store.rehydrate().await;

    assert_eq!(state, SessionState::Authenticated(user(1)));
    assert_eq!(slot.get().as_deref(), Some("t1"));
    Ok(())
}

#[tokio::test]
async fn rehydrate_without_credential_is_anonymous() -> anyhow::Result<()> {
    let store = store_with(Arc::new(MemorySlot::new()))?;
    assert_eq!(store.rehydrate().await, SessionState::Anonymous);
    assert!(!store.is_loading());
    Ok(())
}

#[tokio::test]
async fn rehydrate_network_failure_discards_credential() -> anyhow::Result<()> {
    let slot = Arc::new(MemorySlot::with_token("t1"));
    let store = store_with(Arc::clone(&slot))?;

    assert_eq!(store.rehydrate().await, SessionState::Anonymous);
    assert_eq!(slot.get(), None);
    Ok(())
}

#[tokio::test]
async fn wait_resolved_observes_rehydration() -> anyhow::Result<()> {
    let store = Arc::new(store_with(Arc::new(MemorySlot::new()))?);
    let mut rx = store.subscribe();

    let waiter = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.wait_resolved().await })
    };
    store.rehydrate().await;

    assert_eq!(waiter.await?, SessionState::Anonymous);
    rx.changed().await?;
    assert_eq!(*rx.borrow(), SessionState::Anonymous);
    Ok(())
}

#[yare::parameterized(
    unresolved = { SessionState::Unresolved, "unresolved", true },
    anonymous = { SessionState::Anonymous, "anonymous", false },
    authenticated = { SessionState::Authenticated(user(1)), "authenticated", false },
)]
fn state_labels(state: SessionState, label: &str, loading: bool) {
    assert_eq!(state.as_str(), label);
    assert_eq!(state.is_loading(), loading);
}
