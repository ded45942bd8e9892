// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command dispatch: wires the credential slot, gateway, and session store
//! together and renders each view.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::config::{Command, Config};
use crate::credential::persist::FileSlot;
use crate::credential::CredentialSlot;
use crate::gateway::RequestGateway;
use crate::poller::{epoch_ms, spawn_status_poller, RosterSnapshot};
use crate::render::{self, Endpoints};
use crate::session::{RouteGate, SessionState, SessionStore};

/// How long a protected view waits silently before showing that it is
/// still checking the session.
const WAITING_INDICATOR_DELAY: Duration = Duration::from_millis(250);

/// Clear screen and home the cursor.
const CLEAR: &str = "\x1b[2J\x1b[H";

/// Long-lived client components shared by every view.
pub struct App {
    pub gateway: Arc<RequestGateway>,
    pub session: Arc<SessionStore>,
}

impl App {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let slot: Arc<dyn CredentialSlot> = Arc::new(FileSlot::open(config.state_file()));
        Self::with_slot(config, slot)
    }

    pub fn with_slot(config: &Config, slot: Arc<dyn CredentialSlot>) -> anyhow::Result<Self> {
        let gateway = Arc::new(RequestGateway::new(&config.api_url, slot, config.request_timeout())?);
        let session = Arc::new(SessionStore::new(Arc::clone(&gateway)));
        Ok(Self { gateway, session })
    }
}

/// Run one command to completion and return the process exit code.
pub async fn run(config: Config) -> anyhow::Result<i32> {
    let app = App::new(&config)?;
    debug!(api = %app.gateway.base_url(), "starting");

    match config.command.clone() {
        Command::Login { email, password } => match app.session.sign_in(&email, &password).await {
            Ok(user) => {
                println!("{}", render::session_status(&SessionState::Authenticated(user)));
                Ok(0)
            }
            Err(e) => {
                eprintln!("error: {e}");
                Ok(1)
            }
        },

        Command::Register { email, password } => {
            match app.session.sign_up(&email, &password).await {
                Ok(()) => {
                    println!("Registered {email}. Run `colink login` to sign in.");
                    Ok(0)
                }
                Err(e) => {
                    eprintln!("error: {e}");
                    Ok(1)
                }
            }
        }

        Command::Logout => {
            app.session.logout();
            println!("Logged out.");
            Ok(0)
        }

        Command::Whoami => {
            let state = app.session.rehydrate().await;
            println!("{}", render::session_status(&state));
            Ok(if state.user().is_some() { 0 } else { 1 })
        }

        Command::Dashboard => match enter_protected(&app.session).await {
            RouteGate::Render(user) => {
                let base = app.gateway.base_url();
                let endpoints = Endpoints::from_api_url(base)
                    .ok_or_else(|| anyhow::anyhow!("cannot derive endpoints from {base}"))?;
                print!("{}", render::dashboard(&user, &endpoints));
                Ok(0)
            }
            RouteGate::Redirect(to) => {
                eprintln!("Not logged in. Run `colink login` ({to}).");
                Ok(1)
            }
            RouteGate::Waiting => Ok(1),
        },

        Command::Nodes { watch: true, .. } => {
            watch_nodes(&app, config.poll_interval()).await;
            Ok(0)
        }

        Command::Nodes { json, .. } => {
            let snapshot = first_roster(&app, config.poll_interval()).await;
            if json {
                let metrics = snapshot.metrics();
                let body = serde_json::json!({
                    "nodes": snapshot.nodes,
                    "last_updated": snapshot.last_updated,
                    "metrics": metrics,
                    "utilization": metrics.utilization(),
                });
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                print!("{}", render::roster(&snapshot, epoch_ms()));
            }
            Ok(0)
        }
    }
}

/// Resolve the session for a protected view.
///
/// Never returns [`RouteGate::Render`] before rehydration has settled.
pub async fn enter_protected(session: &SessionStore) -> RouteGate {
    let rehydrate = session.rehydrate();
    tokio::pin!(rehydrate);
    tokio::select! {
        _ = &mut rehydrate => {}
        _ = tokio::time::sleep(WAITING_INDICATOR_DELAY) => {
            eprintln!("{}", render::session_status(&SessionState::Unresolved));
            rehydrate.await;
        }
    }

    match session.gate() {
        RouteGate::Waiting => {
            session.wait_resolved().await;
            session.gate()
        }
        gate => gate,
    }
}

/// Mount the roster view just long enough for the first poll to settle.
async fn first_roster(app: &App, interval: Duration) -> RosterSnapshot {
    let handle = spawn_status_poller(Arc::clone(&app.gateway), interval);
    let mut rx = handle.subscribe();
    let snapshot = rx.wait_for(|snap| !snap.loading).await.map(|s| (*s).clone());
    handle.stop().await;
    snapshot.unwrap_or_default()
}

/// Redraw the roster after every poll until Ctrl-C.
async fn watch_nodes(app: &App, interval: Duration) {
    let handle = spawn_status_poller(Arc::clone(&app.gateway), interval);
    let mut rx = handle.subscribe();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    print!("{CLEAR}{}", render::roster(&handle.snapshot(), epoch_ms()));
    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = rx.borrow_and_update().clone();
                print!("{CLEAR}{}", render::roster(&snapshot, epoch_ms()));
            }
        }
    }
    handle.stop().await;
}
