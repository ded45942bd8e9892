// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Live roster poller.
//!
//! Fetches the node roster immediately and then on a fixed interval until
//! its [`PollerHandle`] is stopped or dropped. Fetches never overlap: ticks
//! that come due while a fetch is in flight collapse into one fetch issued
//! when it completes. A failed fetch is logged and the cadence continues
//! unchanged.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::api::{self, NodeSummary};
use crate::error::GatewayError;
use crate::gateway::RequestGateway;
use crate::roster::FleetMetrics;

/// Anything that can produce the current roster.
pub trait RosterSource: Send + Sync + 'static {
    fn fetch_roster(&self) -> impl Future<Output = Result<Vec<NodeSummary>, GatewayError>> + Send;
}

impl RosterSource for RequestGateway {
    async fn fetch_roster(&self) -> Result<Vec<NodeSummary>, GatewayError> {
        api::nodes(self).await
    }
}

/// Latest roster as seen by the poller.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RosterSnapshot {
    pub nodes: Vec<NodeSummary>,
    /// Epoch millis of the last successful poll.
    pub last_updated: Option<u64>,
    /// True until the first poll settles, successfully or not.
    pub loading: bool,
}

impl Default for RosterSnapshot {
    fn default() -> Self {
        Self { nodes: Vec::new(), last_updated: None, loading: true }
    }
}

impl RosterSnapshot {
    pub fn metrics(&self) -> FleetMetrics {
        FleetMetrics::from_nodes(&self.nodes)
    }
}

/// Running poller. Dropping the handle cancels the poll loop.
pub struct PollerHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
    snapshot: watch::Receiver<RosterSnapshot>,
}

impl PollerHandle {
    pub fn snapshot(&self) -> RosterSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Receiver notified after every settled poll.
    pub fn subscribe(&self) -> watch::Receiver<RosterSnapshot> {
        self.snapshot.clone()
    }

    /// Cancel the poll loop and wait for it to exit.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Spawn the roster poll loop.
pub fn spawn_status_poller<S: RosterSource>(source: Arc<S>, interval: Duration) -> PollerHandle {
    let cancel = CancellationToken::new();
    let (tx, rx) = watch::channel(RosterSnapshot::default());

    let task = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(interval);
            tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    _ = tick.tick() => {}
                }

                let result = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    r = source.fetch_roster() => r,
                };

                match result {
                    Ok(nodes) => {
                        tracing::debug!(nodes = nodes.len(), "roster updated");
                        tx.send_replace(RosterSnapshot {
                            nodes,
                            last_updated: Some(epoch_ms()),
                            loading: false,
                        });
                    }
                    Err(e) => {
                        tracing::debug!(err = %e, "roster poll failed");
                        tx.send_if_modified(|snap| std::mem::replace(&mut snap.loading, false));
                    }
                }
            }
            tracing::debug!("roster poller stopped");
        })
    };

    PollerHandle { cancel, task: Some(task), snapshot: rx }
}

/// Return current epoch millis.
pub fn epoch_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
#[path = "poller_tests.rs"]
mod tests;
