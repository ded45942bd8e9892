// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plain-text views for the terminal.

use std::fmt::Write as _;

use reqwest::Url;

use crate::api::{NodeSummary, UserRecord};
use crate::poller::RosterSnapshot;
use crate::session::SessionState;

/// Public endpoints derived from the API root: the worker WebSocket
/// (`/ws`) and the OpenAI-compatible HTTP API (`/v1`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub ws_url: String,
    pub openai_base: String,
}

impl Endpoints {
    pub fn from_api_url(api_url: &str) -> Option<Self> {
        let url = Url::parse(api_url).ok()?;
        let ws_scheme = match url.scheme() {
            "https" => "wss",
            "http" => "ws",
            _ => return None,
        };
        let mut host = url.host_str()?.to_owned();
        if let Some(port) = url.port() {
            let _ = write!(host, ":{port}");
        }
        Some(Self {
            ws_url: format!("{ws_scheme}://{host}/ws"),
            openai_base: format!("{}://{host}/v1", url.scheme()),
        })
    }
}

pub fn session_status(state: &SessionState) -> String {
    match state {
        SessionState::Unresolved => "Checking session...".to_owned(),
        SessionState::Anonymous => "Not logged in.".to_owned(),
        SessionState::Authenticated(user) => format!("Logged in as {} (id {})", user.email, user.id),
    }
}

pub fn dashboard(user: &UserRecord, endpoints: &Endpoints) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", user.email);
    let _ = writeln!(out, "Dashboard");
    let _ = writeln!(out);
    let _ = writeln!(out, "  API calls made      {}", user.total_api_calls);
    let _ = writeln!(out, "  Calls provided      {}", user.total_provided_calls);
    let _ = writeln!(out);
    let _ = writeln!(out, "API token (use with the /v1 API)");
    let _ = writeln!(out, "  {}", user.api_token);
    let _ = writeln!(out, "Client token (authenticates your worker node)");
    let _ = writeln!(out, "  {}", user.client_token);
    let _ = writeln!(out);
    let _ = writeln!(out, "Client config (config.yaml)");
    let _ = writeln!(out, "  client_token: \"{}\"", user.client_token);
    let _ = writeln!(out, "  server_url: \"{}\"", endpoints.ws_url);
    let _ = writeln!(out, "  providers:");
    let _ = writeln!(out, "    - type: \"openai\"");
    let _ = writeln!(out, "      api_key: \"sk-your-real-api-key\"");
    let _ = writeln!(out, "      base_url: \"{}\"", endpoints.openai_base);
    let _ = writeln!(out, "      models:");
    let _ = writeln!(out, "        - local: \"gpt-4-turbo\"");
    let _ = writeln!(out, "          server_mapping: \"pro-model\"");
    let _ = writeln!(out);
    let _ = writeln!(out, "Try it");
    let _ = writeln!(out, "  curl -X POST {}/chat/completions \\", endpoints.openai_base);
    let _ = writeln!(out, "    -H \"Authorization: Bearer {}\" \\", user.api_token);
    let _ = writeln!(out, "    -H \"Content-Type: application/json\" \\");
    let _ = writeln!(
        out,
        "    -d '{{\"model\": \"pro-model\", \"stream\": true, \"messages\": [{{\"role\": \"user\", \"content\": \"Hello!\"}}]}}'"
    );
    out
}

fn format_age(ms: u64) -> String {
    match ms / 1000 {
        s if s < 60 => format!("{s}s ago"),
        s => format!("{}m {:02}s ago", s / 60, s % 60),
    }
}

fn models(node: &NodeSummary) -> String {
    if node.supported_models.is_empty() {
        "\u{2014}".to_owned()
    } else {
        node.supported_models.join(", ")
    }
}

/// Roster view: summary line plus one row per node. `now_ms` is the
/// current epoch time used for the "updated" age.
pub fn roster(snapshot: &RosterSnapshot, now_ms: u64) -> String {
    let mut out = String::new();
    let metrics = snapshot.metrics();

    let _ = write!(out, "Nodes  {} online", metrics.node_count);
    if let Some(at) = snapshot.last_updated {
        let _ = write!(out, "  (updated {})", format_age(now_ms.saturating_sub(at)));
    }
    let _ = writeln!(out);

    if snapshot.loading {
        let _ = writeln!(out, "Loading...");
        return out;
    }
    if snapshot.nodes.is_empty() {
        let _ = writeln!(out, "No nodes online");
        let _ = writeln!(out, "Start a worker client to contribute capacity.");
        return out;
    }

    let _ = writeln!(
        out,
        "Healthy {} / {}   Capacity {} / {}   Utilization {}%",
        metrics.healthy_count,
        metrics.node_count,
        metrics.total_active,
        metrics.total_capacity,
        metrics.utilization(),
    );
    let _ = writeln!(out);

    let id_w = snapshot.nodes.iter().map(|n| n.id.len()).max().unwrap_or(0).max(4);
    let _ = writeln!(out, "{:<id_w$}  {:>7}  {:>5}  {:<9}  MODELS", "NODE", "LOAD", "UTIL", "STATE");
    for node in &snapshot.nodes {
        let load = format!("{}/{}", node.active_tasks, node.max_parallel);
        let _ = writeln!(
            out,
            "{:<id_w$}  {:>7}  {:>4}%  {:<9}  {}",
            node.id,
            load,
            node.utilization(),
            node.load_level().as_str(),
            models(node),
        );
    }
    out
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
