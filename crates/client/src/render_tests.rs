// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn user() -> UserRecord {
    UserRecord {
        id: 4,
        email: "dev@example.com".into(),
        api_token: "sk-colink-aaaa".into(),
        client_token: "client-bbbb".into(),
        total_api_calls: 12,
        total_provided_calls: 5,
    }
}

fn node(id: &str, max_parallel: u32, active_tasks: u32, penalized: bool) -> NodeSummary {
    NodeSummary {
        id: id.into(),
        max_parallel,
        active_tasks,
        supported_models: vec!["pro-model".into(), "fast-model".into()],
        penalized,
    }
}

#[yare::parameterized(
    http_with_port = { "http://127.0.0.1:8080/api", Some(("ws://127.0.0.1:8080/ws", "http://127.0.0.1:8080/v1")) },
    https_default_port = { "https://colink.example.com/api", Some(("wss://colink.example.com/ws", "https://colink.example.com/v1")) },
    unsupported_scheme = { "ftp://example.com/api", None },
    garbage = { "::", None },
)]
fn endpoints_from_api_url(api_url: &str, expected: Option<(&str, &str)>) {
    let got = Endpoints::from_api_url(api_url);
    let got = got.as_ref().map(|e| (e.ws_url.as_str(), e.openai_base.as_str()));
    assert_eq!(got, expected);
}

#[test]
fn dashboard_shows_tokens_counters_and_setup() {
    let endpoints = Endpoints {
        ws_url: "ws://gw:8080/ws".into(),
        openai_base: "http://gw:8080/v1".into(),
    };
    let out = dashboard(&user(), &endpoints);
    assert!(out.starts_with("dev@example.com\n"));
    assert!(out.contains("API calls made      12"));
    assert!(out.contains("Calls provided      5"));
    assert!(out.contains("client_token: \"client-bbbb\""));
    assert!(out.contains("server_url: \"ws://gw:8080/ws\""));
    assert!(out.contains("curl -X POST http://gw:8080/v1/chat/completions"));
    assert!(out.contains("Bearer sk-colink-aaaa"));
}

#[test]
fn roster_loading_and_empty_states() {
    let loading = RosterSnapshot::default();
    assert!(roster(&loading, 0).contains("Loading..."));

    let empty = RosterSnapshot { loading: false, ..RosterSnapshot::default() };
    let out = roster(&empty, 0);
    assert!(out.starts_with("Nodes  0 online\n"));
    assert!(out.contains("No nodes online"));
}

#[test]
fn roster_table_and_summary() {
    let snapshot = RosterSnapshot {
        nodes: vec![node("node-a", 3, 3, false), node("node-b", 2, 0, true)],
        last_updated: Some(1_000),
        loading: false,
    };
    let out = roster(&snapshot, 66_000);
    assert!(out.contains("2 online  (updated 1m 05s ago)"));
    assert!(out.contains("Healthy 1 / 2   Capacity 3 / 5   Utilization 60%"));

    let row_a = out.lines().find(|l| l.starts_with("node-a"));
    assert!(matches!(row_a, Some(l) if l.contains("3/3") && l.contains("100%") && l.contains("hot")));
    let row_b = out.lines().find(|l| l.starts_with("node-b"));
    assert!(matches!(row_b, Some(l) if l.contains("0/2") && l.contains("penalized")));
    assert!(out.contains("pro-model, fast-model"));
}

#[test]
fn session_status_lines() {
    assert_eq!(session_status(&SessionState::Anonymous), "Not logged in.");
    assert_eq!(
        session_status(&SessionState::Authenticated(user())),
        "Logged in as dev@example.com (id 4)"
    );
}
