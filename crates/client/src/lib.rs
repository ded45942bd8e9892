// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Colink: console client for the colink compute gateway.
//!
//! The client keeps one persisted bearer credential, attaches it to every
//! backend call through [`gateway::RequestGateway`], tracks the signed-in
//! user in [`session::SessionStore`], and follows the worker-node roster
//! with [`poller::spawn_status_poller`].

pub mod api;
pub mod config;
pub mod credential;
pub mod error;
pub mod gateway;
pub mod poller;
pub mod render;
pub mod roster;
pub mod run;
pub mod session;

pub use run::run;
