// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed backend endpoints.
//!
//! Each endpoint has an explicit request and response type; shape mismatches
//! fail at the gateway boundary with [`GatewayError::Decode`].

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::GatewayError;
use crate::gateway::RequestGateway;

/// The authenticated principal as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    /// Credential for the OpenAI-compatible `/v1` API.
    pub api_token: String,
    /// Credential a worker daemon presents on the `/ws` endpoint.
    pub client_token: String,
    #[serde(default)]
    pub total_api_calls: u64,
    #[serde(default)]
    pub total_provided_calls: u64,
}

/// One worker node in the live roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSummary {
    pub id: String,
    pub max_parallel: u32,
    pub active_tasks: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub supported_models: Vec<String>,
    #[serde(default)]
    pub penalized: bool,
}

/// Body of `POST /auth/login` and `POST /auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserRecord,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeResponse {
    pub user: UserRecord,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodesResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub nodes: Vec<NodeSummary>,
}

/// Go encodes a nil slice as `null`; treat it as empty.
fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

/// `POST /auth/login`.
pub async fn login(
    gateway: &RequestGateway,
    email: &str,
    password: &str,
) -> Result<LoginResponse, GatewayError> {
    gateway.post_json("/auth/login", &Credentials { email, password }).await
}

/// `POST /auth/register`. The success body is not used.
pub async fn register(
    gateway: &RequestGateway,
    email: &str,
    password: &str,
) -> Result<(), GatewayError> {
    let _: serde_json::Value =
        gateway.post_json("/auth/register", &Credentials { email, password }).await?;
    Ok(())
}

/// `GET /user/me` with the persisted credential.
pub async fn me(gateway: &RequestGateway) -> Result<UserRecord, GatewayError> {
    let resp: MeResponse = gateway.get_json("/user/me").await?;
    Ok(resp.user)
}

/// `GET /nodes`. Public; works with or without a credential.
pub async fn nodes(gateway: &RequestGateway) -> Result<Vec<NodeSummary>, GatewayError> {
    let resp: NodesResponse = gateway.get_json("/nodes").await?;
    Ok(resp.nodes)
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
