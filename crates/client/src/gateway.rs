// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single outbound-call surface for the backend API.
//!
//! Every call reads the persisted credential and attaches it as a bearer
//! token. A 401 from any endpoint evicts the credential before the error is
//! handed back, so the next call from any component goes out anonymous.

use std::sync::{Arc, Once};
use std::time::Duration;

use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::credential::CredentialSlot;
use crate::error::{GatewayError, UNAUTHORIZED};

static CRYPTO_INIT: Once = Once::new();

/// Install the ring crypto provider for reqwest/rustls.
/// Only the first call has effect.
pub fn ensure_crypto() {
    CRYPTO_INIT.call_once(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

/// HTTP gateway to the backend API rooted at `base_url`.
pub struct RequestGateway {
    base_url: String,
    slot: Arc<dyn CredentialSlot>,
    client: Client,
}

impl RequestGateway {
    pub fn new(
        base_url: &str,
        slot: Arc<dyn CredentialSlot>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        ensure_crypto();
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url: base_url.trim_end_matches('/').to_owned(), slot, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The slot this gateway reads credentials from and evicts on 401.
    pub fn slot(&self) -> &Arc<dyn CredentialSlot> {
        &self.slot
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.slot.get() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Issue one request and return the decoded JSON body.
    ///
    /// An empty 2xx body is returned as `Value::Null`. Never retries.
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, GatewayError> {
        let mut req = self.client.request(method.clone(), self.url(path));
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = self.apply_auth(req).send().await?;
        let status = resp.status().as_u16();

        if status == UNAUTHORIZED {
            // Evict before anything else can observe the stale credential.
            self.slot.clear();
            tracing::info!(%method, path, "credential rejected, cleared");
        }

        let bytes = resp.bytes().await?;
        if !(200..300).contains(&status) {
            let payload = parse_payload(&bytes);
            tracing::debug!(%method, path, status, "request failed");
            return Err(GatewayError::Http { status, payload });
        }

        tracing::debug!(%method, path, status, "request ok");
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| GatewayError::Decode(e.to_string()))
    }

    /// GET `path` and decode the body into `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let value = self.call(Method::GET, path, None).await?;
        decode(value)
    }

    /// POST `body` as JSON to `path` and decode the response into `T`.
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, GatewayError> {
        let body = serde_json::to_value(body).map_err(|e| GatewayError::Decode(e.to_string()))?;
        let value = self.call(Method::POST, path, Some(&body)).await?;
        decode(value)
    }
}

/// Error payloads are kept as JSON when possible, otherwise as raw text.
fn parse_payload(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, GatewayError> {
    serde_json::from_value(value).map_err(|e| GatewayError::Decode(e.to_string()))
}

#[cfg(test)]
#[path = "gateway_tests.rs"]
mod tests;
