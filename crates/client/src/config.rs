// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::credential::state_dir;

/// Backend API root: the gateway server's default port and `/api` route group.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080/api";

/// Console client for the colink compute gateway.
#[derive(Debug, Parser)]
#[command(name = "colink", version, about)]
pub struct Config {
    /// Backend API root URL.
    #[arg(long, global = true, env = "COLINK_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// File holding the persisted session credential.
    #[arg(long, global = true, env = "COLINK_STATE_FILE")]
    pub state_file: Option<PathBuf>,

    /// Per-request timeout in milliseconds.
    #[arg(long, global = true, env = "COLINK_REQUEST_TIMEOUT_MS", default_value_t = 10000)]
    pub request_timeout_ms: u64,

    /// Node roster poll interval in milliseconds.
    #[arg(long, global = true, env = "COLINK_POLL_MS", default_value_t = 5000)]
    pub poll_ms: u64,

    /// Log format (json or text).
    #[arg(long, global = true, env = "COLINK_LOG_FORMAT", default_value = "text")]
    pub log_format: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, env = "COLINK_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Sign in and persist the session credential.
    Login {
        #[arg(long, env = "COLINK_EMAIL")]
        email: String,
        #[arg(long, env = "COLINK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account.
    Register {
        #[arg(long, env = "COLINK_EMAIL")]
        email: String,
        #[arg(long, env = "COLINK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the persisted session credential.
    Logout,
    /// Show the current session state.
    Whoami,
    /// Show tokens, usage, and client setup for the signed-in account.
    Dashboard,
    /// Show the live worker-node roster.
    Nodes {
        /// Keep polling and redraw until interrupted.
        #[arg(long)]
        watch: bool,
        /// Print the roster and metrics as JSON.
        #[arg(long, conflicts_with = "watch")]
        json: bool,
    },
}

impl Config {
    /// Validate the configuration after parsing.
    pub fn validate(&self) -> anyhow::Result<()> {
        let url = reqwest::Url::parse(&self.api_url)
            .map_err(|e| anyhow::anyhow!("invalid --api-url {:?}: {e}", self.api_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("--api-url must be http or https, got {}", url.scheme());
        }
        if self.poll_ms == 0 {
            anyhow::bail!("--poll-ms must be greater than zero");
        }
        if self.request_timeout_ms == 0 {
            anyhow::bail!("--request-timeout-ms must be greater than zero");
        }
        if !matches!(self.log_format.as_str(), "json" | "text") {
            anyhow::bail!("invalid log format: {}", self.log_format);
        }
        Ok(())
    }

    pub fn state_file(&self) -> PathBuf {
        self.state_file.clone().unwrap_or_else(|| state_dir().join("storage.json"))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_ms)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
