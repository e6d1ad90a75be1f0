//! Server configuration types.
//!
//! This module defines the server-level configuration including:
//! - Address and port bindings
//! - Whole-request timeout and request body limit
//! - Error status compatibility mode
//!
//! Default values are sourced from `crate::constants`.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ADDRESS, DEFAULT_MAX_BODY_SIZE, DEFAULT_PORT, DEFAULT_REQUEST_TIMEOUT_SECS,
};

fn default_address() -> String {
    DEFAULT_ADDRESS.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

// Default timeout values
fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_max_body_size() -> usize {
    DEFAULT_MAX_BODY_SIZE
}

fn default_legacy_error_status() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound for a whole edit request in seconds (default: 60)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    /// Maximum JSON request body size in bytes (default: 1 MB)
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
    /// Answer failed edits with HTTP 200 and a JSON error body, as existing
    /// callers expect. When false the mapped 4xx/5xx status is used.
    #[serde(default = "default_legacy_error_status")]
    pub legacy_error_status: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
            request_timeout: default_request_timeout(),
            max_body_size: default_max_body_size(),
            legacy_error_status: default_legacy_error_status(),
        }
    }
}

impl ServerConfig {
    /// Socket address string, e.g. "0.0.0.0:10000".
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}
