// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

/// Authentication method for the storefront API.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(tag = "type")]
pub enum AuthMethod {
    /// No authentication, the public shopper endpoints.
    #[serde(rename = "none")]
    #[default]
    None,
    /// Bearer token authentication.
    #[serde(rename = "bearer")]
    Bearer {
        /// Bearer token.
        token: String,
    },
}

/// Storefront API configuration.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ApiConfig {
    /// Base URL of the API, e.g. `http://localhost:8000`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Authentication method.
    #[serde(default)]
    pub auth: AuthMethod,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

const fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("shortlist-api/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth: AuthMethod::default(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}
