// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP client wrapper with authentication and status handling.

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};

use crate::config::{ApiConfig, AuthMethod};
use crate::error::ApiError;

/// HTTP client for storefront API operations.
#[derive(Debug)]
pub struct HttpClient {
    client: Client,
    config: ApiConfig,
}

impl HttpClient {
    /// Creates a new HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client creation fails.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self { client, config })
    }

    /// Builds a request with authentication headers.
    pub fn build_request(&self, method: Method, url: &str) -> RequestBuilder {
        let req = self.client.request(method, url);

        match &self.config.auth {
            AuthMethod::Bearer { token } => req.bearer_auth(token),
            AuthMethod::None => req,
        }
    }

    /// Executes a request and checks for HTTP errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or returns an error status code.
    pub async fn execute(&self, req: RequestBuilder) -> Result<Response, ApiError> {
        let resp = req.send().await?;

        match resp.status() {
            status if status.is_success() => Ok(resp),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound(resp.url().path().to_string())),
            status => {
                let body = resp.text().await.unwrap_or_default();
                tracing::debug!(%status, body, "request rejected by server");
                Err(ApiError::Status {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }
}
