// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

/// Storefront API client errors.
#[non_exhaustive]
#[derive(Debug)]
pub enum ApiError {
    /// Transport layer error (connection refused, timeout, ...).
    Http(String),

    /// The server answered with a non-success status.
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, if it could be read.
        body: String,
    },

    /// Resource not found.
    NotFound(String),

    /// Invalid response from server.
    InvalidResponse(String),

    /// Configuration error.
    Config(String),
}

impl ApiError {
    /// Whether the error means the addressed resource does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "HTTP error: {e}"),
            Self::Status { status, body } if body.is_empty() => {
                write!(f, "Server returned status {status}")
            }
            Self::Status { status, body } => write!(f, "Server returned status {status}: {body}"),
            Self::NotFound(url) => write!(f, "Resource not found: {url}"),
            Self::InvalidResponse(e) => write!(f, "Invalid server response: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::InvalidResponse(e.to_string())
        } else if e.is_builder() {
            Self::Config(e.to_string())
        } else {
            Self::Http(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidResponse(e.to_string())
    }
}
