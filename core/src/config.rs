// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

use shortlist_api::ApiConfig;

use crate::error::Error;
use crate::gallery::DEFAULT_IMAGE_CACHE_LIMIT;

/// The name of the application.
pub const APP_NAME: &str = "shortlist";

/// Default number of recent orders scanned for the order banner.
pub const DEFAULT_ORDER_LOOKUP_LIMIT: u32 = 10;

/// Configuration for the shortlist client.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    /// Storefront API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Directory for storing application state. `None` after normalization keeps state in
    /// memory only.
    #[serde(default)]
    pub state_dir: Option<PathBuf>,

    /// Number of product galleries kept in the image cache.
    #[serde(default = "default_image_cache_limit")]
    pub image_cache_limit: usize,

    /// Number of recent orders scanned for a confirmed one.
    #[serde(default = "default_order_lookup_limit")]
    pub order_lookup_limit: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            state_dir: None,
            image_cache_limit: DEFAULT_IMAGE_CACHE_LIMIT,
            order_lookup_limit: DEFAULT_ORDER_LOOKUP_LIMIT,
        }
    }
}

const fn default_image_cache_limit() -> usize {
    DEFAULT_IMAGE_CACHE_LIMIT
}

const fn default_order_lookup_limit() -> u32 {
    DEFAULT_ORDER_LOOKUP_LIMIT
}

impl Config {
    /// Normalize the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the state directory path cannot be expanded or a limit is zero.
    pub fn normalize(&mut self) -> Result<(), Error> {
        // Normalize state directory
        match &self.state_dir {
            Some(a) => {
                self.state_dir = Some(expand_path(a).map_err(|e| {
                    Error::Config(format!("Failed to expand state directory path: {e}"))
                })?);
            }

            None => match get_state_dir() {
                Ok(a) => self.state_dir = Some(a.join(APP_NAME)),
                Err(e) => tracing::warn!("Failed to get state directory: {e}"),
            },
        }

        if self.image_cache_limit == 0 {
            return Err(Error::Config("image_cache_limit must be positive".into()));
        }
        if self.order_lookup_limit == 0 {
            return Err(Error::Config("order_lookup_limit must be positive".into()));
        }

        self.api.base_url = self.api.base_url.trim().to_string();
        if self.api.base_url.is_empty() {
            return Err(Error::Config("api.base_url must not be empty".into()));
        }

        Ok(())
    }
}

/// Handle tilde (~) and environment variables in the path
fn expand_path(path: &Path) -> Result<PathBuf, String> {
    if path.is_absolute() {
        return Ok(path.to_owned());
    }

    let path = path.to_str().ok_or("Invalid path")?;

    // Handle tilde and home directory
    let home_prefixes: &[&str] = if cfg!(unix) {
        &["~/", "$HOME/", "${HOME}/"]
    } else {
        &[r"~\", "~/", r"%UserProfile%\", r"%UserProfile%/"]
    };
    for prefix in home_prefixes {
        if let Some(stripped) = path.strip_prefix(prefix) {
            return Ok(get_home_dir()?.join(stripped));
        }
    }

    // Handle config directories
    let config_prefixes: &[&str] = if cfg!(unix) {
        &["$XDG_CONFIG_HOME/", "${XDG_CONFIG_HOME}/"]
    } else {
        &[r"%LOCALAPPDATA%\", "%LOCALAPPDATA%/"]
    };
    for prefix in config_prefixes {
        if let Some(stripped) = path.strip_prefix(prefix) {
            return Ok(get_config_dir()?.join(stripped));
        }
    }

    Ok(path.into())
}

fn get_home_dir() -> Result<PathBuf, String> {
    dirs::home_dir().ok_or_else(|| "User-specific home directory not found".into())
}

fn get_config_dir() -> Result<PathBuf, String> {
    #[cfg(unix)]
    let config_dir = xdg::BaseDirectories::new().get_config_home();
    #[cfg(windows)]
    let config_dir = dirs::config_dir();
    config_dir.ok_or_else(|| "User-specific config directory not found".into())
}

fn get_state_dir() -> Result<PathBuf, String> {
    #[cfg(unix)]
    let state_dir = xdg::BaseDirectories::new().get_state_home();
    #[cfg(windows)]
    let state_dir = dirs::data_dir();
    state_dir.ok_or_else(|| "User-specific state directory not found".into())
}
