// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Key-value persistence for shopper state.

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Storage keys, shared with the storefront web client so both read the same state.
pub mod keys {
    /// Shortlisted product identifiers, JSON array.
    pub const SHORTLIST: &str = "ac_shortlist";
    /// Session identifier, raw string.
    pub const SESSION_ID: &str = "ac_session_id";
    /// Customer phone, raw string.
    pub const PHONE: &str = "ac_phone";
    /// Last dismissed order banner, JSON `{ "id": .., "ts": .. }` or string.
    pub const ORDER_BANNER_DISMISSED: &str = "ac_order_banner_dismissed";
    /// Last confirmed order shown as a banner, JSON string.
    pub const CONFIRMED_BANNER_SEEN: &str = "ac_confirmed_banner_seen";
    /// Id of the last order placed from this install, raw string.
    pub const LAST_ORDER_ID: &str = "ac_last_order_id";
    /// Gallery image cache, JSON object in insertion order.
    pub const IMAGE_CACHE: &str = "ac_image_cache_v1";
}

/// Errors of a storage backend.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// SQLite failure.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failure.
    #[error("Failed to run migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// Value could not be encoded.
    #[error("Failed to encode value: {0}")]
    Encode(#[from] serde_json::Error),

    /// Filesystem failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A lock guarding in-process state was poisoned.
    #[error("Storage lock poisoned")]
    Poisoned,
}

/// String-keyed durable storage.
///
/// Backends are swappable: the reconciliation logic only ever talks to this trait.
#[async_trait]
pub trait Storage: fmt::Debug + Send + Sync {
    /// Reads the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, overwriting any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage, lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    map: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Creates an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let map = self.map.read().map_err(|_| StorageError::Poisoned)?;
        Ok(map.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut map = self.map.write().map_err(|_| StorageError::Poisoned)?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut map = self.map.write().map_err(|_| StorageError::Poisoned)?;
        map.remove(key);
        Ok(())
    }
}

/// Reads and decodes a JSON value.
///
/// Missing, unreadable and unparsable values all read as `None`.
pub(crate) async fn load_json<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Option<T> {
    let raw = match storage.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            tracing::warn!(key, %err, "failed to read from storage, treating as empty");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(key, %err, "discarding unparsable stored value");
            None
        }
    }
}

/// Encodes and stores a JSON value.
pub(crate) async fn store_json<T: Serialize + ?Sized>(
    storage: &dyn Storage,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    storage.set(key, &raw).await
}

/// Reads a raw string value, blank values read as `None`.
pub(crate) async fn load_string(storage: &dyn Storage, key: &str) -> Option<String> {
    match storage.get(key).await {
        Ok(value) => value.filter(|v| !v.trim().is_empty()),
        Err(err) => {
            tracing::warn!(key, %err, "failed to read from storage, treating as empty");
            None
        }
    }
}
