// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! "We received your order" banner for returning shoppers.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use shortlist_api::Order;

use crate::storage::{Storage, StorageError, keys, load_json, store_json};

/// A confirmed order worth telling the shopper about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderBanner {
    /// Order identifier.
    pub id: String,
    /// Confirmation, update or creation time as sent by the server.
    pub when: Option<String>,
}

impl From<&Order> for OrderBanner {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.clone(),
            when: order.when().map(str::to_string),
        }
    }
}

/// An order id as stored under the banner keys: either a bare string or an object with an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
enum StoredOrderRef {
    Id(String),
    Record {
        id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ts: Option<i64>,
    },
}

impl StoredOrderRef {
    fn into_id(self) -> Option<String> {
        match self {
            Self::Id(id) => Some(id),
            Self::Record { id, .. } => id,
        }
    }
}

/// Picks the banner to show: the first confirmed order, unless it was dismissed or already seen.
#[must_use]
pub fn select_banner(
    orders: &[Order],
    dismissed: Option<&str>,
    seen: Option<&str>,
) -> Option<OrderBanner> {
    let last = orders.iter().find(|order| order.is_confirmed())?;
    if dismissed == Some(last.id.as_str()) || seen == Some(last.id.as_str()) {
        return None;
    }
    Some(OrderBanner::from(last))
}

pub(crate) async fn load_dismissed(storage: &dyn Storage) -> Option<String> {
    load_order_ref(storage, keys::ORDER_BANNER_DISMISSED).await
}

pub(crate) async fn load_seen(storage: &dyn Storage) -> Option<String> {
    load_order_ref(storage, keys::CONFIRMED_BANNER_SEEN).await
}

pub(crate) async fn mark_seen(storage: &dyn Storage, id: &str) -> Result<(), StorageError> {
    store_json(storage, keys::CONFIRMED_BANNER_SEEN, &StoredOrderRef::Id(id.to_string())).await
}

pub(crate) async fn mark_dismissed(storage: &dyn Storage, id: &str) -> Result<(), StorageError> {
    let record = StoredOrderRef::Record {
        id: Some(id.to_string()),
        ts: Some(Timestamp::now().as_millisecond()),
    };
    store_json(storage, keys::ORDER_BANNER_DISMISSED, &record).await
}

/// Forgets both dismissed and seen ids, so the next confirmation shows again.
pub(crate) async fn reset(storage: &dyn Storage) -> Result<(), StorageError> {
    storage.remove(keys::ORDER_BANNER_DISMISSED).await?;
    storage.remove(keys::CONFIRMED_BANNER_SEEN).await
}

async fn load_order_ref(storage: &dyn Storage, key: &str) -> Option<String> {
    load_json::<StoredOrderRef>(storage, key)
        .await
        .and_then(StoredOrderRef::into_id)
}
