// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// Product identifier.
///
/// Opaque to the client, e.g. `RING-001` or `Earrings-482913`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Creates a new `ProductId` from a string.
    #[must_use]
    pub const fn new(id: String) -> Self {
        Self(id)
    }

    /// Returns the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for ProductId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Per-install shopper session identifier.
///
/// Associates an anonymous shopper with their cart and orders on the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Creates a new `SessionId` from a string.
    #[must_use]
    pub const fn new(id: String) -> Self {
        Self(id)
    }

    /// Returns the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for SessionId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for SessionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Cart body returned by the cart endpoints.
///
/// `items` is `None` when the server omitted the list or sent something that is not an array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CartItems {
    /// Product identifiers in the server-side cart.
    #[serde(default, deserialize_with = "de_opt_items")]
    pub items: Option<Vec<ProductId>>,
}

fn de_opt_items<'de, D>(deserializer: D) -> Result<Option<Vec<ProductId>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Array(_) => serde_json::from_value(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CartSyncBody<'a> {
    pub items: &'a [ProductId],
    pub session_id: &'a SessionId,
    pub customer_phone: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct OrderBody<'a> {
    pub items: &'a [ProductId],
    pub customer_phone: &'a str,
    pub session_id: &'a SessionId,
}

/// A shopper order request as stored by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Order {
    /// Order identifier, e.g. `ORD-m1x2y3-ab12c`.
    pub id: String,
    /// Ordered products.
    pub items: Vec<ProductId>,
    /// Backend status such as `pending`, `confirmed` or `cancelled`.
    pub status: Option<String>,
    /// Customer contact phone.
    pub customer_phone: Option<String>,
    /// Session the order was placed from.
    pub session_id: Option<SessionId>,
    /// Creation time as sent by the server.
    pub created_at: Option<String>,
    /// Last update time as sent by the server.
    pub updated_at: Option<String>,
    /// Confirmation time as sent by the server.
    pub confirmed_at: Option<String>,
}

impl Order {
    /// Whether the owner has confirmed the order.
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("confirmed"))
    }

    /// The most relevant timestamp for display: confirmation, then update, then creation.
    #[must_use]
    pub fn when(&self) -> Option<&str> {
        self.confirmed_at
            .as_deref()
            .or(self.updated_at.as_deref())
            .or(self.created_at.as_deref())
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum OrderList {
    Wrapped {
        #[serde(default)]
        items: Vec<Order>,
    },
    Bare(Vec<Order>),
}

impl From<OrderList> for Vec<Order> {
    fn from(list: OrderList) -> Self {
        match list {
            OrderList::Wrapped { items } | OrderList::Bare(items) => items,
        }
    }
}

/// A catalog product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    /// Product identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Long description.
    pub description: String,
    /// Backend category taxonomy, e.g. `Apparel & Accessories > Jewelry > Rings`.
    pub category: String,
    /// Price in whole rupees.
    pub price: f64,
    /// Units in stock.
    pub qty: u32,
    /// Whether the product can be shortlisted.
    pub available: bool,
    /// Image URLs, the first one is the cover.
    pub images: Vec<String>,
}

/// One page of the product catalog.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProductPage {
    /// Products on this page.
    pub items: Vec<Product>,
    /// Total number of products matching the query.
    pub total: u64,
    /// Offset of the next page, absent on the last page.
    pub next_offset: Option<u64>,
}

/// Catalog query parameters. Unset or empty values are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    /// Page size.
    pub limit: Option<u32>,
    /// Page offset.
    pub offset: Option<u32>,
    /// Free-text search.
    pub q: Option<String>,
    /// Category filter.
    pub category: Option<String>,
}

impl ProductQuery {
    pub(crate) fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        for (key, value) in [("q", &self.q), ("category", &self.category)] {
            if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                pairs.push((key, v.to_string()));
            }
        }
        pairs
    }
}

/// Full image gallery of a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProductImages {
    /// Image URLs.
    pub images: Vec<String>,
}
