// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Local shortlist state.

use std::collections::BTreeSet;
use std::collections::btree_set;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shortlist_api::{ProductId, SessionId};

use crate::session::CustomerPhone;
use crate::storage::{Storage, keys, load_json, store_json};

/// A set of shortlisted products.
///
/// Duplicate inserts are no-ops and equality ignores the order items were added in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemSet(BTreeSet<ProductId>);

impl ItemSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Whether `id` is in the set.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.0.contains(id)
    }

    /// Adds `id`, returning whether it was absent.
    pub fn insert(&mut self, id: ProductId) -> bool {
        self.0.insert(id)
    }

    /// Removes `id`, returning whether it was present.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        self.0.remove(id)
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates products in identifier order.
    pub fn iter(&self) -> btree_set::Iter<'_, ProductId> {
        self.0.iter()
    }

    /// Copies the products into a list, the shape the API expects.
    #[must_use]
    pub fn to_vec(&self) -> Vec<ProductId> {
        self.0.iter().cloned().collect()
    }
}

impl FromIterator<ProductId> for ItemSet {
    fn from_iter<I: IntoIterator<Item = ProductId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ItemSet {
    type Item = ProductId;
    type IntoIter = btree_set::IntoIter<ProductId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ItemSet {
    type Item = &'a ProductId;
    type IntoIter = btree_set::Iter<'a, ProductId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Everything the client knows about the shopper's cart at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSnapshot {
    /// Shortlisted products.
    pub items: ItemSet,
    /// Session the cart belongs to.
    pub session_id: SessionId,
    /// Customer phone, if collected.
    pub customer_phone: Option<CustomerPhone>,
}

/// Result of toggling a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toggle {
    /// No phone on file: the product was parked as the pending add.
    NeedsPhone(ProductId),

    /// Membership flipped.
    Changed {
        /// Items after the toggle.
        items: ItemSet,
        /// Items before the toggle, restored if the sync fails.
        fallback: ItemSet,
        /// `true` if the product was added, `false` if removed.
        added: bool,
    },
}

/// The shortlist as held on this device.
#[derive(Debug)]
pub struct CartStore {
    storage: Arc<dyn Storage>,
    items: ItemSet,
    pending: Option<ProductId>,
}

impl CartStore {
    /// Loads the persisted shortlist. Missing or corrupt data yields an empty shortlist.
    #[tracing::instrument(skip(storage))]
    pub async fn load(storage: Arc<dyn Storage>) -> Self {
        // stored as a JSON array, duplicates collapse here
        let items: ItemSet = load_json::<Vec<ProductId>>(storage.as_ref(), keys::SHORTLIST)
            .await
            .unwrap_or_default()
            .into_iter()
            .collect();

        tracing::debug!(items = items.len(), "loaded shortlist");
        Self {
            storage,
            items,
            pending: None,
        }
    }

    /// The current items.
    #[must_use]
    pub const fn items(&self) -> &ItemSet {
        &self.items
    }

    /// The product waiting for a phone number, if any.
    #[must_use]
    pub const fn pending(&self) -> Option<&ProductId> {
        self.pending.as_ref()
    }

    /// Flips membership of `id`, or parks it as pending when no phone is on file.
    ///
    /// Only the in-memory state changes; call [`CartStore::persist`] afterwards.
    pub fn toggle(&mut self, id: ProductId, phone: Option<&CustomerPhone>) -> Toggle {
        if phone.is_none() {
            tracing::debug!(%id, "no phone on file, parking product as pending");
            self.pending = Some(id.clone());
            return Toggle::NeedsPhone(id);
        }

        let fallback = self.items.clone();
        let added = if self.items.contains(&id) {
            self.items.remove(&id);
            false
        } else {
            self.items.insert(id);
            true
        };

        Toggle::Changed {
            items: self.items.clone(),
            fallback,
            added,
        }
    }

    /// Adds the pending product, if any and not already present, and clears it.
    ///
    /// Returns the pending product and the items before the add when the add changed state.
    pub fn resolve_pending(&mut self) -> Option<(ProductId, ItemSet)> {
        let id = self.pending.take()?;
        if self.items.contains(&id) {
            return None;
        }

        let fallback = self.items.clone();
        self.items.insert(id.clone());
        Some((id, fallback))
    }

    /// Forgets the pending product.
    pub fn cancel_pending(&mut self) -> Option<ProductId> {
        self.pending.take()
    }

    /// Replaces the items wholesale and persists them.
    pub async fn replace(&mut self, items: ItemSet) {
        self.items = items;
        self.persist().await;
    }

    /// Writes the items to storage, overwriting the previous value.
    ///
    /// A failed write is logged; the in-memory state stays authoritative for this run.
    pub async fn persist(&self) {
        if let Err(err) = store_json(self.storage.as_ref(), keys::SHORTLIST, &self.items).await {
            tracing::warn!(%err, "failed to persist shortlist");
        }
    }
}
