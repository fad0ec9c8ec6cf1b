// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Reconciliation of the local shortlist with the remote cart.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use shortlist_api::{ApiClient, ApiError, SessionId};

use crate::cart::ItemSet;
use crate::session::CustomerPhone;

/// Message shown to the shopper when a sync fails and the shortlist was rolled back.
pub const SYNC_FAILED_WARNING: &str = "Failed to update shortlist";

/// Issue order of a remote request.
pub type Seq = u64;

/// What a sync did to the local shortlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No session or phone on file, nothing was sent.
    Skipped,

    /// The server kept exactly what was sent.
    InSync,

    /// The server returned a different list, which replaced the local one.
    Corrected(ItemSet),

    /// The request failed and the local shortlist was restored.
    RolledBack {
        /// Items the shortlist was restored to.
        restored: ItemSet,
        /// Message for the shopper.
        warning: String,
    },

    /// A newer response was already applied, this one was discarded.
    Stale,
}

/// What a refresh from the remote cart did to the local shortlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// No session or phone on file, nothing was fetched.
    Skipped,

    /// The remote cart matches the local shortlist.
    Unchanged,

    /// The remote cart replaced the local shortlist.
    Replaced(ItemSet),

    /// The fetch failed, the local shortlist is untouched.
    Failed(String),

    /// A newer response was already applied, this one was discarded.
    Stale,
}

/// Talks to the remote cart and stamps each request with a sequence number.
#[derive(Debug, Clone)]
pub struct SyncAdapter {
    client: ApiClient,
    issued: Arc<AtomicU64>,
}

impl SyncAdapter {
    /// Creates an adapter over `client`.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            issued: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The underlying API client.
    #[must_use]
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Allocates the next sequence number. Numbers start at 1 and only grow.
    pub fn next_seq(&self) -> Seq {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Sends `items` as the full remote cart and returns the list the server kept.
    ///
    /// A response without an item list is taken as the server keeping what was sent.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    #[tracing::instrument(skip(self, items, phone), fields(items = items.len()))]
    pub async fn push(
        &self,
        items: &ItemSet,
        session_id: &SessionId,
        phone: &CustomerPhone,
    ) -> Result<ItemSet, ApiError> {
        let resp = self
            .client
            .sync_cart(&items.to_vec(), session_id, phone.as_str())
            .await?;

        Ok(match resp.items {
            Some(kept) => kept.into_iter().collect(),
            None => items.clone(),
        })
    }

    /// Fetches the remote cart. A missing cart or one without an item list is empty.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status other than 404.
    #[tracing::instrument(skip(self, phone))]
    pub async fn pull(
        &self,
        session_id: &SessionId,
        phone: &CustomerPhone,
    ) -> Result<ItemSet, ApiError> {
        let cart = self.client.get_cart(session_id, phone.as_str()).await?;
        Ok(cart
            .and_then(|cart| cart.items)
            .unwrap_or_default()
            .into_iter()
            .collect())
    }
}

/// Decides which responses may still change local state.
///
/// A response is admitted only if it was issued after the last admitted one.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SequenceGate {
    last_applied: Seq,
}

impl SequenceGate {
    /// Creates a gate that has admitted nothing yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { last_applied: 0 }
    }

    /// Admits `seq` if it is newer than everything admitted so far.
    pub fn admit(&mut self, seq: Seq) -> bool {
        if seq > self.last_applied {
            self.last_applied = seq;
            true
        } else {
            false
        }
    }

    /// The last admitted sequence number, `0` if none.
    #[must_use]
    pub const fn last_applied(&self) -> Seq {
        self.last_applied
    }
}

/// Maps the result of a push onto what should happen locally.
pub fn reconcile(
    sent: &ItemSet,
    fallback: ItemSet,
    result: Result<ItemSet, ApiError>,
) -> SyncOutcome {
    match result {
        Ok(kept) if &kept == sent => SyncOutcome::InSync,
        Ok(kept) => SyncOutcome::Corrected(kept),
        Err(_) => SyncOutcome::RolledBack {
            restored: fallback,
            warning: SYNC_FAILED_WARNING.to_string(),
        },
    }
}
