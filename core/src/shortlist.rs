// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use shortlist_api::{ApiClient, Order, Product, ProductId, ProductPage, ProductQuery, SessionId};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::banner::{self, OrderBanner, select_banner};
use crate::cart::{CartSnapshot, CartStore, ItemSet, Toggle};
use crate::config::Config;
use crate::error::Error;
use crate::gallery::{Gallery, ImageCache};
use crate::localdb::SqliteStorage;
use crate::session::{CustomerPhone, Identity};
use crate::storage::{Storage, keys, load_string};
use crate::sync::{RefreshOutcome, Seq, SequenceGate, SyncAdapter, SyncOutcome, reconcile};

/// Result of [`Shortlist::toggle`].
#[derive(Debug)]
pub enum ToggleResult {
    /// No phone on file. The product is pending until [`Shortlist::submit_phone`].
    NeedsPhone(ProductId),

    /// The shortlist changed locally and a sync was scheduled.
    Applied {
        /// Items after the toggle.
        items: ItemSet,
        /// `true` if the product was added, `false` if removed.
        added: bool,
        /// The scheduled sync.
        sync: JoinHandle<SyncOutcome>,
    },
}

/// Result of [`Shortlist::submit_phone`].
#[derive(Debug)]
pub struct PhoneSubmitted {
    /// The recorded phone.
    pub phone: CustomerPhone,
    /// The pending product that was added, if any.
    pub added: Option<ProductId>,
    /// The sync scheduled for the added product.
    pub sync: Option<JoinHandle<SyncOutcome>>,
}

#[derive(Debug)]
struct State {
    cart: CartStore,
    identity: Identity,
    gate: SequenceGate,
    /// Sequence number taken by the last local change to the items.
    last_mutation: Seq,
}

impl State {
    /// Admits a response issued at `seq` unless a newer one was applied or the items changed
    /// locally after it was issued.
    fn admit(&mut self, seq: Seq) -> bool {
        seq >= self.last_mutation && self.gate.admit(seq)
    }
}

/// The shopper's shortlist, kept locally and reconciled with the storefront.
///
/// Cheap to clone; clones share state.
#[derive(Debug, Clone)]
pub struct Shortlist {
    config: Arc<Config>,
    storage: Arc<dyn Storage>,
    state: Arc<Mutex<State>>,
    sync: SyncAdapter,
    gallery: Arc<Gallery>,
    ordering: Arc<AtomicBool>,
}

impl Shortlist {
    /// Creates a shortlist with state kept in SQLite under the configured state directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the database cannot be opened.
    pub async fn new(mut config: Config) -> Result<Self, Error> {
        config.normalize()?;
        let storage = SqliteStorage::open(config.state_dir.as_deref()).await?;
        Self::with_storage(config, Arc::new(storage)).await
    }

    /// Creates a shortlist over the given storage. The configuration is used as is.
    ///
    /// # Errors
    ///
    /// Returns an error if the API client cannot be built.
    pub async fn with_storage(config: Config, storage: Arc<dyn Storage>) -> Result<Self, Error> {
        let client = ApiClient::new(config.api.clone())?;

        let cart = CartStore::load(storage.clone()).await;
        let identity = Identity::resolve(storage.as_ref()).await;
        let cache = ImageCache::load(storage.as_ref(), config.image_cache_limit).await;
        let gallery = Gallery::new(storage.clone(), client.clone(), cache);

        Ok(Self {
            config: Arc::new(config),
            storage,
            state: Arc::new(Mutex::new(State {
                cart,
                identity,
                gate: SequenceGate::new(),
                last_mutation: 0,
            })),
            sync: SyncAdapter::new(client),
            gallery: Arc::new(gallery),
            ordering: Arc::new(AtomicBool::new(false)),
        })
    }

    /// The configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current items, session and phone.
    pub async fn snapshot(&self) -> CartSnapshot {
        let state = self.state.lock().await;
        CartSnapshot {
            items: state.cart.items().clone(),
            session_id: state.identity.session_id().clone(),
            customer_phone: state.identity.phone().cloned(),
        }
    }

    /// Current items.
    pub async fn items(&self) -> ItemSet {
        self.state.lock().await.cart.items().clone()
    }

    /// Current identity.
    pub async fn identity(&self) -> Identity {
        self.state.lock().await.identity.clone()
    }

    /// The product waiting for a phone number, if any.
    pub async fn pending(&self) -> Option<ProductId> {
        self.state.lock().await.cart.pending().cloned()
    }

    /// Id of the last order placed from this device.
    pub async fn last_order_id(&self) -> Option<String> {
        load_string(self.storage.as_ref(), keys::LAST_ORDER_ID).await
    }

    /// Adds or removes a product.
    ///
    /// Without a phone on file nothing changes except the pending product, and nothing is sent.
    /// Otherwise the local change is applied and persisted at once and a sync is scheduled.
    #[tracing::instrument(skip(self))]
    pub async fn toggle(&self, id: ProductId) -> ToggleResult {
        let mut state = self.state.lock().await;
        let phone = state.identity.phone().cloned();

        match state.cart.toggle(id, phone.as_ref()) {
            Toggle::NeedsPhone(id) => ToggleResult::NeedsPhone(id),
            Toggle::Changed {
                items,
                fallback,
                added,
            } => {
                state.cart.persist().await;
                let sync = self.schedule_sync(&mut state, items.clone(), fallback);
                ToggleResult::Applied { items, added, sync }
            }
        }
    }

    /// Records the customer phone and adds the pending product, if any.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyPhone`] if `raw` is blank.
    #[tracing::instrument(skip_all)]
    pub async fn submit_phone(&self, raw: &str) -> Result<PhoneSubmitted, Error> {
        let mut state = self.state.lock().await;
        let phone = state.identity.set_phone(self.storage.as_ref(), raw).await?;

        let Some((id, fallback)) = state.cart.resolve_pending() else {
            return Ok(PhoneSubmitted {
                phone,
                added: None,
                sync: None,
            });
        };

        state.cart.persist().await;
        let items = state.cart.items().clone();
        let sync = self.schedule_sync(&mut state, items, fallback);
        tracing::info!(%id, "added pending product");
        Ok(PhoneSubmitted {
            phone,
            added: Some(id),
            sync: Some(sync),
        })
    }

    /// Drops the pending product, e.g. when the shopper dismisses the phone prompt.
    pub async fn cancel_pending(&self) -> Option<ProductId> {
        self.state.lock().await.cart.cancel_pending()
    }

    /// Forgets the customer phone. Later toggles need a new phone number.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored phone cannot be removed.
    pub async fn forget_phone(&self) -> Result<(), Error> {
        let mut state = self.state.lock().await;
        state.identity.forget_phone(self.storage.as_ref()).await
    }

    /// Sends `items` as the remote cart and reconciles the reply.
    ///
    /// On failure the local shortlist is restored to `fallback`.
    pub async fn sync(&self, items: ItemSet, fallback: ItemSet) -> SyncOutcome {
        let (seq, session_id, phone) = {
            let state = self.state.lock().await;
            let Some((session_id, phone)) = state.identity.sync_target() else {
                return SyncOutcome::Skipped;
            };
            (self.sync.next_seq(), session_id, phone)
        };

        self.run_sync(seq, items, fallback, session_id, phone).await
    }

    /// Sends the current items as the remote cart.
    pub async fn push(&self) -> SyncOutcome {
        let items = self.items().await;
        self.sync(items.clone(), items).await
    }

    /// Replaces the local shortlist with the remote cart when they differ.
    #[tracing::instrument(skip(self))]
    pub async fn refresh(&self) -> RefreshOutcome {
        let (seq, session_id, phone) = {
            let state = self.state.lock().await;
            let Some((session_id, phone)) = state.identity.sync_target() else {
                return RefreshOutcome::Skipped;
            };
            (self.sync.next_seq(), session_id, phone)
        };

        let remote = match self.sync.pull(&session_id, &phone).await {
            Ok(remote) => remote,
            Err(err) => {
                tracing::warn!(%err, "cart refresh failed");
                return RefreshOutcome::Failed(err.to_string());
            }
        };

        let mut state = self.state.lock().await;
        if !state.admit(seq) {
            tracing::debug!(seq, "discarding stale cart refresh");
            return RefreshOutcome::Stale;
        }
        if &remote == state.cart.items() {
            return RefreshOutcome::Unchanged;
        }

        state.cart.replace(remote.clone()).await;
        RefreshOutcome::Replaced(remote)
    }

    /// Places an order for the current shortlist and clears it.
    ///
    /// # Errors
    ///
    /// Returns an error if the shortlist is empty, no phone is on file, another order is being
    /// placed, or the request fails. On error the shortlist is unchanged.
    #[tracing::instrument(skip(self))]
    pub async fn place_order(&self) -> Result<Order, Error> {
        let (items, session_id, phone) = {
            let state = self.state.lock().await;
            if state.cart.items().is_empty() {
                return Err(Error::EmptyShortlist);
            }
            let phone = state.identity.phone().cloned().ok_or(Error::MissingPhone)?;
            (
                state.cart.items().to_vec(),
                state.identity.session_id().clone(),
                phone,
            )
        };

        if self.ordering.swap(true, Ordering::SeqCst) {
            return Err(Error::OrderInFlight);
        }
        let _guard = OrderingGuard(&self.ordering);

        let order = self
            .sync
            .client()
            .create_order(&items, phone.as_str(), &session_id)
            .await?;
        tracing::info!(order_id = %order.id, items = items.len(), "order placed");

        {
            let mut state = self.state.lock().await;
            // syncs still in flight carry pre-order items
            let seq = self.sync.next_seq();
            state.last_mutation = seq;
            state.gate.admit(seq);
            state.cart.replace(ItemSet::new()).await;
        }

        if let Err(err) = self.storage.set(keys::LAST_ORDER_ID, &order.id).await {
            tracing::warn!(%err, "failed to record last order id");
        }
        if let Err(err) = banner::reset(self.storage.as_ref()).await {
            tracing::warn!(%err, "failed to reset order banner");
        }
        Ok(order)
    }

    /// The banner for the latest confirmed order, if there is one the shopper has not seen.
    ///
    /// Showing a banner marks it as seen. Failures yield no banner.
    #[tracing::instrument(skip(self))]
    pub async fn order_banner(&self) -> Option<OrderBanner> {
        let session_id = self.state.lock().await.identity.session_id().clone();
        let orders = match self
            .sync
            .client()
            .list_orders_by_session(&session_id, self.config.order_lookup_limit)
            .await
        {
            Ok(orders) => orders,
            Err(err) => {
                tracing::debug!(%err, "failed to look up recent orders");
                return None;
            }
        };

        let dismissed = banner::load_dismissed(self.storage.as_ref()).await;
        let seen = banner::load_seen(self.storage.as_ref()).await;
        let banner = select_banner(&orders, dismissed.as_deref(), seen.as_deref())?;

        if let Err(err) = banner::mark_seen(self.storage.as_ref(), &banner.id).await {
            tracing::warn!(%err, "failed to mark order banner as seen");
        }
        Some(banner)
    }

    /// Hides the banner for `banner`'s order from now on.
    ///
    /// # Errors
    ///
    /// Returns an error if the dismissal cannot be stored.
    pub async fn dismiss_banner(&self, banner: &OrderBanner) -> Result<(), Error> {
        banner::mark_dismissed(self.storage.as_ref(), &banner.id).await?;
        Ok(())
    }

    /// Lists one page of the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_products(&self, query: &ProductQuery) -> Result<ProductPage, Error> {
        Ok(self.sync.client().list_products(query).await?)
    }

    /// Returns the full gallery of a product. See [`Gallery::ensure_images`].
    pub async fn ensure_images(&self, id: &ProductId, fallback: &[String]) -> Vec<String> {
        self.gallery.ensure_images(id, fallback).await
    }

    /// Fetches the galleries of products not fetched yet. Returns how many were fetched.
    pub async fn prefetch_images(&self, products: &[Product]) -> usize {
        self.gallery.prefetch(products).await
    }

    /// A copy of the image cache.
    pub async fn image_cache(&self) -> ImageCache {
        self.gallery.cache().await
    }

    fn schedule_sync(
        &self,
        state: &mut State,
        items: ItemSet,
        fallback: ItemSet,
    ) -> JoinHandle<SyncOutcome> {
        let seq = self.sync.next_seq();
        state.last_mutation = seq;

        let Some((session_id, phone)) = state.identity.sync_target() else {
            return tokio::spawn(async { SyncOutcome::Skipped });
        };

        let this = self.clone();
        tokio::spawn(async move { this.run_sync(seq, items, fallback, session_id, phone).await })
    }

    #[tracing::instrument(skip(self, items, fallback, session_id, phone))]
    async fn run_sync(
        &self,
        seq: Seq,
        items: ItemSet,
        fallback: ItemSet,
        session_id: SessionId,
        phone: CustomerPhone,
    ) -> SyncOutcome {
        let result = self.sync.push(&items, &session_id, &phone).await;
        if let Err(err) = &result {
            tracing::warn!(%err, "shortlist sync failed");
        }
        let outcome = reconcile(&items, fallback, result);

        let mut state = self.state.lock().await;
        if !state.admit(seq) {
            tracing::debug!("discarding stale sync response");
            return SyncOutcome::Stale;
        }

        match &outcome {
            SyncOutcome::Corrected(kept) => {
                tracing::info!(items = kept.len(), "server corrected the shortlist");
                state.cart.replace(kept.clone()).await;
            }
            SyncOutcome::RolledBack { restored, .. } => {
                state.cart.replace(restored.clone()).await;
            }
            SyncOutcome::InSync | SyncOutcome::Skipped | SyncOutcome::Stale => {}
        }
        outcome
    }
}

#[derive(Debug)]
struct OrderingGuard<'a>(&'a AtomicBool);

impl Drop for OrderingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
