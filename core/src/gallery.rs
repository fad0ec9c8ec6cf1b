// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Product image galleries, cached across runs.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use indexmap::IndexMap;
use shortlist_api::{ApiClient, Product, ProductId};
use tokio::sync::{Mutex, OnceCell};
use tokio::task::JoinSet;

use crate::storage::{Storage, StorageError, keys, load_json, store_json};

/// Default number of products whose galleries are kept.
pub const DEFAULT_IMAGE_CACHE_LIMIT: usize = 60;

/// Bounded map from product to gallery images, oldest entries evicted first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCache {
    limit: usize,
    entries: IndexMap<ProductId, Vec<String>>,
}

impl ImageCache {
    /// Creates an empty cache holding at most `limit` products.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            entries: IndexMap::new(),
        }
    }

    /// Loads the persisted cache. Corrupt data yields an empty cache, excess entries are dropped
    /// oldest first.
    pub async fn load(storage: &dyn Storage, limit: usize) -> Self {
        let mut entries: IndexMap<ProductId, Vec<String>> =
            load_json(storage, keys::IMAGE_CACHE).await.unwrap_or_default();

        let excess = entries.len().saturating_sub(limit);
        if excess > 0 {
            entries.drain(..excess);
        }
        Self { limit, entries }
    }

    /// Cached images of `id`.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&[String]> {
        self.entries.get(id).map(Vec::as_slice)
    }

    /// Stores the images of `id` and returns the products evicted to stay within the limit.
    ///
    /// Updating a product already cached keeps its original position.
    pub fn insert(&mut self, id: ProductId, images: Vec<String>) -> Vec<ProductId> {
        self.entries.insert(id, images);

        let excess = self.entries.len().saturating_sub(self.limit);
        self.entries.drain(..excess).map(|(id, _)| id).collect()
    }

    /// Number of cached products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of cached products.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Cached products, oldest first.
    pub fn ids(&self) -> impl Iterator<Item = &ProductId> {
        self.entries.keys()
    }

    /// Writes the cache to storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache cannot be encoded or written.
    pub async fn persist(&self, storage: &dyn Storage) -> Result<(), StorageError> {
        store_json(storage, keys::IMAGE_CACHE, &self.entries).await
    }
}

type InFlight = Arc<OnceCell<Option<Vec<String>>>>;

/// Fetches full galleries on demand, at most once at a time per product.
#[derive(Debug)]
pub struct Gallery {
    storage: Arc<dyn Storage>,
    client: ApiClient,
    cache: Mutex<ImageCache>,
    attempted: Mutex<HashSet<ProductId>>,
    in_flight: Mutex<HashMap<ProductId, InFlight>>,
}

impl Gallery {
    /// Creates a gallery over a loaded cache. Cached products count as already fetched.
    pub fn new(storage: Arc<dyn Storage>, client: ApiClient, cache: ImageCache) -> Self {
        let attempted = cache.ids().cloned().collect();
        Self {
            storage,
            client,
            cache: Mutex::new(cache),
            attempted: Mutex::new(attempted),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// A copy of the current cache.
    pub async fn cache(&self) -> ImageCache {
        self.cache.lock().await.clone()
    }

    /// Returns the gallery of `id`, fetching it if fewer than two images are cached.
    ///
    /// Concurrent callers for the same product share one request. When the fetch fails or
    /// returns nothing, the cached images are returned, or `fallback` if there are none.
    #[tracing::instrument(skip(self, fallback))]
    pub async fn ensure_images(&self, id: &ProductId, fallback: &[String]) -> Vec<String> {
        let cached = self.cache.lock().await.get(id).map(<[String]>::to_vec);
        if let Some(images) = cached.as_ref().filter(|images| images.len() > 1) {
            self.attempted.lock().await.insert(id.clone());
            return images.clone();
        }

        let cell = self
            .in_flight
            .lock()
            .await
            .entry(id.clone())
            .or_default()
            .clone();
        let fetched = cell.get_or_init(|| self.fetch(id)).await.clone();

        {
            let mut in_flight = self.in_flight.lock().await;
            if in_flight.get(id).is_some_and(|c| Arc::ptr_eq(c, &cell)) {
                in_flight.remove(id);
            }
        }

        fetched
            .or(cached)
            .unwrap_or_else(|| fallback.to_vec())
    }

    /// Fetches galleries of the products not attempted yet, concurrently.
    ///
    /// Returns the number of products fetched.
    pub async fn prefetch(self: &Arc<Self>, products: &[Product]) -> usize {
        let mut tasks = JoinSet::new();
        {
            let attempted = self.attempted.lock().await;
            for product in products.iter().filter(|p| !p.id.is_empty()) {
                let id = ProductId::from(product.id.as_str());
                if attempted.contains(&id) {
                    continue;
                }

                let gallery = Arc::clone(self);
                let fallback = product.images.clone();
                tasks.spawn(async move { gallery.ensure_images(&id, &fallback).await });
            }
        }

        let mut count = 0;
        while let Some(res) = tasks.join_next().await {
            match res {
                Ok(_) => count += 1,
                Err(err) => tracing::warn!(%err, "gallery prefetch task failed"),
            }
        }
        count
    }

    async fn fetch(&self, id: &ProductId) -> Option<Vec<String>> {
        let images = match self.client.get_product_images(id).await {
            Ok(resp) if resp.images.is_empty() => {
                tracing::debug!(%id, "server returned an empty gallery");
                return None;
            }
            Ok(resp) => resp.images,
            Err(err) => {
                tracing::warn!(%id, %err, "failed to load gallery images");
                return None;
            }
        };

        let mut cache = self.cache.lock().await;
        let evicted = cache.insert(id.clone(), images.clone());
        if let Err(err) = cache.persist(self.storage.as_ref()).await {
            tracing::warn!(%err, "failed to persist image cache");
        }
        drop(cache);

        let mut attempted = self.attempted.lock().await;
        for old in &evicted {
            attempted.remove(old);
        }
        attempted.insert(id.clone());
        Some(images)
    }
}
