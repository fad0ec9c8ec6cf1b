// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Shortlist client core: the shopper's cart kept on the device and reconciled with the
//! storefront, plus order placement, the order banner and the gallery image cache.

mod banner;
mod cart;
mod config;
mod error;
mod gallery;
mod localdb;
mod session;
mod shortlist;
mod storage;
mod sync;

pub use crate::banner::{OrderBanner, select_banner};
pub use crate::cart::{CartSnapshot, CartStore, ItemSet, Toggle};
pub use crate::config::{APP_NAME, Config, DEFAULT_ORDER_LOOKUP_LIMIT};
pub use crate::error::Error;
pub use crate::gallery::{DEFAULT_IMAGE_CACHE_LIMIT, Gallery, ImageCache};
pub use crate::localdb::SqliteStorage;
pub use crate::session::{CustomerPhone, Identity, generate_session_id};
pub use crate::shortlist::{PhoneSubmitted, Shortlist, ToggleResult};
pub use crate::storage::{MemoryStorage, Storage, StorageError, keys};
pub use crate::sync::{
    RefreshOutcome, SYNC_FAILED_WARNING, Seq, SequenceGate, SyncAdapter, SyncOutcome, reconcile,
};
pub use shortlist_api::{
    ApiConfig, ApiError, AuthMethod, Order, Product, ProductId, ProductPage, ProductQuery,
    SessionId,
};
