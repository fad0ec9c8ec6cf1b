// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use shortlist_api::ApiError;

use crate::storage::StorageError;

/// Errors surfaced by the shortlist client.
///
/// Sync failures are not errors: they roll back local state and are reported through
/// [`SyncOutcome`](crate::SyncOutcome) instead.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The storefront API failed or rejected a request.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The local storage backend failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A blank phone number was submitted.
    #[error("Phone number must not be empty")]
    EmptyPhone,

    /// The operation needs a customer phone number and none is on file.
    #[error("A phone number is required")]
    MissingPhone,

    /// An order was requested for an empty shortlist.
    #[error("Shortlist is empty")]
    EmptyShortlist,

    /// An order is already being sent.
    #[error("An order is already being sent")]
    OrderInFlight,

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}
