// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! End-to-end workflow tests for the shortlist-core crate.
//!
//! These tests run the shortlist against a mock storefront and check what ends up locally,
//! in storage and on the server.

mod gallery_cache;
mod order_flow;
mod shortlist_sync;
