// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Mock storefront helpers.

use serde_json::{Value, json};
use wiremock::{MockServer, Request, Respond, ResponseTemplate};

use super::fixtures::{PHONE, SESSION};

/// Responds to `POST /cart/sync` with the items it was sent, like a server that accepts
/// every change.
#[derive(Debug, Clone, Copy)]
pub struct EchoCart;

impl Respond for EchoCart {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = request.body_json().unwrap_or(Value::Null);
        let items = body.get("items").cloned().unwrap_or_else(|| json!([]));
        ResponseTemplate::new(200).set_body_json(json!({ "items": items }))
    }
}

/// Expected `POST /cart/sync` body for `items` under [`SESSION`] and [`PHONE`].
#[must_use]
pub fn cart_body(items: &[&str]) -> Value {
    json!({
        "items": items,
        "session_id": SESSION,
        "customer_phone": PHONE,
    })
}

/// Number of `POST /cart/sync` requests the server received.
pub async fn sync_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|req| req.method.as_str() == "POST" && req.url.path() == "/cart/sync")
        .count()
}
