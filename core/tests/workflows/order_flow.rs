// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Order placement and the confirmed-order banner.

use std::time::Duration;

use serde_json::json;
use shortlist_core::{Error, OrderBanner, Storage, keys};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{PHONE, SESSION, ShortlistBuilder, ids};

#[tokio::test]
async fn place_order_clears_shortlist_and_records_order() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .and(body_json(json!({
            "items": ["EAR-002", "RING-001"],
            "customer_phone": PHONE,
            "session_id": SESSION,
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "ORD-m1x2y3-ab12c",
            "items": ["EAR-002", "RING-001"],
            "status": "pending",
        })))
        .expect(1)
        .mount(&server)
        .await;
    let (shortlist, storage) = ShortlistBuilder::new(&server.uri())
        .with_phone(PHONE)
        .with_items(&["RING-001", "EAR-002"])
        .with_raw(keys::ORDER_BANNER_DISMISSED, r#"{"id":"ORD-old","ts":1}"#)
        .with_raw(keys::CONFIRMED_BANNER_SEEN, r#""ORD-old""#)
        .build()
        .await;

    // Act
    let order = shortlist.place_order().await.unwrap();

    // Assert
    assert_eq!(order.id, "ORD-m1x2y3-ab12c");
    assert!(shortlist.items().await.is_empty());
    assert_eq!(
        shortlist.last_order_id().await.as_deref(),
        Some("ORD-m1x2y3-ab12c")
    );
    assert_eq!(storage.get(keys::SHORTLIST).await.unwrap().as_deref(), Some("[]"));
    assert_eq!(storage.get(keys::ORDER_BANNER_DISMISSED).await.unwrap(), None);
    assert_eq!(storage.get(keys::CONFIRMED_BANNER_SEEN).await.unwrap(), None);
}

#[tokio::test]
async fn place_order_rejects_empty_shortlist() {
    let server = MockServer::start().await;
    let (shortlist, _) = ShortlistBuilder::new(&server.uri())
        .with_phone(PHONE)
        .build()
        .await;

    let err = shortlist.place_order().await.unwrap_err();

    assert!(matches!(err, Error::EmptyShortlist), "got {err:?}");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn place_order_requires_phone() {
    let server = MockServer::start().await;
    let (shortlist, _) = ShortlistBuilder::new(&server.uri())
        .with_items(&["RING-001"])
        .build()
        .await;

    let err = shortlist.place_order().await.unwrap_err();

    assert!(matches!(err, Error::MissingPhone), "got {err:?}");
    assert_eq!(shortlist.items().await, ids(&["RING-001"]));
}

#[tokio::test]
async fn failed_order_keeps_shortlist() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(500).set_body_string("db down"))
        .mount(&server)
        .await;
    let (shortlist, _) = ShortlistBuilder::new(&server.uri())
        .with_phone(PHONE)
        .with_items(&["RING-001"])
        .build()
        .await;

    let err = shortlist.place_order().await.unwrap_err();

    assert!(matches!(err, Error::Api(_)), "got {err:?}");
    assert_eq!(shortlist.items().await, ids(&["RING-001"]));
    assert_eq!(shortlist.last_order_id().await, None);
}

#[tokio::test]
async fn duplicate_order_tap_is_rejected() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({ "id": "ORD-1", "items": ["RING-001"] }))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;
    let (shortlist, _) = ShortlistBuilder::new(&server.uri())
        .with_phone(PHONE)
        .with_items(&["RING-001"])
        .build()
        .await;

    // Act
    let (first, second) = tokio::join!(shortlist.place_order(), shortlist.place_order());

    // Assert
    assert_eq!(first.unwrap().id, "ORD-1");
    assert!(matches!(second, Err(Error::OrderInFlight)));
    assert!(shortlist.items().await.is_empty());
}

fn orders_mock(body: serde_json::Value) -> Mock {
    Mock::given(method("GET"))
        .and(path("/orders"))
        .and(query_param("session_id", SESSION))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
}

#[tokio::test]
async fn banner_shows_latest_confirmed_order_once() {
    // Arrange
    let server = MockServer::start().await;
    orders_mock(json!({
        "items": [
            { "id": "ORD-3", "status": "pending", "created_at": "2025-03-03T10:00:00Z" },
            {
                "id": "ORD-2",
                "status": "CONFIRMED",
                "created_at": "2025-03-02T10:00:00Z",
                "confirmed_at": "2025-03-02T12:00:00Z"
            },
            { "id": "ORD-1", "status": "confirmed" }
        ]
    }))
    .expect(2)
    .mount(&server)
    .await;
    let (shortlist, _) = ShortlistBuilder::new(&server.uri()).build().await;

    // Act
    let first = shortlist.order_banner().await;
    let second = shortlist.order_banner().await;

    // Assert
    assert_eq!(
        first,
        Some(OrderBanner {
            id: "ORD-2".to_string(),
            when: Some("2025-03-02T12:00:00Z".to_string()),
        })
    );
    assert_eq!(second, None);
}

#[tokio::test]
async fn dismissed_banner_stays_hidden() {
    let server = MockServer::start().await;
    orders_mock(json!([{ "id": "ORD-9", "status": "confirmed" }]))
        .mount(&server)
        .await;
    let (shortlist, storage) = ShortlistBuilder::new(&server.uri()).build().await;
    let banner = OrderBanner {
        id: "ORD-9".to_string(),
        when: None,
    };

    shortlist.dismiss_banner(&banner).await.unwrap();
    storage.remove(keys::CONFIRMED_BANNER_SEEN).await.unwrap();

    assert_eq!(shortlist.order_banner().await, None);
    let stored = storage.get(keys::ORDER_BANNER_DISMISSED).await.unwrap().unwrap();
    let stored: serde_json::Value = serde_json::from_str(&stored).unwrap();
    assert_eq!(stored["id"], "ORD-9");
    assert!(stored["ts"].is_i64());
}

#[tokio::test]
async fn banner_lookup_failure_shows_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;
    let (shortlist, storage) = ShortlistBuilder::new(&server.uri()).build().await;

    assert_eq!(shortlist.order_banner().await, None);
    assert_eq!(storage.get(keys::CONFIRMED_BANNER_SEEN).await.unwrap(), None);
}

#[tokio::test]
async fn new_order_resets_banner_suppression() {
    // Arrange
    let server = MockServer::start().await;
    orders_mock(json!({ "items": [{ "id": "ORD-5", "status": "confirmed" }] }))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "id": "ORD-6", "items": ["A"] })),
        )
        .mount(&server)
        .await;
    let (shortlist, _) = ShortlistBuilder::new(&server.uri())
        .with_phone(PHONE)
        .with_items(&["A"])
        .build()
        .await;
    assert!(shortlist.order_banner().await.is_some());
    assert!(shortlist.order_banner().await.is_none());

    // Act
    shortlist.place_order().await.unwrap();

    // Assert
    assert_eq!(
        shortlist.order_banner().await.map(|b| b.id),
        Some("ORD-5".to_string())
    );
}
