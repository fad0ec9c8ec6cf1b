// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Shortlist toggling and reconciliation with the remote cart.

use std::time::Duration;

use serde_json::json;
use shortlist_core::{ProductId, RefreshOutcome, SYNC_FAILED_WARNING, SyncOutcome, ToggleResult};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{EchoCart, PHONE, SESSION, ShortlistBuilder, cart_body, ids, sync_count};

async fn applied(result: ToggleResult) -> SyncOutcome {
    match result {
        ToggleResult::Applied { sync, .. } => sync.await.unwrap(),
        ToggleResult::NeedsPhone(id) => panic!("expected a sync, phone was requested for {id}"),
    }
}

#[tokio::test]
async fn toggle_without_phone_requests_phone_and_sends_nothing() {
    // Arrange
    let server = MockServer::start().await;
    let (shortlist, _) = ShortlistBuilder::new(&server.uri()).build().await;

    // Act
    let result = shortlist.toggle(ProductId::from("RING-001")).await;

    // Assert
    assert!(matches!(result, ToggleResult::NeedsPhone(ref id) if id.as_str() == "RING-001"));
    assert!(shortlist.items().await.is_empty());
    assert_eq!(shortlist.pending().await, Some(ProductId::from("RING-001")));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn submit_phone_adds_pending_product_and_syncs_once() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cart/sync"))
        .and(body_json(cart_body(&["RING-001"])))
        .respond_with(EchoCart)
        .expect(1)
        .mount(&server)
        .await;
    let (shortlist, _) = ShortlistBuilder::new(&server.uri()).build().await;
    shortlist.toggle(ProductId::from("RING-001")).await;

    // Act
    let submitted = shortlist.submit_phone(" 9876543210 ").await.unwrap();

    // Assert
    assert_eq!(submitted.phone.as_str(), PHONE);
    assert_eq!(submitted.added, Some(ProductId::from("RING-001")));
    let outcome = submitted.sync.unwrap().await.unwrap();
    assert_eq!(outcome, SyncOutcome::InSync);
    assert_eq!(shortlist.items().await, ids(&["RING-001"]));
    assert_eq!(shortlist.pending().await, None);
}

#[tokio::test]
async fn submit_phone_without_pending_product_sends_nothing() {
    let server = MockServer::start().await;
    let (shortlist, _) = ShortlistBuilder::new(&server.uri()).build().await;

    let submitted = shortlist.submit_phone(PHONE).await.unwrap();

    assert!(submitted.added.is_none());
    assert!(submitted.sync.is_none());
    assert!(shortlist.identity().await.can_sync());
    assert_eq!(sync_count(&server).await, 0);
}

#[tokio::test]
async fn submit_blank_phone_is_rejected() {
    let server = MockServer::start().await;
    let (shortlist, _) = ShortlistBuilder::new(&server.uri()).build().await;
    shortlist.toggle(ProductId::from("RING-001")).await;

    let result = shortlist.submit_phone("   ").await;

    assert!(matches!(result, Err(shortlist_core::Error::EmptyPhone)));
    assert_eq!(shortlist.pending().await, Some(ProductId::from("RING-001")));
    assert!(shortlist.items().await.is_empty());
}

#[tokio::test]
async fn server_returning_empty_list_clears_local_shortlist() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cart/sync"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(&server)
        .await;
    let (shortlist, _) = ShortlistBuilder::new(&server.uri())
        .with_session("sess-abc")
        .with_phone(PHONE)
        .build()
        .await;

    // Act
    let outcome = applied(shortlist.toggle(ProductId::from("RING-001")).await).await;

    // Assert
    assert_eq!(outcome, SyncOutcome::Corrected(ids(&[])));
    assert!(shortlist.items().await.is_empty());
}

#[tokio::test]
async fn refresh_with_empty_remote_cart_clears_local_shortlist() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cart"))
        .and(query_param("session_id", "sess-abc"))
        .and(query_param("customer_phone", PHONE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .expect(1)
        .mount(&server)
        .await;
    let (shortlist, _) = ShortlistBuilder::new(&server.uri())
        .with_session("sess-abc")
        .with_phone(PHONE)
        .with_items(&["RING-001"])
        .build()
        .await;

    let outcome = shortlist.refresh().await;

    assert_eq!(outcome, RefreshOutcome::Replaced(ids(&[])));
    assert!(shortlist.items().await.is_empty());
}

#[tokio::test]
async fn network_error_rolls_back_and_warns() {
    // Arrange: nothing listens on the port
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    let (shortlist, _) = ShortlistBuilder::new(&uri).with_phone(PHONE).build().await;

    // Act
    let outcome = applied(shortlist.toggle(ProductId::from("RING-001")).await).await;

    // Assert
    assert_eq!(
        outcome,
        SyncOutcome::RolledBack {
            restored: ids(&[]),
            warning: SYNC_FAILED_WARNING.to_string(),
        }
    );
    assert!(shortlist.items().await.is_empty());
}

#[tokio::test]
async fn server_error_restores_pre_mutation_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cart/sync"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let (shortlist, _) = ShortlistBuilder::new(&server.uri())
        .with_phone(PHONE)
        .with_items(&["EAR-002", "RING-001"])
        .build()
        .await;
    let before = shortlist.items().await;

    let outcome = applied(shortlist.toggle(ProductId::from("RING-001")).await).await;

    assert!(matches!(outcome, SyncOutcome::RolledBack { .. }));
    assert_eq!(shortlist.items().await, before);
}

#[tokio::test]
async fn syncing_the_same_list_twice_changes_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cart/sync"))
        .and(body_json(cart_body(&["EAR-002", "RING-001"])))
        .respond_with(EchoCart)
        .expect(2)
        .mount(&server)
        .await;
    let (shortlist, _) = ShortlistBuilder::new(&server.uri())
        .with_phone(PHONE)
        .with_items(&["RING-001", "EAR-002"])
        .build()
        .await;

    let first = shortlist.push().await;
    let after_first = shortlist.items().await;
    let second = shortlist.push().await;

    assert_eq!(first, SyncOutcome::InSync);
    assert_eq!(second, SyncOutcome::InSync);
    assert_eq!(shortlist.items().await, after_first);
}

#[tokio::test]
async fn duplicate_items_are_sent_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cart/sync"))
        .and(body_json(cart_body(&["EAR-002", "RING-001"])))
        .respond_with(EchoCart)
        .expect(1)
        .mount(&server)
        .await;
    let (shortlist, _) = ShortlistBuilder::new(&server.uri())
        .with_phone(PHONE)
        .with_items(&["RING-001", "EAR-002", "RING-001"])
        .build()
        .await;

    assert_eq!(shortlist.push().await, SyncOutcome::InSync);
}

#[tokio::test]
async fn toggle_sequence_leaves_server_with_net_added_items() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cart/sync"))
        .respond_with(EchoCart)
        .mount(&server)
        .await;
    let (shortlist, _) = ShortlistBuilder::new(&server.uri())
        .with_phone(PHONE)
        .build()
        .await;

    // Act: A+ B+ A- C+ B- A+ C- D+
    for id in ["A", "B", "A", "C", "B", "A", "C", "D"] {
        let outcome = applied(shortlist.toggle(ProductId::from(id)).await).await;
        assert_eq!(outcome, SyncOutcome::InSync);
    }

    // Assert
    let requests = server.received_requests().await.unwrap();
    let last = requests.last().unwrap();
    assert_eq!(last.body_json::<serde_json::Value>().unwrap(), cart_body(&["A", "D"]));
    assert_eq!(shortlist.items().await, ids(&["A", "D"]));
}

#[tokio::test]
async fn stale_response_does_not_overwrite_newer_state() {
    // Arrange: the first sync answers late with a divergent list
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cart/sync"))
        .and(body_json(cart_body(&["A"])))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "items": ["X"] }))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/cart/sync"))
        .and(body_json(cart_body(&["A", "B"])))
        .respond_with(EchoCart)
        .mount(&server)
        .await;
    let (shortlist, _) = ShortlistBuilder::new(&server.uri())
        .with_phone(PHONE)
        .build()
        .await;

    // Act
    let ToggleResult::Applied { sync: first, .. } = shortlist.toggle(ProductId::from("A")).await
    else {
        panic!("expected a sync");
    };
    let second = applied(shortlist.toggle(ProductId::from("B")).await).await;
    let first = first.await.unwrap();

    // Assert
    assert_eq!(second, SyncOutcome::InSync);
    assert_eq!(first, SyncOutcome::Stale);
    assert_eq!(shortlist.items().await, ids(&["A", "B"]));
}

#[tokio::test]
async fn stale_failure_does_not_roll_back_newer_state() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cart/sync"))
        .and(body_json(cart_body(&["A"])))
        .respond_with(ResponseTemplate::new(500).set_delay(Duration::from_millis(300)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/cart/sync"))
        .and(body_json(cart_body(&["A", "B"])))
        .respond_with(EchoCart)
        .mount(&server)
        .await;
    let (shortlist, _) = ShortlistBuilder::new(&server.uri())
        .with_phone(PHONE)
        .build()
        .await;

    let ToggleResult::Applied { sync: first, .. } = shortlist.toggle(ProductId::from("A")).await
    else {
        panic!("expected a sync");
    };
    let second = applied(shortlist.toggle(ProductId::from("B")).await).await;
    let first = first.await.unwrap();

    assert_eq!(second, SyncOutcome::InSync);
    assert_eq!(first, SyncOutcome::Stale);
    assert_eq!(shortlist.items().await, ids(&["A", "B"]));
}

#[tokio::test]
async fn refresh_treats_missing_cart_as_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cart"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let (shortlist, _) = ShortlistBuilder::new(&server.uri())
        .with_phone(PHONE)
        .with_items(&["RING-001"])
        .build()
        .await;

    assert_eq!(shortlist.refresh().await, RefreshOutcome::Replaced(ids(&[])));
    assert_eq!(shortlist.refresh().await, RefreshOutcome::Unchanged);
}

#[tokio::test]
async fn refresh_adopts_remote_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cart"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "items": ["NECK-003", "RING-001", "NECK-003"] })),
        )
        .mount(&server)
        .await;
    let (shortlist, _) = ShortlistBuilder::new(&server.uri())
        .with_phone(PHONE)
        .with_items(&["RING-001"])
        .build()
        .await;

    let outcome = shortlist.refresh().await;

    assert_eq!(outcome, RefreshOutcome::Replaced(ids(&["NECK-003", "RING-001"])));
    assert_eq!(shortlist.items().await, ids(&["RING-001", "NECK-003"]));
}

#[tokio::test]
async fn refresh_failure_leaves_local_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cart"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;
    let (shortlist, _) = ShortlistBuilder::new(&server.uri())
        .with_phone(PHONE)
        .with_items(&["RING-001"])
        .build()
        .await;

    let outcome = shortlist.refresh().await;

    assert!(matches!(outcome, RefreshOutcome::Failed(_)));
    assert_eq!(shortlist.items().await, ids(&["RING-001"]));
}

#[tokio::test]
async fn refresh_without_phone_is_skipped() {
    let server = MockServer::start().await;
    let (shortlist, _) = ShortlistBuilder::new(&server.uri())
        .with_items(&["RING-001"])
        .build()
        .await;

    assert_eq!(shortlist.refresh().await, RefreshOutcome::Skipped);
    assert!(server.received_requests().await.unwrap().is_empty());
    assert_eq!(shortlist.snapshot().await.session_id.as_str(), SESSION);
}

#[tokio::test]
async fn refresh_issued_before_toggle_does_not_overwrite_it() {
    // Arrange: the refresh answers first with the pre-toggle cart
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cart"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "items": [] }))
                .set_delay(Duration::from_millis(100)),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/cart/sync"))
        .and(body_json(cart_body(&["A"])))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "items": ["A"] }))
                .set_delay(Duration::from_millis(400)),
        )
        .expect(1)
        .mount(&server)
        .await;
    let (shortlist, _) = ShortlistBuilder::new(&server.uri())
        .with_phone(PHONE)
        .build()
        .await;

    // Act
    let refresh = tokio::spawn({
        let shortlist = shortlist.clone();
        async move { shortlist.refresh().await }
    });
    tokio::time::sleep(Duration::from_millis(20)).await;
    let ToggleResult::Applied { sync, .. } = shortlist.toggle(ProductId::from("A")).await else {
        panic!("expected a sync");
    };
    let refresh = refresh.await.unwrap();
    let after_refresh = shortlist.items().await;
    let sync = sync.await.unwrap();

    // Assert
    assert_eq!(refresh, RefreshOutcome::Stale);
    assert_eq!(after_refresh, ids(&["A"]));
    assert_eq!(sync, SyncOutcome::InSync);
    assert_eq!(shortlist.items().await, ids(&["A"]));
}

#[tokio::test]
async fn late_correction_of_earlier_toggle_is_discarded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cart/sync"))
        .and(body_json(cart_body(&["A"])))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "items": ["X"] }))
                .set_delay(Duration::from_millis(50)),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/cart/sync"))
        .and(body_json(cart_body(&["A", "B"])))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "items": ["A", "B"] }))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;
    let (shortlist, _) = ShortlistBuilder::new(&server.uri())
        .with_phone(PHONE)
        .build()
        .await;

    let ToggleResult::Applied { sync: first, .. } = shortlist.toggle(ProductId::from("A")).await
    else {
        panic!("expected a sync");
    };
    let ToggleResult::Applied { sync: second, .. } = shortlist.toggle(ProductId::from("B")).await
    else {
        panic!("expected a sync");
    };
    let first = first.await.unwrap();
    let after_first = shortlist.items().await;
    let second = second.await.unwrap();

    assert_eq!(first, SyncOutcome::Stale);
    assert_eq!(after_first, ids(&["A", "B"]));
    assert_eq!(second, SyncOutcome::InSync);
    assert_eq!(shortlist.items().await, ids(&["A", "B"]));
}
