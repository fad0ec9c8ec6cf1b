// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Gallery fetching and the bounded image cache.

use std::time::Duration;

use serde_json::json;
use shortlist_core::{Product, ProductId, Storage, keys};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::ShortlistBuilder;

fn gallery(id: &str, n: usize) -> serde_json::Value {
    let images: Vec<String> = (1..=n)
        .map(|i| format!("https://cdn.example.com/{id}/{i}.jpg"))
        .collect();
    json!({ "images": images })
}

fn product(id: &str) -> Product {
    Product {
        id: id.to_string(),
        title: format!("Product {id}"),
        images: vec![format!("https://cdn.example.com/{id}/cover.jpg")],
        available: true,
        ..Product::default()
    }
}

#[tokio::test]
async fn gallery_is_fetched_once_and_cached() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/RING-001/images"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gallery("RING-001", 3)))
        .expect(1)
        .mount(&server)
        .await;
    let (shortlist, storage) = ShortlistBuilder::new(&server.uri()).build().await;
    let id = ProductId::from("RING-001");

    // Act
    let first = shortlist.ensure_images(&id, &[]).await;
    let second = shortlist.ensure_images(&id, &[]).await;

    // Assert
    assert_eq!(first.len(), 3);
    assert_eq!(first, second);
    assert!(storage.get(keys::IMAGE_CACHE).await.unwrap().is_some());
}

#[tokio::test]
async fn concurrent_callers_share_one_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/RING-001/images"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(gallery("RING-001", 2))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;
    let (shortlist, _) = ShortlistBuilder::new(&server.uri()).build().await;
    let id = ProductId::from("RING-001");

    let (a, b, c) = tokio::join!(
        shortlist.ensure_images(&id, &[]),
        shortlist.ensure_images(&id, &[]),
        shortlist.ensure_images(&id, &[]),
    );

    assert_eq!(a.len(), 2);
    assert_eq!(a, b);
    assert_eq!(b, c);
}

#[tokio::test]
async fn failed_fetch_falls_back_to_product_images() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/RING-001/images"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let (shortlist, _) = ShortlistBuilder::new(&server.uri()).build().await;
    let fallback = vec!["https://cdn.example.com/RING-001/cover.jpg".to_string()];

    let images = shortlist
        .ensure_images(&ProductId::from("RING-001"), &fallback)
        .await;

    assert_eq!(images, fallback);
    assert!(shortlist.image_cache().await.is_empty());
}

#[tokio::test]
async fn empty_gallery_is_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/RING-001/images"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "images": [] })))
        .mount(&server)
        .await;
    let (shortlist, _) = ShortlistBuilder::new(&server.uri()).build().await;
    let fallback = vec!["cover.jpg".to_string()];

    let images = shortlist
        .ensure_images(&ProductId::from("RING-001"), &fallback)
        .await;

    assert_eq!(images, fallback);
    assert!(shortlist.image_cache().await.is_empty());
}

#[tokio::test]
async fn cache_evicts_oldest_beyond_limit() {
    // Arrange
    let server = MockServer::start().await;
    for id in ["A", "B", "C"] {
        Mock::given(method("GET"))
            .and(path(format!("/products/{id}/images")))
            .respond_with(ResponseTemplate::new(200).set_body_json(gallery(id, 2)))
            .mount(&server)
            .await;
    }
    let (shortlist, storage) = ShortlistBuilder::new(&server.uri())
        .with_config(|c| c.image_cache_limit = 2)
        .build()
        .await;

    // Act
    for id in ["A", "B", "C"] {
        shortlist.ensure_images(&ProductId::from(id), &[]).await;
    }

    // Assert
    let cache = shortlist.image_cache().await;
    let cached: Vec<_> = cache.ids().map(ProductId::as_str).collect();
    assert_eq!(cached, vec!["B", "C"]);

    let raw = storage.get(keys::IMAGE_CACHE).await.unwrap().unwrap();
    let stored: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored.len(), 2);
    assert!(!stored.contains_key("A"));
}

#[tokio::test]
async fn prefetch_skips_cached_galleries() {
    // Arrange: A is cached from a previous run
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/B/images"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gallery("B", 4)))
        .expect(1)
        .mount(&server)
        .await;
    let cached = json!({ "A": ["https://cdn.example.com/A/1.jpg", "https://cdn.example.com/A/2.jpg"] });
    let (shortlist, _) = ShortlistBuilder::new(&server.uri())
        .with_raw(keys::IMAGE_CACHE, &cached.to_string())
        .build()
        .await;

    // Act
    let fetched = shortlist.prefetch_images(&[product("A"), product("B")]).await;
    let again = shortlist.prefetch_images(&[product("A"), product("B")]).await;

    // Assert
    assert_eq!(fetched, 1);
    assert_eq!(again, 0);
    assert_eq!(
        shortlist.ensure_images(&ProductId::from("B"), &[]).await.len(),
        4
    );
}
