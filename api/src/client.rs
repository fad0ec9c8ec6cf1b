// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Storefront API client for cart, order and catalog operations.

use std::sync::Arc;

use reqwest::Method;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::http::HttpClient;
use crate::types::{
    CartItems, CartSyncBody, Order, OrderBody, OrderList, ProductId, ProductImages, ProductPage,
    ProductQuery, SessionId,
};

/// Client for the storefront backend.
///
/// # Example
///
/// ```ignore
/// use shortlist_api::{ApiClient, ApiConfig, ProductId, SessionId};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ApiClient::new(ApiConfig {
///     base_url: "http://localhost:8000".to_string(),
///     ..Default::default()
/// })?;
///
/// let session = SessionId::from("sess-abc123-m1x2y3");
/// let cart = client
///     .sync_cart(&[ProductId::from("RING-001")], &session, "9876543210")
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Arc<HttpClient>,
    config: ApiConfig,
}

impl ApiClient {
    /// Creates a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is empty or HTTP client initialization fails.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        if config.base_url.trim().is_empty() {
            return Err(ApiError::Config("base_url must not be empty".to_string()));
        }

        let http = HttpClient::new(config.clone())?;
        Ok(Self {
            http: Arc::new(http),
            config,
        })
    }

    /// Returns the configuration this client was built with.
    #[must_use]
    pub const fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Fetches the server-side cart of a shopper.
    ///
    /// Returns `Ok(None)` if the server has no cart for this session and phone.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    #[tracing::instrument(skip(self, customer_phone))]
    pub async fn get_cart(
        &self,
        session_id: &SessionId,
        customer_phone: &str,
    ) -> Result<Option<CartItems>, ApiError> {
        let req = self
            .http
            .build_request(Method::GET, &self.full_url("/cart"))
            .query(&[
                ("session_id", session_id.as_str()),
                ("customer_phone", customer_phone),
            ]);

        match self.http.execute(req).await {
            Ok(resp) => Ok(Some(resp.json().await?)),
            Err(ApiError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Replaces the server-side cart with `items` and returns what the server kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    #[tracing::instrument(skip(self, customer_phone), fields(items = items.len()))]
    pub async fn sync_cart(
        &self,
        items: &[ProductId],
        session_id: &SessionId,
        customer_phone: &str,
    ) -> Result<CartItems, ApiError> {
        let body = CartSyncBody {
            items,
            session_id,
            customer_phone,
        };
        let req = self
            .http
            .build_request(Method::POST, &self.full_url("/cart/sync"))
            .json(&body);

        let resp = self.http.execute(req).await?;
        Ok(resp.json().await?)
    }

    /// Places an order request for `items`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    #[tracing::instrument(skip(self, customer_phone), fields(items = items.len()))]
    pub async fn create_order(
        &self,
        items: &[ProductId],
        customer_phone: &str,
        session_id: &SessionId,
    ) -> Result<Order, ApiError> {
        let body = OrderBody {
            items,
            customer_phone,
            session_id,
        };
        let req = self
            .http
            .build_request(Method::POST, &self.full_url("/orders"))
            .json(&body);

        let resp = self.http.execute(req).await?;
        let order: Order = resp.json().await?;
        if order.id.is_empty() {
            return Err(ApiError::InvalidResponse(
                "order response has no id".to_string(),
            ));
        }
        Ok(order)
    }

    /// Lists the most recent orders placed from a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    #[tracing::instrument(skip(self))]
    pub async fn list_orders_by_session(
        &self,
        session_id: &SessionId,
        limit: u32,
    ) -> Result<Vec<Order>, ApiError> {
        let req = self
            .http
            .build_request(Method::GET, &self.full_url("/orders"))
            .query(&[
                ("session_id", session_id.to_string()),
                ("limit", limit.to_string()),
            ]);

        let resp = self.http.execute(req).await?;
        let list: OrderList = resp.json().await?;
        Ok(list.into())
    }

    /// Lists one page of the product catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    #[tracing::instrument(skip(self))]
    pub async fn list_products(&self, query: &ProductQuery) -> Result<ProductPage, ApiError> {
        let req = self
            .http
            .build_request(Method::GET, &self.full_url("/products"))
            .query(&query.to_pairs());

        let resp = self.http.execute(req).await?;
        Ok(resp.json().await?)
    }

    /// Fetches the full image gallery of a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    #[tracing::instrument(skip(self))]
    pub async fn get_product_images(&self, id: &ProductId) -> Result<ProductImages, ApiError> {
        let path = format!("/products/{}/images", urlencoding::encode(id));
        let req = self.http.build_request(Method::GET, &self.full_url(&path));

        let resp = self.http.execute(req).await?;
        Ok(resp.json().await?)
    }

    fn full_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }
}
