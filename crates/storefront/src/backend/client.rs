//! e-souk backend REST client implementation.
//!
//! Uses `reqwest` for HTTP and `moka` for caching the public catalog
//! (5-minute TTL). Authenticated calls attach `Authorization: Bearer <token>`
//! with the token the caller read from the session.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::multipart;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use e_souk_core::{CategoryId, CategoryRecord, Product, ProductId};

use crate::backend::BackendError;
use crate::backend::types::{ApiCategory, ApiProduct, ProductInput};
use crate::config::EsoukConfig;

/// Cache TTL for the public catalog.
const CACHE_TTL: Duration = Duration::from_secs(300);

/// Cached API responses.
#[derive(Clone)]
enum CacheValue {
    Products(Vec<Product>),
    Categories(Vec<CategoryRecord>),
}

const PUBLISHED_PRODUCTS_KEY: &str = "published_products";
const CATEGORIES_KEY: &str = "categories";

/// Client for the e-souk REST backend.
///
/// Provides typed access to the catalog, product CRUD, category CRUD, and
/// authentication. The published catalog and category list are cached;
/// vendor mutations invalidate them.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    api_url: String,
    cache: Cache<String, CacheValue>,
}

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: String,
}

#[derive(Debug, Serialize)]
struct PublishBody {
    #[serde(rename = "isPublished")]
    is_published: bool,
}

#[derive(Debug, Serialize)]
struct NewCategoryBody<'a> {
    name: &'a str,
}

impl BackendClient {
    /// Create a new backend client.
    #[must_use]
    pub fn new(config: &EsoukConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(100)
            .time_to_live(CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(BackendClientInner {
                client: reqwest::Client::new(),
                api_url: config.api_url.clone(),
                cache,
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{path}", self.inner.api_url)
    }

    /// Turn a response into `T`, mapping non-success statuses to the
    /// backend's `{error}` body when it has one.
    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, BackendError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Self::api_error(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            BackendError::Parse(e)
        })
    }

    /// Check a response for success, discarding the body.
    async fn check(response: reqwest::Response) -> Result<(), BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await?;
        Err(Self::api_error(status.as_u16(), &body))
    }

    fn api_error(status: u16, body: &str) -> BackendError {
        let message = serde_json::from_str::<ApiErrorBody>(body).map_or_else(
            |_| format!("HTTP {status}"),
            |parsed| parsed.error,
        );
        BackendError::Api { status, message }
    }

    fn product_form(input: ProductInput) -> Result<multipart::Form, BackendError> {
        let mut form = multipart::Form::new()
            .text("name", input.name)
            .text("description", input.description)
            .text("price", input.price.to_string());

        if let Some(category) = input.category {
            form = form.text("category", String::from(category));
        }

        if let Some(image) = input.image {
            let mut part = multipart::Part::bytes(image.bytes).file_name(image.file_name);
            if let Some(content_type) = image.content_type {
                part = part.mime_str(&content_type)?;
            }
            form = form.part("image", part);
        }

        Ok(form)
    }

    // =========================================================================
    // Public Catalog
    // =========================================================================

    /// Get the publicly visible products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn published_products(&self) -> Result<Vec<Product>, BackendError> {
        // Check cache
        if let Some(CacheValue::Products(products)) =
            self.inner.cache.get(PUBLISHED_PRODUCTS_KEY).await
        {
            debug!("Cache hit for published products");
            return Ok(products);
        }

        let response = self
            .inner
            .client
            .get(self.url("products/published"))
            .send()
            .await?;

        let products: Vec<ApiProduct> = Self::decode(response).await?;
        let products: Vec<Product> = products.into_iter().map(Product::from).collect();

        self.inner
            .cache
            .insert(
                PUBLISHED_PRODUCTS_KEY.to_string(),
                CacheValue::Products(products.clone()),
            )
            .await;

        Ok(products)
    }

    // =========================================================================
    // Product CRUD (authenticated, not cached - mutable state)
    // =========================================================================

    /// Get the full product list, including unpublished products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn products(&self, token: &str) -> Result<Vec<Product>, BackendError> {
        let response = self
            .inner
            .client
            .get(self.url("products"))
            .bearer_auth(token)
            .send()
            .await?;

        let products: Vec<ApiProduct> = Self::decode(response).await?;
        Ok(products.into_iter().map(Product::from).collect())
    }

    /// Create a product (multipart, image included).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the backend rejects the
    /// payload.
    #[instrument(skip(self, token, input), fields(name = %input.name))]
    pub async fn create_product(
        &self,
        token: &str,
        input: ProductInput,
    ) -> Result<Product, BackendError> {
        let form = Self::product_form(input)?;

        let response = self
            .inner
            .client
            .post(self.url("products"))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;

        let product: ApiProduct = Self::decode(response).await?;
        self.invalidate_catalog().await;
        Ok(product.into())
    }

    /// Update a product (multipart, image optional).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the backend rejects the
    /// payload.
    #[instrument(skip(self, token, input), fields(product_id = %product_id))]
    pub async fn update_product(
        &self,
        token: &str,
        product_id: &ProductId,
        input: ProductInput,
    ) -> Result<Product, BackendError> {
        let form = Self::product_form(input)?;

        let response = self
            .inner
            .client
            .put(self.url(&format!("products/{product_id}")))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;

        let product: ApiProduct = Self::decode(response).await?;
        self.invalidate_catalog().await;
        Ok(product.into())
    }

    /// Toggle a product's published flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token), fields(product_id = %product_id, is_published))]
    pub async fn set_published(
        &self,
        token: &str,
        product_id: &ProductId,
        is_published: bool,
    ) -> Result<Product, BackendError> {
        let response = self
            .inner
            .client
            .put(self.url(&format!("products/{product_id}")))
            .bearer_auth(token)
            .json(&PublishBody { is_published })
            .send()
            .await?;

        let product: ApiProduct = Self::decode(response).await?;
        self.invalidate_catalog().await;
        Ok(product.into())
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn delete_product(
        &self,
        token: &str,
        product_id: &ProductId,
    ) -> Result<(), BackendError> {
        let response = self
            .inner
            .client
            .delete(self.url(&format!("products/{product_id}")))
            .bearer_auth(token)
            .send()
            .await?;

        Self::check(response).await?;
        self.invalidate_catalog().await;
        Ok(())
    }

    // =========================================================================
    // Category CRUD (authenticated)
    // =========================================================================

    /// Get the category list.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn categories(&self, token: &str) -> Result<Vec<CategoryRecord>, BackendError> {
        // Check cache
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(CATEGORIES_KEY).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let response = self
            .inner
            .client
            .get(self.url("categories"))
            .bearer_auth(token)
            .send()
            .await?;

        let categories: Vec<ApiCategory> = Self::decode(response).await?;
        let categories: Vec<CategoryRecord> =
            categories.into_iter().map(CategoryRecord::from).collect();

        self.inner
            .cache
            .insert(
                CATEGORIES_KEY.to_string(),
                CacheValue::Categories(categories.clone()),
            )
            .await;

        Ok(categories)
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the backend rejects the
    /// name.
    #[instrument(skip(self, token))]
    pub async fn create_category(
        &self,
        token: &str,
        name: &str,
    ) -> Result<CategoryRecord, BackendError> {
        let response = self
            .inner
            .client
            .post(self.url("categories"))
            .bearer_auth(token)
            .json(&NewCategoryBody { name })
            .send()
            .await?;

        let category: ApiCategory = Self::decode(response).await?;
        self.inner.cache.invalidate(CATEGORIES_KEY).await;
        Ok(category.into())
    }

    /// Delete a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token), fields(category_id = %category_id))]
    pub async fn delete_category(
        &self,
        token: &str,
        category_id: &CategoryId,
    ) -> Result<(), BackendError> {
        let response = self
            .inner
            .client
            .delete(self.url(&format!("categories/{category_id}")))
            .bearer_auth(token)
            .send()
            .await?;

        Self::check(response).await?;
        self.inner.cache.invalidate(CATEGORIES_KEY).await;
        Ok(())
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Log a vendor in, returning the issued bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the credentials are
    /// rejected.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<String, BackendError> {
        let response = self
            .inner
            .client
            .post(self.url("login"))
            .json(&Credentials { email, password })
            .send()
            .await?;

        let token: TokenResponse = Self::decode(response).await?;
        Ok(token.token)
    }

    /// Register a vendor account.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the backend rejects the
    /// registration.
    #[instrument(skip(self, password))]
    pub async fn register(&self, email: &str, password: &str) -> Result<(), BackendError> {
        let response = self
            .inner
            .client
            .post(self.url("register"))
            .json(&Credentials { email, password })
            .send()
            .await?;

        Self::check(response).await
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Invalidate the cached public catalog after a product mutation.
    async fn invalidate_catalog(&self) {
        self.inner.cache.invalidate(PUBLISHED_PRODUCTS_KEY).await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_client(api_url: &str) -> BackendClient {
        BackendClient::new(&EsoukConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            api_url: api_url.to_string(),
            sentry_dsn: None,
        })
    }

    #[test]
    fn test_url_joins_under_api_prefix() {
        let client = test_client("http://localhost:5001");
        assert_eq!(
            client.url("products/published"),
            "http://localhost:5001/api/products/published"
        );
        assert_eq!(client.url("login"), "http://localhost:5001/api/login");
    }

    #[test]
    fn test_api_error_prefers_error_body() {
        let err = BackendClient::api_error(400, r#"{"error":"Le prix doit être un nombre."}"#);
        match err {
            BackendError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Le prix doit être un nombre.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_api_error_falls_back_to_status() {
        let err = BackendClient::api_error(502, "<html>Bad Gateway</html>");
        match err {
            BackendError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "HTTP 502");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
