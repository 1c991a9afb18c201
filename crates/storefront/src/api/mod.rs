//! Client for the remote catalog and auth REST API.
//!
//! The backend exposes a small JSON API (categories, paginated products,
//! credential auth). Every call reads the status first, drains the body to
//! text, and only then parses, so malformed responses leave a usable
//! diagnostic in the logs instead of an opaque decode error.

pub mod fallback;
pub mod types;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;

use bazaar_core::{CategoryId, ProductId};

use crate::config::StorefrontConfig;
use types::{
    CategoriesEnvelope, Category, Credentials, Product, ProductListEnvelope, ProductPage,
    RegisterRequest, SingleProductEnvelope,
};

/// How much response body to keep in error diagnostics.
const BODY_SNIPPET_LEN: usize = 500;

/// Errors that can occur when talking to the remote API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, etc.).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint URL could not be constructed.
    #[error("invalid endpoint path: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    /// Server answered with a non-success status.
    #[error("server returned {status}: {detail}")]
    Status {
        status: reqwest::StatusCode,
        detail: String,
    },

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Response parsed but did not have the expected envelope shape.
    #[error("unexpected response shape: {0}")]
    UnexpectedResponse(String),
}

/// Client for the storefront's remote API.
///
/// Cheaply cloneable; all clones share one connection pool. There is no
/// response caching: list views re-fetch pages on every visit by design.
#[derive(Clone)]
pub struct StorefrontApi {
    inner: Arc<StorefrontApiInner>,
}

struct StorefrontApiInner {
    client: reqwest::Client,
    base_url: url::Url,
}

impl StorefrontApi {
    /// Create a new API client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &StorefrontConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(StorefrontApiInner {
                client,
                base_url: config.api_base_url.clone(),
            }),
        })
    }

    fn endpoint(&self, path: &str) -> Result<url::Url, ApiError> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// Send a prepared request and decode the JSON body.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        // Read the body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %snippet(&body),
                "API returned non-success status"
            );
            return Err(ApiError::Status {
                status,
                detail: snippet(&body),
            });
        }

        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %snippet(&body),
                    "Failed to parse API response"
                );
                Err(ApiError::Parse(e))
            }
        }
    }

    // =========================================================================
    // Catalog Endpoints
    // =========================================================================

    /// Get the full category listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope is malformed.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        let url = self.endpoint("categories")?;
        let envelope: CategoriesEnvelope = self.execute(self.inner.client.get(url)).await?;

        envelope.categories.ok_or_else(|| {
            ApiError::UnexpectedResponse("category listing is missing `categories`".to_owned())
        })
    }

    /// Get one page of the flat product listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope is malformed.
    #[instrument(skip(self))]
    pub async fn products(&self, page: u32, limit: u32) -> Result<ProductPage, ApiError> {
        let url = self.endpoint("products")?;
        let request = self
            .inner
            .client
            .get(url)
            .query(&[("page", page), ("limit", limit)]);

        let envelope: ProductListEnvelope = self.execute(request).await?;
        into_product_page(envelope)
    }

    /// Get one page of products belonging to a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope is malformed.
    #[instrument(skip(self))]
    pub async fn products_by_category(
        &self,
        category: &CategoryId,
        page: u32,
        limit: u32,
    ) -> Result<ProductPage, ApiError> {
        let url = self.endpoint("products")?;
        let request = self.inner.client.get(url).query(&[
            ("category", category.as_str().to_owned()),
            ("page", page.to_string()),
            ("limit", limit.to_string()),
        ]);

        let envelope: ProductListEnvelope = self.execute(request).await?;
        into_product_page(envelope)
    }

    /// Get a single product by id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the envelope carries no product.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn product(&self, product_id: &ProductId) -> Result<Product, ApiError> {
        let url = self.endpoint(&format!("products/{product_id}"))?;
        let envelope: SingleProductEnvelope = self.execute(self.inner.client.get(url)).await?;

        envelope
            .data
            .ok_or_else(|| ApiError::NotFound(format!("product not found: {product_id}")))
    }

    // =========================================================================
    // Auth Endpoints
    // =========================================================================

    /// Submit login credentials.
    ///
    /// The response shape varies between backend versions, so the raw JSON
    /// value is returned for the auth service to pick fields out of.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not JSON.
    #[instrument(skip_all)]
    pub async fn login(&self, credentials: &Credentials) -> Result<serde_json::Value, ApiError> {
        let url = self.endpoint("auth/login")?;
        self.execute(self.inner.client.post(url).json(credentials))
            .await
    }

    /// Submit a registration payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not JSON.
    #[instrument(skip_all)]
    pub async fn register(&self, request: &RegisterRequest) -> Result<serde_json::Value, ApiError> {
        let url = self.endpoint("auth/register")?;
        self.execute(self.inner.client.post(url).json(request))
            .await
    }

    /// Fetch the logged-in user's profile with bearer authorization.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not JSON.
    #[instrument(skip_all)]
    pub async fn current_user(&self, token: &str) -> Result<serde_json::Value, ApiError> {
        let url = self.endpoint("auth/me")?;
        self.execute(self.inner.client.get(url).bearer_auth(token))
            .await
    }
}

/// Validate a product listing envelope and convert it to a page.
fn into_product_page(envelope: ProductListEnvelope) -> Result<ProductPage, ApiError> {
    if !envelope.success {
        return Err(ApiError::UnexpectedResponse(
            "product listing did not report success".to_owned(),
        ));
    }
    let Some(products) = envelope.data else {
        return Err(ApiError::UnexpectedResponse(
            "product listing is missing `data`".to_owned(),
        ));
    };

    Ok(ProductPage {
        products,
        total: envelope.total,
        page: envelope.page,
        pages: envelope.pages,
    })
}

fn snippet(body: &str) -> String {
    body.chars().take(BODY_SNIPPET_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_product_page_accepts_valid_envelope() {
        let envelope: ProductListEnvelope = serde_json::from_str(
            r#"{
                "success": true,
                "total": 42,
                "page": 2,
                "pages": 3,
                "count": 18,
                "data": []
            }"#,
        )
        .expect("valid envelope");

        let page = into_product_page(envelope).expect("valid page");
        assert_eq!(page.total, 42);
        assert_eq!(page.page, 2);
        assert_eq!(page.pages, 3);
    }

    #[test]
    fn test_into_product_page_rejects_unsuccessful_envelope() {
        let envelope: ProductListEnvelope =
            serde_json::from_str(r#"{"success": false, "data": []}"#).expect("tolerant parse");
        assert!(matches!(
            into_product_page(envelope),
            Err(ApiError::UnexpectedResponse(_))
        ));
    }

    #[test]
    fn test_into_product_page_rejects_missing_data() {
        let envelope: ProductListEnvelope =
            serde_json::from_str(r#"{"success": true}"#).expect("tolerant parse");
        assert!(matches!(
            into_product_page(envelope),
            Err(ApiError::UnexpectedResponse(_))
        ));
    }

    #[test]
    fn test_snippet_truncates_long_bodies() {
        let body = "x".repeat(2000);
        assert_eq!(snippet(&body).len(), BODY_SNIPPET_LEN);
    }
}
