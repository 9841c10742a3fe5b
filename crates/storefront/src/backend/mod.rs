//! Client for the hosted backend-as-a-service.
//!
//! # Architecture
//!
//! - Table access goes through the PostgREST data API (`/rest/v1`)
//! - Sign-in and sign-up go through the auth API (`/auth/v1`)
//! - Catalog reads are cached in memory via `moka` (5 minute TTL)
//! - Row level security on the backend decides what a caller may see;
//!   the client only attaches the public key and, once signed in, the
//!   caller's access token
//!
//! # Example
//!
//! ```rust,ignore
//! use mamiejago_storefront::backend::{BackendClient, Query};
//! use mamiejago_storefront::catalog::CatalogProvider;
//!
//! let client = BackendClient::new(&config.backend);
//! let products = client.list_products().await?;
//!
//! let pending: Vec<Review> = client
//!     .select(&Query::table("reviews").eq("is_approved", false))
//!     .await?;
//! ```

mod cache;
mod catalog;
mod query;

pub use query::{Query, parse_content_range_total};

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::config::BackendConfig;

use cache::{CacheKey, CacheValue};

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The key or access token was rejected.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A request URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl BackendError {
    /// HTTP status of a rejected request, if there was one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Unauthorized(_) => Some(401),
            Self::RateLimited(_) => Some(429),
            _ => None,
        }
    }
}

// =============================================================================
// BackendClient
// =============================================================================

/// Client for the backend data and auth APIs.
///
/// Cheap to clone; clones share the HTTP connection pool and the catalog
/// cache.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    rest_url: String,
    auth_url: String,
    anon_key: SecretString,
    access_token: Option<SecretString>,
    cache: Cache<CacheKey, CacheValue>,
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("rest_url", &self.inner.rest_url)
            .field("signed_in", &self.inner.access_token.is_some())
            .finish_non_exhaustive()
    }
}

impl BackendClient {
    /// Create a new client using the public key.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        let base = config.base_url();

        Self {
            inner: Arc::new(BackendClientInner {
                client: reqwest::Client::new(),
                rest_url: format!("{base}/rest/v1"),
                auth_url: format!("{base}/auth/v1"),
                anon_key: config.anon_key.clone(),
                access_token: None,
                cache,
            }),
        }
    }

    /// A client that acts as a signed-in user.
    ///
    /// Shares the connection pool and catalog cache with `self`.
    #[must_use]
    pub fn with_access_token(&self, token: SecretString) -> Self {
        Self {
            inner: Arc::new(BackendClientInner {
                client: self.inner.client.clone(),
                rest_url: self.inner.rest_url.clone(),
                auth_url: self.inner.auth_url.clone(),
                anon_key: self.inner.anon_key.clone(),
                access_token: Some(token),
                cache: self.inner.cache.clone(),
            }),
        }
    }

    /// Whether requests carry a user access token.
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.inner.access_token.is_some()
    }

    /// Attach the public key and the bearer token.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let bearer = self
            .inner
            .access_token
            .as_ref()
            .unwrap_or(&self.inner.anon_key)
            .expose_secret();

        request
            .header("apikey", self.inner.anon_key.expose_secret())
            .header("Authorization", format!("Bearer {bearer}"))
    }

    fn rest_endpoint(&self, query: &Query) -> Result<Url, BackendError> {
        let mut url = Url::parse(&format!("{}/{}", self.inner.rest_url, query.table_name()))?;
        if !query.params().is_empty() {
            url.query_pairs_mut().extend_pairs(query.params());
        }
        Ok(url)
    }

    pub(crate) fn auth_endpoint(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Url, BackendError> {
        let mut url = Url::parse(&format!("{}/{path}", self.inner.auth_url))?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        Ok(url)
    }

    /// Send a request and turn error statuses into [`BackendError`]s.
    async fn send(&self, request: RequestBuilder) -> Result<Response, BackendError> {
        let response = self.authorize(request).send().await?;
        let status = response.status();

        // Check for rate limiting
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(BackendError::RateLimited(retry_after));
        }

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let excerpt: String = body.chars().take(500).collect();

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(body = %excerpt, "Backend rejected credentials");
            return Err(BackendError::Unauthorized(excerpt));
        }

        tracing::error!(
            status = %status,
            body = %excerpt,
            "Backend returned non-success status"
        );
        Err(BackendError::Status {
            status: status.as_u16(),
            body: excerpt,
        })
    }

    /// Read a JSON body, logging what could not be parsed.
    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %text.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            BackendError::Parse(e)
        })
    }

    // =========================================================================
    // Table Methods
    // =========================================================================

    /// Rows matching `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the rows don't match `T`.
    #[instrument(skip(self, query), fields(table = %query.table_name()))]
    pub async fn select<T: DeserializeOwned>(&self, query: &Query) -> Result<Vec<T>, BackendError> {
        let url = self.rest_endpoint(query)?;
        let response = self.send(self.inner.client.get(url)).await?;
        Self::read_json(response).await
    }

    /// The first row matching `query`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the row doesn't match `T`.
    pub async fn select_one<T: DeserializeOwned>(
        &self,
        query: Query,
    ) -> Result<Option<T>, BackendError> {
        let rows = self.select::<T>(&query.limit(1)).await?;
        Ok(rows.into_iter().next())
    }

    /// Insert one row, or many when `body` is a slice, and return them.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    #[instrument(skip(self, body))]
    pub async fn insert<B, T>(&self, table: &str, body: &B) -> Result<Vec<T>, BackendError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.rest_endpoint(&Query::table(table))?;
        let request = self
            .inner
            .client
            .post(url)
            .header("Prefer", "return=representation")
            .json(body);
        let response = self.send(request).await?;
        Self::read_json(response).await
    }

    /// Patch the rows matching `query` and return them.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    #[instrument(skip(self, query, body), fields(table = %query.table_name()))]
    pub async fn update<B, T>(&self, query: &Query, body: &B) -> Result<Vec<T>, BackendError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.rest_endpoint(query)?;
        let request = self
            .inner
            .client
            .patch(url)
            .header("Prefer", "return=representation")
            .json(body);
        let response = self.send(request).await?;
        Self::read_json(response).await
    }

    /// Delete the rows matching `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    #[instrument(skip(self, query), fields(table = %query.table_name()))]
    pub async fn delete(&self, query: &Query) -> Result<(), BackendError> {
        let url = self.rest_endpoint(query)?;
        self.send(self.inner.client.delete(url)).await?;
        Ok(())
    }

    /// Number of rows matching `query`, without fetching them.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the count header is missing.
    #[instrument(skip(self, query), fields(table = %query.table_name()))]
    pub async fn count(&self, query: &Query) -> Result<u64, BackendError> {
        let url = self.rest_endpoint(query)?;
        let request = self
            .inner
            .client
            .request(Method::HEAD, url)
            .header("Prefer", "count=exact");
        let response = self.send(request).await?;

        response
            .headers()
            .get("Content-Range")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range_total)
            .ok_or_else(|| BackendError::NotFound("Content-Range count".to_string()))
    }

    // =========================================================================
    // Auth Methods
    // =========================================================================

    /// POST to the auth API and parse the answer.
    pub(crate) async fn auth_post<B, T>(
        &self,
        path: &str,
        params: &[(&str, &str)],
        body: &B,
    ) -> Result<T, BackendError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.auth_endpoint(path, params)?;
        let response = self.send(self.inner.client.post(url).json(body)).await?;
        Self::read_json(response).await
    }

    /// POST to the auth API ignoring the body of the answer.
    pub(crate) async fn auth_post_empty(&self, path: &str) -> Result<(), BackendError> {
        let url = self.auth_endpoint(path, &[])?;
        self.send(self.inner.client.post(url)).await?;
        Ok(())
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    async fn cached(&self, key: &CacheKey) -> Option<CacheValue> {
        let value = self.inner.cache.get(key).await;
        if value.is_some() {
            debug!(key = ?key, "Cache hit");
        }
        value
    }

    async fn store(&self, key: CacheKey, value: CacheValue) {
        self.inner.cache.insert(key, value).await;
    }

    /// Drop every cached catalog read. Call after changing products,
    /// variants or banners.
    pub async fn invalidate_catalog(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client() -> BackendClient {
        BackendClient::new(&BackendConfig {
            url: Url::parse("https://abcd.supabase.co/").unwrap(),
            anon_key: SecretString::from("eyJhbGciOiJIUzI1NiJ9.aB3xY9mK2nL5pQ7rT0uW4zC6"),
        })
    }

    #[test]
    fn test_rest_endpoint_encodes_filters() {
        let url = client()
            .rest_endpoint(
                &Query::table("products")
                    .select("*")
                    .eq("category", "Mie")
                    .order("created_at", false),
            )
            .unwrap();

        assert_eq!(
            url.as_str(),
            "https://abcd.supabase.co/rest/v1/products?select=*&category=eq.Mie&order=created_at.desc"
        );
    }

    #[test]
    fn test_rest_endpoint_without_params() {
        let url = client().rest_endpoint(&Query::table("banners")).unwrap();
        assert_eq!(url.as_str(), "https://abcd.supabase.co/rest/v1/banners");
    }

    #[test]
    fn test_auth_endpoint() {
        let url = client()
            .auth_endpoint("token", &[("grant_type", "password")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://abcd.supabase.co/auth/v1/token?grant_type=password"
        );
    }

    #[test]
    fn test_with_access_token() {
        let anon = client();
        assert!(!anon.is_signed_in());

        let user = anon.with_access_token(SecretString::from("user-token"));
        assert!(user.is_signed_in());
        assert!(!format!("{user:?}").contains("user-token"));
    }

    #[tokio::test]
    async fn test_catalog_cache_shared_and_invalidated() {
        use crate::catalog::CatalogProvider;
        use mamiejago_core::ProductId;

        let anon = client();
        let id = ProductId::new("p1");
        anon.store(
            CacheKey::Variants(id.clone()),
            CacheValue::Variants(vec!["Original".to_string()]),
        )
        .await;

        // Served from cache, no request made
        let user = anon.with_access_token(SecretString::from("user-token"));
        assert_eq!(user.list_variants(&id).await.unwrap(), ["Original"]);

        anon.invalidate_catalog().await;
        assert!(user.cached(&CacheKey::Variants(id)).await.is_none());
    }

    #[test]
    fn test_error_status() {
        let err = BackendError::Status {
            status: 409,
            body: "duplicate key".to_string(),
        };
        assert_eq!(err.status(), Some(409));
        assert_eq!(err.to_string(), "Backend returned 409: duplicate key");
        assert_eq!(BackendError::RateLimited(3).status(), Some(429));
        assert_eq!(BackendError::NotFound("x".to_string()).status(), None);
    }
}
