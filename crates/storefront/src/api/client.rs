//! Marketplace REST API client implementation.
//!
//! Uses `reqwest` 0.13 for HTTP. Caches the category list and per-category
//! product lists using `moka` (5-minute TTL).

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use pusatoleh_core::{AddressForm, CategoryId, ProductId};
use reqwest::{Method, RequestBuilder, StatusCode, multipart};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::ApiError;
use super::cache::{CacheKey, CacheValue};
use super::types::{
    AccessToken, CategoriesResponse, Category, CategoryProductsResponse, LoginRequest,
    LoginResponse, MessageResponse, Product, ProductList, RegisterRequest, RegisterSellerRequest,
    SellerTransactions, UserResponse,
};
use crate::config::ApiConfig;

/// How much of a failed response body is written to the logs.
const LOG_BODY_LIMIT: usize = 500;

/// An image to forward to `POST /user/image`.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the marketplace REST API.
///
/// Cheap to clone. Category reads are cached for 5 minutes; everything that
/// needs a bearer token goes straight to the API.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("pusatoleh-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        // `Url::join` replaces the last path segment unless the base ends in '/'
        let mut base_url = config.base_url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url,
                cache,
            }),
        })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self
            .inner
            .base_url
            .join(path.trim_start_matches('/'))?;
        Ok(self.inner.client.request(method, url))
    }

    fn authed(
        &self,
        method: Method,
        path: &str,
        token: &AccessToken,
    ) -> Result<RequestBuilder, ApiError> {
        Ok(self.request(method, path)?.bearer_auth(token.expose()))
    }

    /// Send a request and return the raw body of a successful response.
    async fn send(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %truncate(&body),
                "API returned non-success status"
            );
            return Err(ApiError::Status {
                status,
                message: error_message(&body),
            });
        }

        Ok(body)
    }

    /// Send a request and decode the JSON response.
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send(request).await?;

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %truncate(&body),
                "Failed to parse API response"
            );
            ApiError::Parse(e)
        })
    }

    // =========================================================================
    // Auth Methods
    // =========================================================================

    /// Log in with a username and password.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the request fails.
    #[instrument(skip(self, password))]
    pub async fn login(&self, name: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let request = self
            .request(Method::POST, "auth/login")?
            .json(&LoginRequest { name, password });

        // The login endpoint answers bad credentials with 401; that is a
        // form error here, not an expired session.
        match self.execute(request).await {
            Err(ApiError::Unauthorized) => Err(ApiError::Status {
                status: StatusCode::UNAUTHORIZED,
                message: "Nama atau password salah".to_string(),
            }),
            other => other,
        }
    }

    /// Register a buyer account.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the registration.
    #[instrument(skip(self, body), fields(name = %body.name))]
    pub async fn register(&self, body: &RegisterRequest<'_>) -> Result<MessageResponse, ApiError> {
        let request = self.request(Method::POST, "auth/register")?.json(body);
        self.execute(request).await
    }

    /// Register a seller account with its shop.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the registration.
    #[instrument(skip(self, body), fields(name = %body.name, shop = %body.shop_name))]
    pub async fn register_seller(
        &self,
        body: &RegisterSellerRequest<'_>,
    ) -> Result<MessageResponse, ApiError> {
        let request = self.request(Method::POST, "auth/register-seller")?.json(body);
        self.execute(request).await
    }

    // =========================================================================
    // User Methods
    // =========================================================================

    /// Get the logged-in user's profile, images and addresses.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] if the token is rejected.
    #[instrument(skip(self, token))]
    pub async fn current_user(&self, token: &AccessToken) -> Result<UserResponse, ApiError> {
        let request = self.authed(Method::GET, "user", token)?;
        self.execute(request).await
    }

    /// Add a shipping address for the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the address.
    #[instrument(skip(self, token, address))]
    pub async fn save_address(
        &self,
        token: &AccessToken,
        address: &AddressForm,
    ) -> Result<(), ApiError> {
        let request = self
            .authed(Method::POST, "user/address", token)?
            .json(address);
        self.send(request).await?;
        Ok(())
    }

    /// Upload a profile image as multipart field `image`.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be built or the API rejects it.
    #[instrument(skip(self, token, upload), fields(file = %upload.file_name, size = upload.bytes.len()))]
    pub async fn upload_profile_image(
        &self,
        token: &AccessToken,
        upload: ImageUpload,
    ) -> Result<(), ApiError> {
        let part = multipart::Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.content_type)
            .map_err(|e| ApiError::Multipart(e.to_string()))?;
        let form = multipart::Form::new().part("image", part);

        let request = self
            .authed(Method::POST, "user/image", token)?
            .multipart(form);
        self.send(request).await?;
        Ok(())
    }

    // =========================================================================
    // Catalog Methods
    // =========================================================================

    /// Get all categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let response: CategoriesResponse =
            self.execute(self.request(Method::GET, "category")?).await?;

        self.inner
            .cache
            .insert(
                CacheKey::Categories,
                CacheValue::Categories(response.categories.clone()),
            )
            .await;

        Ok(response.categories)
    }

    /// Get the products in a category, in API order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(category = %id))]
    pub async fn category_products(&self, id: &CategoryId) -> Result<Vec<Product>, ApiError> {
        let cache_key = CacheKey::CategoryProducts(id.clone());

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for category products");
            return Ok(products);
        }

        let path = format!("category/{}", path_segment(id.as_str())?);
        let response: CategoryProductsResponse =
            self.execute(self.request(Method::GET, &path)?).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(response.products.clone()))
            .await;

        Ok(response.products)
    }

    /// Drop all cached catalog reads.
    pub fn invalidate_catalog(&self) {
        self.inner.cache.invalidate_all();
    }

    // =========================================================================
    // Seller Methods
    // =========================================================================

    /// Get the logged-in seller's products.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] if the token is rejected.
    #[instrument(skip(self, token))]
    pub async fn seller_products(&self, token: &AccessToken) -> Result<Vec<Product>, ApiError> {
        let request = self.authed(Method::GET, "product/list", token)?;
        let ProductList(products) = self.execute(request).await?;
        Ok(products)
    }

    /// Activate or deactivate a product.
    ///
    /// Cached category listings are dropped so the change shows up on the
    /// landing page immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the change.
    #[instrument(skip(self, token), fields(product = %id))]
    pub async fn set_product_active(
        &self,
        token: &AccessToken,
        id: &ProductId,
        active: bool,
    ) -> Result<(), ApiError> {
        let action = if active { "activate" } else { "deactivate" };
        let path = format!("product/{action}/{}", path_segment(id.as_str())?);

        let request = self
            .authed(Method::PUT, &path, token)?
            .json(&serde_json::json!({}));
        self.send(request).await?;

        self.invalidate_catalog();
        Ok(())
    }

    /// Get the statuses of the seller's transactions.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] if the token is rejected.
    #[instrument(skip(self, token))]
    pub async fn seller_transactions(
        &self,
        token: &AccessToken,
    ) -> Result<SellerTransactions, ApiError> {
        let request = self.authed(Method::GET, "transaction/seller", token)?;
        self.execute(request).await
    }
}

/// Percent-encode an ID for use as one path segment.
///
/// `.` survives encoding, so `.` and `..` would be resolved against the base
/// URL and hit a different endpoint.
fn path_segment(id: &str) -> Result<Cow<'_, str>, ApiError> {
    if id.chars().all(|c| c == '.') {
        return Err(ApiError::InvalidId(id.to_string()));
    }
    Ok(urlencoding::encode(id))
}

/// Pull `message` (or `error`) out of an error body, falling back to the
/// truncated body text.
fn error_message(body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        message: Option<String>,
        error: Option<String>,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            message: Some(message),
            ..
        }
        | ErrorBody {
            message: None,
            error: Some(message),
        }) => message,
        _ => body.chars().take(200).collect(),
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(LOG_BODY_LIMIT).collect()
}
