//! Wire types for the marketplace REST API.
//!
//! The API uses Mongo-style `_id` identifiers and camelCase field names. Many
//! fields are optional or sent as `null`. Lists are decoded element by
//! element so that one malformed product does not hide a whole category.

use core::fmt;

use chrono::{DateTime, Utc};
use pusatoleh_core::catalog::CatalogItem;
use pusatoleh_core::{
    AddressForm, CategoryId, Discount, ProductId, Role, Rupiah, ShopId, TransactionStatus, UserId,
};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Treat an explicit `null` the same as a missing field.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decode a list one entry at a time, skipping entries that do not parse.
///
/// `null` decodes as an empty list.
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let entries = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(entries
        .into_iter()
        .filter_map(|entry| {
            let id = entry.get("_id").and_then(Value::as_str).map(str::to_owned);
            serde_json::from_value(entry)
                .map_err(|e| tracing::warn!(error = %e, id = ?id, "Skipping malformed entry"))
                .ok()
        })
        .collect())
}

// =============================================================================
// Catalog
// =============================================================================

/// A reference that the API sends either as a bare ID or as the populated
/// document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ref<T> {
    Embedded(T),
    Id(String),
}

impl<T> Ref<T> {
    /// The populated document, if the API embedded it.
    #[must_use]
    pub const fn embedded(&self) -> Option<&T> {
        match self {
            Self::Embedded(value) => Some(value),
            Self::Id(_) => None,
        }
    }
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: CategoryId,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
}

/// Shop address as embedded in products.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopAddress {
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

/// A shop as embedded in products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shop {
    #[serde(rename = "_id")]
    pub id: ShopId,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default)]
    pub address: Option<ShopAddress>,
}

/// An uploaded image location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    #[serde(default)]
    pub url: Option<String>,
}

/// A product as returned by `/category/:id` and `/product/list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default)]
    pub price: Option<Rupiah>,
    #[serde(default)]
    pub original_price: Option<Rupiah>,
    /// Signed: the API reports oversold products with a negative stock.
    #[serde(default, deserialize_with = "null_default")]
    pub stock: i64,
    #[serde(default)]
    pub discount: Option<Discount>,
    #[serde(default, deserialize_with = "null_default")]
    pub is_new: bool,
    #[serde(default)]
    pub cover: Option<Media>,
    #[serde(default)]
    pub category_id: Option<Ref<Category>>,
    #[serde(default)]
    pub shop_id: Option<Ref<Shop>>,
    #[serde(default, deserialize_with = "null_default")]
    pub is_active: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    /// Listing thumbnail used by the seller table.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Populated category, if embedded.
    #[must_use]
    pub fn category(&self) -> Option<&Category> {
        self.category_id.as_ref().and_then(Ref::embedded)
    }

    /// Populated shop, if embedded.
    #[must_use]
    pub fn shop(&self) -> Option<&Shop> {
        self.shop_id.as_ref().and_then(Ref::embedded)
    }

    /// Raw cover location as stored by the API.
    #[must_use]
    pub fn cover_url(&self) -> Option<&str> {
        self.cover.as_ref().and_then(|c| c.url.as_deref())
    }
}

impl CatalogItem for Product {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn price(&self) -> Rupiah {
        self.price.unwrap_or(Rupiah::ZERO)
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

/// `GET /category`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoriesResponse {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub categories: Vec<Category>,
}

/// `GET /category/:id`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryProductsResponse {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub products: Vec<Product>,
}

/// `GET /product/list`, a bare array of products.
#[derive(Debug, Clone, Default)]
pub struct ProductList(pub Vec<Product>);

impl<'de> Deserialize<'de> for ProductList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        lenient_vec(deserializer).map(Self)
    }
}

// =============================================================================
// Auth
// =============================================================================

/// `POST /auth/login` body.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub name: &'a str,
    pub password: &'a str,
}

/// The user summary returned on login.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    #[serde(rename = "_id")]
    pub id: UserId,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default)]
    pub role: Role,
}

/// Bearer token issued by `POST /auth/login`.
///
/// Redacted in `Debug` output. It is only ever stored server-side in the
/// session, which is why it serializes as a plain string.
#[derive(Clone)]
pub struct AccessToken(SecretString);

impl AccessToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// The raw token for the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

impl Serialize for AccessToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.expose())
    }
}

impl<'de> Deserialize<'de> for AccessToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

/// `POST /auth/login` response.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: AccessToken,
    pub user: AuthUser,
}

/// `POST /auth/register` body.
#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// `POST /auth/register-seller` body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterSellerRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub shop_name: &'a str,
}

/// Generic `{ message }` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

// =============================================================================
// User
// =============================================================================

/// The logged-in user's profile.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: UserId,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Role,
}

/// A saved shipping address.
#[derive(Debug, Clone, Deserialize)]
pub struct UserAddress {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(flatten)]
    pub fields: AddressForm,
}

/// `GET /user`
#[derive(Debug, Clone, Deserialize)]
pub struct UserResponse {
    pub user: UserProfile,
    #[serde(default, deserialize_with = "null_default")]
    pub image: Vec<Media>,
    #[serde(default, deserialize_with = "null_default")]
    pub address: Vec<UserAddress>,
}

impl UserResponse {
    /// The first uploaded profile image, if any.
    #[must_use]
    pub fn profile_image(&self) -> Option<&str> {
        self.image.first().and_then(|m| m.url.as_deref())
    }
}

// =============================================================================
// Transactions
// =============================================================================

/// A transaction status entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionStatusEntry {
    pub status: TransactionStatus,
}

/// `GET /transaction/seller`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerTransactions {
    #[serde(default, deserialize_with = "null_default")]
    pub transaction_statuses: Vec<TransactionStatusEntry>,
}

impl SellerTransactions {
    /// Iterate over the statuses only.
    pub fn statuses(&self) -> impl Iterator<Item = &TransactionStatus> {
        self.transaction_statuses.iter().map(|t| &t.status)
    }
}
