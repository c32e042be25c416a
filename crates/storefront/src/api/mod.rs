//! Client for the PusatOlehOleh marketplace REST API.
//!
//! # Architecture
//!
//! - The remote API is the source of truth; nothing is stored locally
//! - Public catalog reads (categories, category products) are cached via
//!   `moka` for 5 minutes
//! - User-specific calls carry the session's bearer token and are never cached
//!
//! # Example
//!
//! ```rust,ignore
//! use pusatoleh_storefront::api::ApiClient;
//!
//! let client = ApiClient::new(&config.api)?;
//!
//! let categories = client.categories().await?;
//! let session = client.login("budi", "rahasia").await?;
//! let products = client.seller_products(&session.token).await?;
//! ```

mod cache;
mod client;
pub mod types;

pub use client::{ApiClient, ImageUpload};
pub use types::*;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to the remote API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    /// The bearer token was missing, expired or rejected.
    #[error("Unauthorized")]
    Unauthorized,

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A multipart body could not be built.
    #[error("Multipart error: {0}")]
    Multipart(String),

    /// An ID that cannot be used as a path segment (empty or only dots).
    #[error("Invalid ID: {0:?}")]
    InvalidId(String),

    /// An endpoint URL could not be built from the base URL.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// Message suitable for showing to the user in a toast.
    ///
    /// Messages returned by the API are passed through; transport and
    /// decoding failures get a generic message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } if !message.is_empty() => message.clone(),
            Self::Status { status, .. } => format!("Request failed ({status})"),
            Self::Unauthorized => "Sesi berakhir, silakan login kembali".to_string(),
            Self::Http(e) if e.is_timeout() => "Server tidak merespons".to_string(),
            Self::Http(_) | Self::Url(_) => "Gagal menghubungi server".to_string(),
            Self::InvalidId(_) => "Data tidak ditemukan".to_string(),
            Self::Parse(_) | Self::Multipart(_) => "Terjadi kesalahan".to_string(),
        }
    }

    /// Whether the error means the session must be discarded.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}
