//! Landing page route handler.
//!
//! Shows category pills and a product grid. The default "Semua" view mixes
//! products from the featured categories; picking a pill shows that one
//! category in API order.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use pusatoleh_core::CategoryId;
use pusatoleh_core::media::normalize_media_url;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use tokio::task::JoinSet;
use tracing::instrument;
use url::Url;

use crate::api::{ApiClient, Category, Product};
use crate::error::AppError;
use crate::filters;
use crate::middleware::Layout;
use crate::state::AppState;

/// Most products shown under "Semua".
pub const FEATURED_LIMIT: usize = 12;

/// Stock at or below this shows the "Stok Terbatas" badge.
pub const LOW_STOCK_THRESHOLD: i64 = 5;

/// Query parameters for the landing page.
#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    pub category: Option<String>,
}

// =============================================================================
// View Types
// =============================================================================

/// A category filter pill.
#[derive(Clone)]
pub struct CategoryPill {
    pub name: String,
    pub href: String,
    pub active: bool,
}

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub name: String,
    pub cover_url: Option<String>,
    pub discount_badge: Option<String>,
    pub is_new: bool,
    pub low_stock: bool,
    pub category_name: Option<String>,
    pub stock: i64,
    pub shop_name: Option<String>,
    pub shop_location: String,
    pub description: Option<String>,
    pub price: String,
    pub original_price: Option<String>,
}

impl ProductCardView {
    /// Build a card, re-basing the cover image onto the CDN.
    #[must_use]
    pub fn from_product(product: &Product, cdn_base: &Url) -> Self {
        let shop = product.shop();
        Self {
            name: product.name.clone(),
            cover_url: normalize_media_url(product.cover_url(), cdn_base),
            discount_badge: product.discount.and_then(|d| d.badge()),
            is_new: product.is_new,
            low_stock: product.stock <= LOW_STOCK_THRESHOLD,
            category_name: product.category().map(|c| c.name.clone()),
            stock: product.stock,
            shop_name: shop.map(|s| s.name.clone()),
            shop_location: shop
                .and_then(|s| s.address.as_ref())
                .and_then(|a| a.province.clone())
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| "Alamat tidak tersedia".to_string()),
            description: product.description.clone().filter(|d| !d.trim().is_empty()),
            price: product
                .price
                .filter(|p| !p.is_zero())
                .map_or_else(|| "N/A".to_string(), |p| p.to_string()),
            original_price: product
                .original_price
                .filter(|p| !p.is_zero())
                .map(|p| p.to_string()),
        }
    }
}

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub pills: Vec<CategoryPill>,
    pub heading: String,
    pub products: Vec<ProductCardView>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the landing page.
#[instrument(skip(state, layout))]
pub async fn home(
    State(state): State<AppState>,
    layout: Layout,
    Query(query): Query<HomeQuery>,
) -> impl IntoResponse {
    let selected = query
        .category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .map(CategoryId::new);

    let categories = state.api().categories().await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to load categories");
        Vec::new()
    });

    let products = match &selected {
        Some(id) => state
            .api()
            .category_products(id)
            .await
            .map_err(AppError::from),
        None => featured_products(state.api(), &state.config().featured_categories)
            .await
            .map(|products| sample_featured(products, &mut rand::rng())),
    }
    .unwrap_or_else(|e| {
        tracing::error!(error = %e, category = ?selected, "Failed to load products");
        Vec::new()
    });

    let cdn = &state.config().cdn_base_url;
    let heading = heading(&categories, selected.as_ref());

    HomeTemplate {
        layout,
        pills: category_pills(&categories, selected.as_ref()),
        heading,
        products: products
            .iter()
            .map(|p| ProductCardView::from_product(p, cdn))
            .collect(),
    }
}

/// "Semua" followed by one pill per category.
fn category_pills(categories: &[Category], selected: Option<&CategoryId>) -> Vec<CategoryPill> {
    std::iter::once(CategoryPill {
        name: "Semua".to_string(),
        href: "/".to_string(),
        active: selected.is_none(),
    })
    .chain(categories.iter().map(|c| CategoryPill {
        name: c.name.clone(),
        href: format!("/?category={}", urlencoding::encode(c.id.as_str())),
        active: selected == Some(&c.id),
    }))
    .collect()
}

/// Grid heading: the selected category's name, or its raw id when the
/// category list does not know it.
fn heading(categories: &[Category], selected: Option<&CategoryId>) -> String {
    match selected {
        None => "Semua".to_string(),
        Some(id) => categories
            .iter()
            .find(|c| &c.id == id)
            .map_or_else(|| id.to_string(), |c| c.name.clone()),
    }
}

/// Fetch every featured category concurrently and flatten the results.
///
/// Any failed category fails the whole aggregation.
async fn featured_products(
    api: &ApiClient,
    ids: &[CategoryId],
) -> Result<Vec<Product>, AppError> {
    let mut tasks = JoinSet::new();
    for id in ids {
        let api = api.clone();
        let id = id.clone();
        tasks.spawn(async move { api.category_products(&id).await });
    }

    let mut products = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let batch = joined.map_err(|e| AppError::Internal(format!("category fetch task: {e}")))??;
        products.extend(batch);
    }
    Ok(products)
}

/// Shuffle uniformly and keep at most [`FEATURED_LIMIT`] products.
fn sample_featured<R: Rng + ?Sized>(mut products: Vec<Product>, rng: &mut R) -> Vec<Product> {
    products.shuffle(rng);
    products.truncate(FEATURED_LIMIT);
    products
}
