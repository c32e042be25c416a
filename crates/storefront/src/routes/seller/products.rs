//! Seller "Data Produk" page: listing, status toggle, and bulk status changes.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
};
use pusatoleh_core::ProductId;
use pusatoleh_core::catalog::{ProductQuery, ProductSort, ProductTab, Selection};
use pusatoleh_core::media::normalize_media_url;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use url::Url;

use super::{NavItem, sidebar};
use crate::api::{ApiError, Product};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{FlashKind, Layout, RequireSeller, flash};
use crate::state::AppState;

const LISTING_PATH: &str = "/dashboard/seller/products";

/// Raw listing parameters; unknown or blank values fall back to defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ListingParams {
    pub tab: Option<String>,
    pub q: Option<String>,
    pub sort: Option<String>,
}

impl ListingParams {
    fn query(&self) -> ProductQuery {
        ProductQuery::from_params(self.tab.as_deref(), self.q.as_deref(), self.sort.as_deref())
    }
}

/// Status toggle form.
#[derive(Debug, Deserialize)]
pub struct ToggleForm {
    /// The product's current state, as shown on the switch.
    pub active: String,
    #[serde(flatten)]
    pub listing: ListingParams,
}

/// Bulk action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    Activate,
    Deactivate,
}

impl BulkAction {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "activate" => Some(Self::Activate),
            "deactivate" => Some(Self::Deactivate),
            _ => None,
        }
    }

    const fn activates(self) -> bool {
        matches!(self, Self::Activate)
    }
}

/// Listing URL for a query.
#[must_use]
pub fn listing_href(query: &ProductQuery) -> String {
    format!("{LISTING_PATH}?{}", query.to_query_string())
}

// =============================================================================
// View Types
// =============================================================================

/// Table row display data.
#[derive(Clone)]
pub struct ProductRowView {
    pub id: String,
    pub name: String,
    pub image_url: Option<String>,
    pub sku: String,
    pub price: String,
    pub stock: i64,
    pub is_active: bool,
}

impl ProductRowView {
    fn from_product(product: &Product, cdn_base: &Url) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            image_url: normalize_media_url(product.image.as_deref(), cdn_base),
            sku: product
                .sku
                .clone()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "-".to_string()),
            price: product.price.unwrap_or_default().to_string(),
            stock: product.stock,
            is_active: product.is_active,
        }
    }
}

/// Tab link.
pub struct TabLink {
    pub label: &'static str,
    pub href: String,
    pub active: bool,
}

/// Sort menu option.
pub struct SortOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Product listing template.
#[derive(Template, WebTemplate)]
#[template(path = "seller/products.html")]
pub struct ProductsTemplate {
    pub layout: Layout,
    pub nav: Vec<NavItem>,
    pub tabs: Vec<TabLink>,
    pub sorts: Vec<SortOption>,
    pub tab: &'static str,
    pub search: String,
    pub sort: &'static str,
    pub rows: Vec<ProductRowView>,
    pub load_error: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the product listing.
#[instrument(skip_all, fields(user = %user.name))]
pub async fn index(
    State(state): State<AppState>,
    RequireSeller(user): RequireSeller,
    layout: Layout,
    Query(params): Query<ListingParams>,
) -> Result<impl IntoResponse> {
    let query = params.query();

    let (rows, load_error) = match state.api().seller_products(&user.token).await {
        Ok(products) => {
            let cdn = &state.config().cdn_base_url;
            let rows = query
                .apply(&products)
                .into_iter()
                .map(|p| ProductRowView::from_product(p, cdn))
                .collect();
            (rows, None)
        }
        Err(ApiError::Unauthorized) => return Err(AppError::Api(ApiError::Unauthorized)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load seller products");
            (Vec::new(), Some(e.user_message()))
        }
    };

    Ok(ProductsTemplate {
        layout,
        nav: sidebar(LISTING_PATH),
        tabs: ProductTab::ALL
            .into_iter()
            .map(|tab| TabLink {
                label: tab.label(),
                href: listing_href(&query.with_tab(tab)),
                active: tab == query.tab,
            })
            .collect(),
        sorts: ProductSort::ALL
            .into_iter()
            .map(|sort| SortOption {
                value: sort.as_str(),
                label: sort.label(),
                selected: query.sort == Some(sort),
            })
            .collect(),
        tab: query.tab.as_str(),
        search: query.search.clone(),
        sort: query.sort.map_or("", ProductSort::as_str),
        rows,
        load_error,
    })
}

/// Flip one product's status, then return to the same listing.
#[instrument(skip(state, user, session, form), fields(user = %user.name))]
pub async fn toggle(
    State(state): State<AppState>,
    RequireSeller(user): RequireSeller,
    session: Session,
    Path(id): Path<String>,
    Form(form): Form<ToggleForm>,
) -> Result<Redirect> {
    let currently_active = form.active == "true";
    let id = ProductId::new(id);

    match state
        .api()
        .set_product_active(&user.token, &id, !currently_active)
        .await
    {
        Ok(()) => {
            add_breadcrumb(
                "seller",
                if currently_active { "Deactivated product" } else { "Activated product" },
                Some(&[("product_id", id.as_str())]),
            );
            let message = if currently_active {
                "Produk dinonaktifkan"
            } else {
                "Produk diaktifkan"
            };
            flash(&session, FlashKind::Success, message).await;
        }
        Err(ApiError::Unauthorized) => return Err(AppError::Api(ApiError::Unauthorized)),
        Err(e) => {
            tracing::error!(error = %e, product = %id, "Failed to update product status");
            flash(
                &session,
                FlashKind::Error,
                format!("Gagal mengubah status produk: {}", e.user_message()),
            )
            .await;
        }
    }

    Ok(Redirect::to(&listing_href(&form.listing.query())))
}

/// Apply one status change to every checked row on the current listing.
///
/// The form is read as raw pairs because `ids` repeats once per checked row.
#[instrument(skip_all, fields(user = %user.name))]
pub async fn bulk(
    State(state): State<AppState>,
    RequireSeller(user): RequireSeller,
    session: Session,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Redirect> {
    let value = |key: &str| {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    };
    let query = ProductQuery::from_params(value("tab"), value("q"), value("sort"));
    let back = Redirect::to(&listing_href(&query));

    let Some(action) = value("action").and_then(BulkAction::parse) else {
        flash(&session, FlashKind::Error, "Pilih aksi terlebih dahulu").await;
        return Ok(back);
    };
    let checked: Vec<&str> = pairs
        .iter()
        .filter(|(k, _)| k == "ids")
        .map(|(_, v)| v.as_str())
        .collect();
    if checked.is_empty() {
        flash(&session, FlashKind::Error, "Belum ada produk yang dipilih").await;
        return Ok(back);
    }

    // Only rows the seller could actually see are touched
    let products = match state.api().seller_products(&user.token).await {
        Ok(products) => products,
        Err(ApiError::Unauthorized) => return Err(AppError::Api(ApiError::Unauthorized)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load seller products");
            flash(&session, FlashKind::Error, e.user_message()).await;
            return Ok(back);
        }
    };
    let visible = query.apply(&products);
    let visible_ids: Vec<&str> = visible.iter().map(|p| p.id.as_str()).collect();
    let selection = Selection::from_checked(&visible_ids, &checked);
    tracing::debug!(
        selected = selection.count(),
        all = selection.all_selected(),
        ignored = checked.len().saturating_sub(selection.count()),
        "Bulk selection"
    );

    let mut succeeded = 0usize;
    let mut failed = 0usize;
    for product in selection.pick(&visible) {
        match state
            .api()
            .set_product_active(&user.token, &product.id, action.activates())
            .await
        {
            Ok(()) => succeeded += 1,
            Err(ApiError::Unauthorized) => return Err(AppError::Api(ApiError::Unauthorized)),
            Err(e) => {
                tracing::error!(error = %e, product = %product.id, "Bulk status change failed");
                failed += 1;
            }
        }
    }

    tracing::info!(succeeded, failed, ?action, "Bulk status change");
    let verb = if action.activates() { "diaktifkan" } else { "dinonaktifkan" };
    if failed == 0 {
        flash(&session, FlashKind::Success, format!("{succeeded} produk {verb}")).await;
    } else {
        flash(
            &session,
            FlashKind::Error,
            format!("{succeeded} produk {verb}, {failed} gagal"),
        )
        .await;
    }

    Ok(back)
}
