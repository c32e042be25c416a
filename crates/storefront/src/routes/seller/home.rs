//! Seller home page and its polled stats fragment.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use pusatoleh_core::stats::{SellerStats, StatCard};
use tracing::instrument;

use super::{NavItem, sidebar};
use crate::api::ApiError;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{Layout, RequireSeller};
use crate::models::CurrentUser;
use crate::state::AppState;

/// Static entries for the "Notifikasi" panel.
const NOTIFICATIONS: &[&str] = &[
    "Pastikan stok produkmu selalu diperbarui",
    "Balas chat pembeli dalam 24 jam",
    "Proses pesanan baru sebelum batas waktu pengiriman",
];

/// Seller home page template.
#[derive(Template, WebTemplate)]
#[template(path = "seller/home.html")]
pub struct SellerHomeTemplate {
    pub layout: Layout,
    pub nav: Vec<NavItem>,
    pub shop_owner: String,
    pub cards: [StatCard; 4],
    pub poll_secs: u64,
    pub notifications: &'static [&'static str],
}

/// Stat cards fragment, re-fetched by the browser.
#[derive(Template, WebTemplate)]
#[template(path = "seller/_stats.html")]
pub struct StatsFragmentTemplate {
    pub cards: [StatCard; 4],
}

/// Display the seller home page.
#[instrument(skip_all, fields(user = %user.name))]
pub async fn home(
    State(state): State<AppState>,
    RequireSeller(user): RequireSeller,
    layout: Layout,
) -> Result<impl IntoResponse> {
    let stats = load_stats(&state, &user).await?;

    Ok(SellerHomeTemplate {
        layout,
        nav: sidebar("/dashboard/seller"),
        shop_owner: user.name,
        cards: stats.cards(),
        poll_secs: state.config().stats_poll_interval.as_secs(),
        notifications: NOTIFICATIONS,
    })
}

/// Stat cards only, for polling.
#[instrument(skip_all, fields(user = %user.name))]
pub async fn stats_fragment(
    State(state): State<AppState>,
    RequireSeller(user): RequireSeller,
) -> Result<impl IntoResponse> {
    let stats = load_stats(&state, &user).await?;
    Ok(StatsFragmentTemplate {
        cards: stats.cards(),
    })
}

/// Aggregate `GET /transaction/seller`, showing zeros if it fails.
async fn load_stats(state: &AppState, user: &CurrentUser) -> Result<SellerStats> {
    match state.api().seller_transactions(&user.token).await {
        Ok(transactions) => Ok(SellerStats::from_statuses(transactions.statuses())),
        Err(ApiError::Unauthorized) => Err(AppError::Api(ApiError::Unauthorized)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load seller transactions");
            Ok(SellerStats::default())
        }
    }
}
