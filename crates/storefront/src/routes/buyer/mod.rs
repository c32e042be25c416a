//! Buyer dashboard route handlers.
//!
//! These routes require authentication. Both tabs read `GET /user`; the
//! profile setup wizard lives in [`setup`].

pub mod setup;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
};
use pusatoleh_core::media::normalize_media_url;
use tracing::instrument;
use url::Url;

use crate::api::{ApiError, UserResponse};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{Layout, RequireAuth};
use crate::models::CurrentUser;
use crate::state::AppState;

/// Profile display data for templates.
#[derive(Clone)]
pub struct ProfileView {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub image_url: Option<String>,
}

/// Address display data for templates.
#[derive(Clone)]
pub struct AddressView {
    pub name: String,
    pub summary: String,
}

/// "Biodata" tab template.
#[derive(Template, WebTemplate)]
#[template(path = "buyer/profile.html")]
pub struct ProfileTemplate {
    pub layout: Layout,
    pub active_tab: &'static str,
    pub profile: Option<ProfileView>,
    pub needs_setup: bool,
}

/// "Alamat" tab template.
#[derive(Template, WebTemplate)]
#[template(path = "buyer/address.html")]
pub struct AddressTemplate {
    pub layout: Layout,
    pub active_tab: &'static str,
    pub addresses: Vec<AddressView>,
}

/// `/dashboard/buyer` opens the profile tab.
pub async fn index(RequireAuth(_user): RequireAuth) -> Redirect {
    Redirect::to("/dashboard/buyer/profile")
}

/// Display the "Biodata" tab.
#[instrument(skip_all, fields(user = %user.name))]
pub async fn profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    layout: Layout,
) -> Result<impl IntoResponse> {
    let data = load_user(&state, &user).await?;
    let cdn = &state.config().cdn_base_url;

    Ok(ProfileTemplate {
        layout,
        active_tab: "profile",
        needs_setup: data.as_ref().is_some_and(|d| d.address.is_empty()),
        profile: data.as_ref().map(|d| profile_view(d, cdn)),
    })
}

/// Display the "Alamat" tab.
#[instrument(skip_all, fields(user = %user.name))]
pub async fn address(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    layout: Layout,
) -> Result<impl IntoResponse> {
    let data = load_user(&state, &user).await?;

    Ok(AddressTemplate {
        layout,
        active_tab: "address",
        addresses: data
            .map(|d| {
                d.address
                    .iter()
                    .map(|a| AddressView {
                        name: a.fields.name.clone(),
                        summary: a.fields.summary(),
                    })
                    .collect()
            })
            .unwrap_or_default(),
    })
}

/// Fetch `GET /user`, treating failures other than an expired token as
/// "nothing to show".
async fn load_user(state: &AppState, user: &CurrentUser) -> Result<Option<UserResponse>> {
    match state.api().current_user(&user.token).await {
        Ok(data) => Ok(Some(data)),
        Err(ApiError::Unauthorized) => Err(AppError::Api(ApiError::Unauthorized)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load user data");
            Ok(None)
        }
    }
}

fn profile_view(data: &UserResponse, cdn: &Url) -> ProfileView {
    ProfileView {
        name: data.user.name.clone(),
        email: data.user.email.clone(),
        phone: data.user.phone.clone(),
        image_url: normalize_media_url(data.profile_image(), cdn),
    }
}
