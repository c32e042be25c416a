//! Authentication route handlers.
//!
//! Handles login, logout, the role chooser, and buyer/seller registration
//! against the marketplace API.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use pusatoleh_core::{Email, Role};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::api::{ApiError, RegisterRequest, RegisterSellerRequest};
use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{FlashKind, Layout, clear_current_user, flash, set_current_user};
use crate::models::CurrentUser;
use crate::state::AppState;

/// Shortest password accepted by the registration forms.
pub const MIN_PASSWORD_LEN: usize = 6;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub password: String,
}

/// Role chooser form data.
#[derive(Debug, Deserialize)]
pub struct ChooseRoleForm {
    pub role: Option<String>,
}

/// Registration form data, shared by buyers and sellers.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirm: String,
    /// Seller registration only.
    #[serde(default)]
    pub shop_name: String,
}

impl RegisterForm {
    /// Check the form before calling the API, returning the first problem.
    fn validate(&self, seller: bool) -> std::result::Result<Email, String> {
        if self.name.trim().is_empty() {
            return Err("Nama wajib diisi".to_string());
        }
        if seller && self.shop_name.trim().is_empty() {
            return Err("Nama toko wajib diisi".to_string());
        }
        let email = Email::parse(&self.email).map_err(|_| "Email tidak valid".to_string())?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(format!("Password minimal {MIN_PASSWORD_LEN} karakter"));
        }
        if self.password != self.password_confirm {
            return Err("Konfirmasi password tidak cocok".to_string());
        }
        Ok(email)
    }
}

/// Query parameters for the login page.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    /// Set when the API rejected the session token.
    pub expired: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub layout: Layout,
    pub name: String,
    pub error: Option<String>,
}

/// "Mau daftar sebagai apa?" page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/choose_role.html")]
pub struct ChooseRoleTemplate {
    pub layout: Layout,
    pub error: Option<String>,
}

/// Registration page template, for both roles.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub layout: Layout,
    pub seller: bool,
    pub name: String,
    pub email: String,
    pub shop_name: String,
    pub error: Option<String>,
}

impl RegisterTemplate {
    fn blank(layout: Layout, seller: bool) -> Self {
        Self {
            layout,
            seller,
            name: String::new(),
            email: String::new(),
            shop_name: String::new(),
            error: None,
        }
    }

    /// Re-render keeping everything except the passwords.
    fn with_error(layout: Layout, seller: bool, form: RegisterForm, error: String) -> Self {
        Self {
            layout,
            seller,
            name: form.name,
            email: form.email,
            shop_name: form.shop_name,
            error: Some(error),
        }
    }

    /// Where the form posts to.
    #[must_use]
    pub const fn action(&self) -> &'static str {
        if self.seller { "/register-seller" } else { "/register" }
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
///
/// `?expired=1` means the API rejected the stored token, so the login is
/// dropped before the form is shown.
pub async fn login_page(
    session: Session,
    mut layout: Layout,
    Query(query): Query<LoginQuery>,
) -> Result<impl IntoResponse> {
    if query.expired.is_some() && layout.user.is_some() {
        clear_current_user(&session).await?;
        clear_sentry_user();
        layout.user = None;
        layout.push(FlashKind::Info, "Sesi berakhir, silakan login kembali");
    }

    Ok(LoginTemplate {
        layout,
        name: String::new(),
        error: None,
    })
}

/// Handle login form submission.
#[instrument(skip(state, session, layout, form), fields(name = %form.name))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    layout: Layout,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let name = form.name.trim();
    if name.is_empty() || form.password.is_empty() {
        return Ok(LoginTemplate {
            layout,
            name: name.to_string(),
            error: Some("Nama dan password wajib diisi".to_string()),
        }
        .into_response());
    }

    match state.api().login(name, &form.password).await {
        Ok(response) => {
            let user = CurrentUser::from(response);
            set_current_user(&session, &user).await?;
            set_sentry_user(&user.id, &user.name);
            tracing::info!(role = %user.role, "User logged in");

            flash(&session, FlashKind::Success, format!("Selamat datang, {}!", user.name)).await;
            Ok(Redirect::to(user.home_path()).into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Login failed");
            Ok(LoginTemplate {
                layout,
                name: name.to_string(),
                error: Some(e.user_message()),
            }
            .into_response())
        }
    }
}

/// Log out and return to the landing page.
pub async fn logout(session: Session) -> Result<Redirect> {
    session.flush().await?;
    clear_sentry_user();
    Ok(Redirect::to("/"))
}

/// "Lupa password?" has no backend flow; tell the user who to contact.
pub async fn forgot_password(session: Session) -> Redirect {
    flash(
        &session,
        FlashKind::Info,
        "Hubungi admin PusatOlehOleh untuk mengatur ulang password",
    )
    .await;
    Redirect::to("/login")
}

// =============================================================================
// Role Chooser Routes
// =============================================================================

/// Display the role chooser.
pub async fn choose_role_page(layout: Layout) -> impl IntoResponse {
    ChooseRoleTemplate {
        layout,
        error: None,
    }
}

/// Route to the registration form for the chosen role.
pub async fn choose_role(layout: Layout, Form(form): Form<ChooseRoleForm>) -> Response {
    match form.role.as_deref().map(str::parse::<Role>) {
        Some(Ok(Role::Buyer)) => Redirect::to("/register").into_response(),
        Some(Ok(Role::Seller)) => Redirect::to("/register-seller").into_response(),
        _ => ChooseRoleTemplate {
            layout,
            error: Some("Pilih salah satu peran terlebih dahulu".to_string()),
        }
        .into_response(),
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the buyer registration page.
pub async fn register_page(layout: Layout) -> impl IntoResponse {
    RegisterTemplate::blank(layout, false)
}

/// Display the seller registration page.
pub async fn register_seller_page(layout: Layout) -> impl IntoResponse {
    RegisterTemplate::blank(layout, true)
}

/// Handle buyer registration.
#[instrument(skip(state, session, layout, form), fields(name = %form.name))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    layout: Layout,
    Form(form): Form<RegisterForm>,
) -> Response {
    let email = match form.validate(false) {
        Ok(email) => email,
        Err(error) => return RegisterTemplate::with_error(layout, false, form, error).into_response(),
    };

    let result = state
        .api()
        .register(&RegisterRequest {
            name: form.name.trim(),
            email: email.as_str(),
            password: &form.password,
        })
        .await;

    finish_registration(&session, layout, false, form, result.map(|r| r.message)).await
}

/// Handle seller registration.
#[instrument(skip(state, session, layout, form), fields(name = %form.name))]
pub async fn register_seller(
    State(state): State<AppState>,
    session: Session,
    layout: Layout,
    Form(form): Form<RegisterForm>,
) -> Response {
    let email = match form.validate(true) {
        Ok(email) => email,
        Err(error) => return RegisterTemplate::with_error(layout, true, form, error).into_response(),
    };

    let result = state
        .api()
        .register_seller(&RegisterSellerRequest {
            name: form.name.trim(),
            email: email.as_str(),
            password: &form.password,
            shop_name: form.shop_name.trim(),
        })
        .await;

    finish_registration(&session, layout, true, form, result.map(|r| r.message)).await
}

async fn finish_registration(
    session: &Session,
    layout: Layout,
    seller: bool,
    form: RegisterForm,
    result: std::result::Result<Option<String>, ApiError>,
) -> Response {
    match result {
        Ok(message) => {
            tracing::info!(seller, "Account registered");
            let message = message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "Registrasi berhasil, silakan login".to_string());
            flash(session, FlashKind::Success, message).await;
            Redirect::to("/login").into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, seller, "Registration failed");
            RegisterTemplate::with_error(layout, seller, form, e.user_message()).into_response()
        }
    }
}
