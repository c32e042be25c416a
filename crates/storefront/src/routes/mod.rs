//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                   - Landing page (?category=<id>)
//! GET  /health                             - Liveness check
//! GET  /health/ready                       - Readiness check (API reachable)
//!
//! # Auth
//! GET  /login                              - Login page (?expired=1 drops the session)
//! POST /login                              - Login action
//! POST /logout                             - Logout action
//! GET  /forgot-password                    - Informational toast, back to login
//! GET  /register/choose                    - "Mau daftar sebagai apa?"
//! POST /register/choose                    - Route to the chosen form
//! GET  /register                           - Buyer registration page
//! POST /register                           - Buyer registration action
//! GET  /register-seller                    - Seller registration page
//! POST /register-seller                    - Seller registration action
//!
//! # Buyer dashboard (requires auth)
//! GET  /dashboard/buyer                    - Redirect to profile tab
//! GET  /dashboard/buyer/profile            - "Biodata" tab
//! GET  /dashboard/buyer/address            - "Alamat" tab
//! GET  /dashboard/buyer/setup              - Setup wizard (?step=1..4)
//! POST /dashboard/buyer/setup/image        - Upload profile image (multipart)
//! POST /dashboard/buyer/setup/address      - Save shipping address
//!
//! # Seller dashboard (requires seller)
//! GET  /dashboard/seller                   - Home with stat cards
//! GET  /dashboard/seller/stats             - Stat cards fragment (polled)
//! GET  /dashboard/seller/products          - Listing (?tab=&q=&sort=)
//! POST /dashboard/seller/products/{id}/toggle - Flip one product's status
//! POST /dashboard/seller/products/bulk     - Change status of checked rows
//! ```

pub mod auth;
pub mod buyer;
pub mod home;
pub mod seller;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/forgot-password", get(auth::forgot_password))
        .route(
            "/register/choose",
            get(auth::choose_role_page).post(auth::choose_role),
        )
        .route("/register", get(auth::register_page).post(auth::register))
        .route(
            "/register-seller",
            get(auth::register_seller_page).post(auth::register_seller),
        )
}

/// Create the buyer dashboard router.
pub fn buyer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(buyer::index))
        .route("/profile", get(buyer::profile))
        .route("/address", get(buyer::address))
        .route("/setup", get(buyer::setup::setup_page))
        .route(
            "/setup/image",
            post(buyer::setup::upload_image)
                .layer(DefaultBodyLimit::max(buyer::setup::UPLOAD_BODY_LIMIT)),
        )
        .route("/setup/address", post(buyer::setup::save_address))
}

/// Create the seller dashboard router.
pub fn seller_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(seller::home::home))
        .route("/stats", get(seller::home::stats_fragment))
        .route("/products", get(seller::products::index))
        .route("/products/{id}/toggle", post(seller::products::toggle))
        .route("/products/bulk", post(seller::products::bulk))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .merge(auth_routes())
        .nest("/dashboard/buyer", buyer_routes())
        .nest("/dashboard/seller", seller_routes())
}
