//! End-to-end route tests against an in-process fake API.

#![allow(clippy::unwrap_used)]

mod common;

use common::{TestApp, location};
use reqwest::StatusCode;

// =============================================================================
// Health and landing
// =============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::spawn().await;

    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "ok");

    let response = app.get("/health/ready").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_security_headers_present() {
    let app = TestApp::spawn().await;

    let response = app.get("/login").await;
    let csp = response
        .headers()
        .get("content-security-policy")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(csp.contains("img-src 'self' data: https://cdn.example.com"));
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_landing_mixes_featured_categories() {
    let app = TestApp::spawn().await;

    let body = app.get("/").await.text().await.unwrap();
    assert!(body.contains("Semua"));
    assert!(body.contains("Bakpia Pathok"));
    assert!(body.contains("Batik Tulis"));
    // A product that fails to decode is dropped without hiding its category
    assert!(!body.contains("Batik Cap"));
    assert!(body.contains("10% OFF"));
    assert!(body.contains("Stok Terbatas"));
    assert!(body.contains("Rp 35.000"));
    assert!(body.contains("DI Yogyakarta"));
    // Un-embedded shop falls back to the placeholder location
    assert!(body.contains("Alamat tidak tersedia"));
}

#[tokio::test]
async fn test_landing_single_category() {
    let app = TestApp::spawn().await;

    let body = app.get("/?category=c-batik").await.text().await.unwrap();
    assert!(body.contains("Batik Tulis"));
    assert!(!body.contains("Bakpia Pathok"));
}

#[tokio::test]
async fn test_landing_unknown_category_keeps_its_id_as_heading() {
    let app = TestApp::spawn().await;

    let response = app.get("/?category=tidak-ada").await;
    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("tidak-ada"));
    assert!(!body.contains("Bakpia Pathok"));
}

#[tokio::test]
async fn test_catalog_is_cached() {
    let app = TestApp::spawn().await;

    app.get("/?category=c-kue").await.text().await.unwrap();
    app.get("/?category=c-kue").await.text().await.unwrap();

    let fetches = app
        .calls
        .lines()
        .into_iter()
        .filter(|line| line == "GET /category/c-kue")
        .count();
    assert_eq!(fetches, 1);
}

// =============================================================================
// Auth
// =============================================================================

#[tokio::test]
async fn test_login_redirects_by_role() {
    let app = TestApp::spawn().await;
    assert_eq!(app.login_as("toko").await, "/dashboard/seller");

    let buyer = TestApp::spawn().await;
    assert_eq!(buyer.login_as("sari").await, "/");
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let app = TestApp::spawn().await;

    let response = app
        .post_form("/login", &[("name", "sari"), ("password", "salah")])
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains("Nama atau password salah"));
}

#[tokio::test]
async fn test_login_requires_both_fields() {
    let app = TestApp::spawn().await;

    let response = app.post_form("/login", &[("name", "sari")]).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains("Nama dan password wajib diisi"));
    assert!(app.calls.find("POST /auth/login").is_none());
}

#[tokio::test]
async fn test_logout_clears_session() {
    let app = TestApp::spawn().await;
    app.login_as("sari").await;

    let response = app.post_form("/logout", &[]).await;
    assert_eq!(location(&response), "/");

    let response = app.get("/dashboard/buyer/profile").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_forgot_password_shows_toast() {
    let app = TestApp::spawn().await;

    let response = app.get("/forgot-password").await;
    assert_eq!(location(&response), "/login");

    let body = app.get("/login").await.text().await.unwrap();
    assert!(body.contains("toast--info"));
}

#[tokio::test]
async fn test_role_chooser_routing() {
    let app = TestApp::spawn().await;

    let response = app.post_form("/register/choose", &[("role", "user")]).await;
    assert_eq!(location(&response), "/register");

    let response = app.post_form("/register/choose", &[("role", "seller")]).await;
    assert_eq!(location(&response), "/register-seller");

    let response = app.post_form("/register/choose", &[]).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .text()
            .await
            .unwrap()
            .contains("Pilih salah satu peran terlebih dahulu")
    );
}

#[tokio::test]
async fn test_register_buyer() {
    let app = TestApp::spawn().await;

    let response = app
        .post_form(
            "/register",
            &[
                ("name", "Budi"),
                ("email", "budi@example.com"),
                ("password", "rahasia1"),
                ("password_confirm", "rahasia1"),
            ],
        )
        .await;
    assert_eq!(location(&response), "/login");
    assert!(app.calls.find("POST /auth/register").is_some());
}

#[tokio::test]
async fn test_register_validates_before_calling_api() {
    let app = TestApp::spawn().await;

    let response = app
        .post_form(
            "/register",
            &[
                ("name", "Budi"),
                ("email", "budi@example.com"),
                ("password", "rahasia1"),
                ("password_confirm", "rahasia2"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("Konfirmasi password tidak cocok"));
    // Entered values survive the re-render
    assert!(body.contains("budi@example.com"));
    assert!(app.calls.find("POST /auth/register").is_none());
}

#[tokio::test]
async fn test_register_seller_surfaces_api_message() {
    let app = TestApp::spawn().await;

    let response = app
        .post_form(
            "/register-seller",
            &[
                ("name", "Budi"),
                ("shop_name", "Toko Budi"),
                ("email", "dipakai@example.com"),
                ("password", "rahasia1"),
                ("password_confirm", "rahasia1"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains("Email sudah terdaftar"));
    assert!(app.calls.find("POST /auth/register-seller").is_some());
}

// =============================================================================
// Guards
// =============================================================================

#[tokio::test]
async fn test_dashboards_require_login() {
    let app = TestApp::spawn().await;

    for path in ["/dashboard/buyer", "/dashboard/buyer/setup", "/dashboard/seller"] {
        let response = app.get(path).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&response), "/login", "{path}");
    }
}

#[tokio::test]
async fn test_fragment_requests_get_htmx_redirect() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/dashboard/seller/stats"))
        .header("HX-Request", "true")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers().get("hx-redirect").unwrap(), "/login");
}

#[tokio::test]
async fn test_buyer_cannot_open_seller_dashboard() {
    let app = TestApp::spawn().await;
    app.login_as("sari").await;

    let response = app.get("/dashboard/seller/products").await;
    assert_eq!(location(&response), "/");
    assert!(app.calls.find("GET /product/list").is_none());
}

#[tokio::test]
async fn test_expired_token_returns_to_login() {
    let app = TestApp::spawn().await;
    app.login_as("basi").await;

    let response = app.get("/dashboard/buyer/profile").await;
    assert_eq!(location(&response), "/login?expired=1");

    let body = app.get("/login?expired=1").await.text().await.unwrap();
    assert!(body.contains("Sesi berakhir"));

    let response = app.get("/dashboard/buyer").await;
    assert_eq!(location(&response), "/login");
}

// =============================================================================
// Buyer dashboard
// =============================================================================

#[tokio::test]
async fn test_profile_tab() {
    let app = TestApp::spawn().await;
    app.login_as("sari").await;

    let response = app.get("/dashboard/buyer").await;
    assert_eq!(location(&response), "/dashboard/buyer/profile");

    let body = app.get("/dashboard/buyer/profile").await.text().await.unwrap();
    assert!(body.contains("sari@example.com"));
    assert!(body.contains("https://cdn.example.com/uploads/sari.png"));
    // No address yet, so the wizard is offered
    assert!(body.contains("/dashboard/buyer/setup"));

    let call = app.calls.find("GET /user").unwrap();
    assert_eq!(call.bearer.as_deref(), Some("tok-sari"));
}

#[tokio::test]
async fn test_address_tab_empty() {
    let app = TestApp::spawn().await;
    app.login_as("sari").await;

    let body = app.get("/dashboard/buyer/address").await.text().await.unwrap();
    assert!(body.contains("Belum ada alamat tersimpan"));
}

#[tokio::test]
async fn test_wizard_steps_are_clamped() {
    let app = TestApp::spawn().await;
    app.login_as("sari").await;

    let body = app.get("/dashboard/buyer/setup?step=0").await.text().await.unwrap();
    assert!(body.contains("Complete your profile!"));

    let body = app.get("/dashboard/buyer/setup?step=2").await.text().await.unwrap();
    assert!(body.contains("enctype=\"multipart/form-data\""));

    let body = app.get("/dashboard/buyer/setup?step=9").await.text().await.unwrap();
    assert!(body.contains("Profile setup completed!"));
}

#[tokio::test]
async fn test_wizard_image_upload() {
    let app = TestApp::spawn().await;
    app.login_as("sari").await;

    let part = reqwest::multipart::Part::bytes(vec![0x89, b'P', b'N', b'G'])
        .file_name("foto.png")
        .mime_str("image/png")
        .unwrap();
    let response = app
        .client
        .post(app.url("/dashboard/buyer/setup/image"))
        .multipart(reqwest::multipart::Form::new().part("image", part))
        .send()
        .await
        .unwrap();
    assert_eq!(location(&response), "/dashboard/buyer/setup?step=3");
    assert!(app.calls.find("POST /user/image").is_some());
}

#[tokio::test]
async fn test_wizard_rejects_oversized_image() {
    let app = TestApp::spawn().await;
    app.login_as("sari").await;

    let part = reqwest::multipart::Part::bytes(vec![0u8; 4 * 1024 * 1024])
        .file_name("besar.png")
        .mime_str("image/png")
        .unwrap();
    let response = app
        .client
        .post(app.url("/dashboard/buyer/setup/image"))
        .multipart(reqwest::multipart::Form::new().part("image", part))
        .send()
        .await
        .unwrap();
    assert_eq!(location(&response), "/dashboard/buyer/setup?step=2");
    assert!(app.calls.find("POST /user/image").is_none());

    let body = app.get("/dashboard/buyer/setup?step=2").await.text().await.unwrap();
    assert!(body.contains("Ukuran gambar maksimal 3MB"));
}

#[tokio::test]
async fn test_wizard_address_step() {
    let app = TestApp::spawn().await;
    app.login_as("sari").await;

    let response = app
        .post_form(
            "/dashboard/buyer/setup/address",
            &[("name", "Rumah"), ("province", "Jawa Barat")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("City is required"));
    assert!(body.contains("Jawa Barat"));
    assert!(app.calls.find("POST /user/address").is_none());

    let response = app
        .post_form(
            "/dashboard/buyer/setup/address",
            &[
                ("name", "Rumah"),
                ("province", "Jawa Barat"),
                ("city", "Bandung"),
                ("district", "Coblong"),
                ("subdistrict", "Dago"),
                ("postalCode", "40135"),
            ],
        )
        .await;
    assert_eq!(location(&response), "/dashboard/buyer/setup?step=4");
    assert!(app.calls.find("POST /user/address").is_some());
}

// =============================================================================
// Seller dashboard
// =============================================================================

#[tokio::test]
async fn test_seller_home_counts_transactions() {
    let app = TestApp::spawn().await;
    app.login_as("toko").await;

    let body = app.get("/dashboard/seller").await.text().await.unwrap();
    assert!(body.contains("Pesanan Baru"));
    assert!(body.contains("data-poll-url=\"/dashboard/seller/stats\""));
    assert!(body.contains("data-poll-interval=\"60\""));

    let fragment = app.get("/dashboard/seller/stats").await.text().await.unwrap();
    assert!(!fragment.contains("<html"));
    assert!(fragment.contains("<span class=\"stat-card__value\">2</span>"));

    let call = app.calls.find("GET /transaction/seller").unwrap();
    assert_eq!(call.bearer.as_deref(), Some("tok-toko"));
}

#[tokio::test]
async fn test_product_listing_tabs_and_search() {
    let app = TestApp::spawn().await;
    app.login_as("toko").await;

    let body = app.get("/dashboard/seller/products").await.text().await.unwrap();
    assert!(body.contains("Keripik Tempe"));
    assert!(body.contains("Bolu Batik"));
    assert!(!body.contains("Dodol Garut"));

    let body = app
        .get("/dashboard/seller/products?tab=inactive")
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("Dodol Garut"));
    assert!(!body.contains("Keripik Tempe"));

    let body = app
        .get("/dashboard/seller/products?tab=active&q=BATIK")
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("Bolu Batik"));
    assert!(!body.contains("Keripik Tempe"));
}

#[tokio::test]
async fn test_product_listing_sort() {
    let app = TestApp::spawn().await;
    app.login_as("toko").await;

    let body = app
        .get("/dashboard/seller/products?sort=priciest")
        .await
        .text()
        .await
        .unwrap();
    let bolu = body.find("Bolu Batik").unwrap();
    let keripik = body.find("Keripik Tempe").unwrap();
    assert!(bolu < keripik);
}

#[tokio::test]
async fn test_toggle_calls_matching_endpoint() {
    let app = TestApp::spawn().await;
    app.login_as("toko").await;

    let response = app
        .post_form(
            "/dashboard/seller/products/p1/toggle",
            &[("active", "true"), ("tab", "active"), ("q", "keripik")],
        )
        .await;
    assert_eq!(
        location(&response),
        "/dashboard/seller/products?tab=active&q=keripik"
    );
    let call = app.calls.find("PUT /product/deactivate/p1").unwrap();
    assert_eq!(call.bearer.as_deref(), Some("tok-toko"));

    let response = app
        .post_form(
            "/dashboard/seller/products/p2/toggle",
            &[("active", "false"), ("tab", "inactive")],
        )
        .await;
    assert_eq!(location(&response), "/dashboard/seller/products?tab=inactive");
    assert!(app.calls.find("PUT /product/activate/p2").is_some());
}

#[tokio::test]
async fn test_toggle_failure_shows_error_toast() {
    let app = TestApp::spawn().await;
    app.login_as("toko").await;

    let response = app
        .post_form("/dashboard/seller/products/rusak/toggle", &[("active", "true")])
        .await;
    assert_eq!(location(&response), "/dashboard/seller/products?tab=active");

    let body = app.get("/dashboard/seller/products").await.text().await.unwrap();
    assert!(body.contains("toast--error"));
    assert!(body.contains("Database error"));
}

#[tokio::test]
async fn test_bulk_only_touches_visible_rows() {
    let app = TestApp::spawn().await;
    app.login_as("toko").await;
    app.calls.clear();

    let response = app
        .post_form(
            "/dashboard/seller/products/bulk",
            &[
                ("tab", "active"),
                ("action", "deactivate"),
                ("ids", "p1"),
                ("ids", "p2"),
                ("ids", "p3"),
            ],
        )
        .await;
    assert_eq!(location(&response), "/dashboard/seller/products?tab=active");

    let puts: Vec<String> = app
        .calls
        .lines()
        .into_iter()
        .filter(|line| line.starts_with("PUT "))
        .collect();
    assert_eq!(
        puts,
        vec!["PUT /product/deactivate/p1", "PUT /product/deactivate/p3"]
    );

    let body = app.get("/dashboard/seller/products").await.text().await.unwrap();
    assert!(body.contains("2 produk dinonaktifkan"));
}

#[tokio::test]
async fn test_bulk_requires_action_and_selection() {
    let app = TestApp::spawn().await;
    app.login_as("toko").await;

    let response = app
        .post_form("/dashboard/seller/products/bulk", &[("ids", "p1")])
        .await;
    assert_eq!(location(&response), "/dashboard/seller/products?tab=active");

    let response = app
        .post_form("/dashboard/seller/products/bulk", &[("action", "activate")])
        .await;
    assert_eq!(location(&response), "/dashboard/seller/products?tab=active");

    assert!(app.calls.find("PUT /product/activate/p1").is_none());
    assert!(app.calls.find("PUT /product/deactivate/p1").is_none());
}
