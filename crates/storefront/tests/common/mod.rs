//! Shared harness: an in-process fake of the marketplace API plus a running
//! storefront pointed at it.

#![allow(dead_code, clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use pusatoleh_storefront::config::StorefrontConfig;
use pusatoleh_storefront::state::AppState;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Password every fake account accepts.
pub const PASSWORD: &str = "rahasia";

/// A request the fake API received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub method: String,
    pub path: String,
    pub bearer: Option<String>,
}

impl Call {
    /// `"PUT /product/deactivate/p1"`.
    pub fn line(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

/// Recorded calls, shared between the fake and the test body.
#[derive(Clone, Default)]
pub struct Calls(Arc<Mutex<Vec<Call>>>);

impl Calls {
    pub fn all(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.all().iter().map(Call::line).collect()
    }

    pub fn find(&self, line: &str) -> Option<Call> {
        self.all().into_iter().find(|c| c.line() == line)
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

async fn record(State(calls): State<Calls>, request: Request, next: Next) -> Response {
    let bearer = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);
    calls.0.lock().unwrap().push(Call {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        bearer,
    });
    next.run(request).await
}

// =============================================================================
// Fake API
// =============================================================================

/// Accounts: `sari` is a buyer, `toko` a seller, `basi` a buyer whose token
/// the API no longer accepts.
fn account(name: &str) -> Option<(&'static str, &'static str)> {
    match name {
        "sari" => Some(("u-sari", "user")),
        "toko" => Some(("u-toko", "seller")),
        "basi" => Some(("u-basi", "user")),
        _ => None,
    }
}

fn token_of(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Unauthorized" })),
    )
        .into_response()
}

/// Reject missing tokens and the token of the `basi` account.
fn check_token(headers: &HeaderMap) -> Result<&str, Response> {
    match token_of(headers) {
        Some(token) if token != "tok-basi" => Ok(token),
        _ => Err(unauthorized()),
    }
}

#[derive(Deserialize)]
struct LoginBody {
    name: String,
    password: String,
}

async fn login(Json(body): Json<LoginBody>) -> Response {
    match account(&body.name) {
        Some((id, role)) if body.password == PASSWORD => Json(json!({
            "token": format!("tok-{}", body.name),
            "user": { "_id": id, "name": body.name, "role": role }
        }))
        .into_response(),
        _ => unauthorized(),
    }
}

async fn register(Json(body): Json<Value>) -> Response {
    if body["email"] == "dipakai@example.com" {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "message": "Email sudah terdaftar" })),
        )
            .into_response();
    }
    Json(json!({ "message": "Registrasi berhasil" })).into_response()
}

async fn user(headers: HeaderMap) -> Response {
    if let Err(rejection) = check_token(&headers) {
        return rejection;
    }
    Json(json!({
        "user": {
            "_id": "u-sari",
            "name": "Sari",
            "email": "sari@example.com",
            "phone": "08123456789",
            "role": "user"
        },
        "image": [{ "url": "uploads\\sari.png" }],
        "address": []
    }))
    .into_response()
}

async fn save_address(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if let Err(rejection) = check_token(&headers) {
        return rejection;
    }
    Json(json!({ "address": body })).into_response()
}

async fn upload_image(headers: HeaderMap) -> Response {
    if let Err(rejection) = check_token(&headers) {
        return rejection;
    }
    Json(json!({ "message": "ok" })).into_response()
}

async fn categories() -> Json<Value> {
    Json(json!({
        "categories": [
            { "_id": "c-kue", "name": "Kue" },
            { "_id": "c-batik", "name": "Batik" }
        ]
    }))
}

async fn category_products(Path(id): Path<String>) -> Response {
    let products = match id.as_str() {
        "c-kue" => json!([{
            "_id": "k1",
            "name": "Bakpia Pathok",
            "price": 35000,
            "stock": 3,
            "isNew": true,
            "discount": 10,
            "categoryId": { "_id": "c-kue", "name": "Kue" },
            "shopId": { "_id": "s1", "name": "Toko Jogja", "address": { "province": "DI Yogyakarta" } }
        }]),
        "c-batik" => json!([
            {
                "_id": "b1",
                "name": "Batik Tulis",
                "price": 250000,
                "stock": 12,
                "categoryId": "c-batik",
                "shopId": "s2"
            },
            {
                "_id": "b2",
                "name": "Batik Cap",
                "price": 90000,
                "createdAt": "kemarin"
            }
        ]),
        _ => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": "Category not found" })),
            )
                .into_response();
        }
    };
    Json(json!({ "products": products })).into_response()
}

async fn seller_products(headers: HeaderMap) -> Response {
    if let Err(rejection) = check_token(&headers) {
        return rejection;
    }
    Json(json!([
        { "_id": "p1", "name": "Keripik Tempe", "price": 15000, "stock": 20, "isActive": true, "sku": "KT-01", "createdAt": "2024-01-01T00:00:00Z" },
        { "_id": "p2", "name": "Dodol Garut", "price": 25000, "stock": 0, "isActive": false, "createdAt": "2024-02-01T00:00:00Z" },
        { "_id": "p3", "name": "Bolu Batik", "price": 45000, "stock": 4, "isActive": true, "createdAt": "2024-03-01T00:00:00Z" }
    ]))
    .into_response()
}

async fn set_active(headers: HeaderMap, Path(id): Path<String>) -> Response {
    if let Err(rejection) = check_token(&headers) {
        return rejection;
    }
    if id == "rusak" {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "Database error" })),
        )
            .into_response();
    }
    Json(json!({})).into_response()
}

async fn seller_transactions(headers: HeaderMap) -> Response {
    if let Err(rejection) = check_token(&headers) {
        return rejection;
    }
    Json(json!({
        "transactionStatuses": [
            { "status": "Paid" },
            { "status": "Paid" },
            { "status": "Processed" },
            { "status": "Completed" },
            { "status": "Cancelled" }
        ]
    }))
    .into_response()
}

fn fake_api(calls: Calls) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/register-seller", post(register))
        .route("/user", get(user))
        .route("/user/address", post(save_address))
        .route("/user/image", post(upload_image))
        .route("/category", get(categories))
        .route("/category/{id}", get(category_products))
        .route("/product/list", get(seller_products))
        .route("/product/activate/{id}", put(set_active))
        .route("/product/deactivate/{id}", put(set_active))
        .route("/transaction/seller", get(seller_transactions))
        .layer(axum::middleware::from_fn_with_state(calls, record))
}

async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

// =============================================================================
// Harness
// =============================================================================

/// A running storefront and the fake API behind it.
pub struct TestApp {
    pub base: String,
    pub api_base: String,
    pub calls: Calls,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let calls = Calls::default();
        let api_base = serve(fake_api(calls.clone())).await;

        let env: HashMap<&str, String> = HashMap::from([
            ("STOREFRONT_API_BASE_URL", api_base.clone()),
            ("STOREFRONT_CDN_BASE_URL", "https://cdn.example.com".to_string()),
            ("STOREFRONT_FEATURED_CATEGORIES", "c-kue,c-batik".to_string()),
            ("STOREFRONT_STATS_POLL_SECS", "60".to_string()),
        ]);
        let config = StorefrontConfig::from_lookup(|key| env.get(key).cloned()).unwrap();
        let state = AppState::new(config).unwrap();
        let base = serve(pusatoleh_storefront::app(state)).await;

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        Self {
            base,
            api_base,
            calls,
            client,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .unwrap()
    }

    /// Log in and return where the storefront redirected.
    pub async fn login_as(&self, name: &str) -> String {
        let response = self
            .post_form("/login", &[("name", name), ("password", PASSWORD)])
            .await;
        assert_eq!(response.status(), reqwest::StatusCode::SEE_OTHER);
        location(&response)
    }
}

/// The `Location` header of a redirect.
pub fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}
