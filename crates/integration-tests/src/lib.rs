//! Integration test harness for the Vitrine storefront.
//!
//! [`TestContext::spawn`] starts two servers on ephemeral ports: a mock of
//! the upstream catalog, auth and postal code services, and the storefront
//! app itself over in-memory storage pointed at that mock.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p vitrine-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::Path,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use reqwest::Client;
use serde_json::{Value, json};
use vitrine_storefront::api::RetryPolicy;
use vitrine_storefront::config::StorefrontConfig;
use vitrine_storefront::routes;
use vitrine_storefront::state::AppState;
use vitrine_storefront::storage::MemoryStorage;

/// Username accepted by the mock upstream.
pub const TEST_USERNAME: &str = "johnd";

/// Password accepted by the mock upstream.
pub const TEST_PASSWORD: &str = "m38rmF$";

/// Token issued by the mock upstream.
pub const TEST_TOKEN: &str = "test-token";

/// Postal code the mock upstream resolves.
pub const KNOWN_CEP: &str = "01310100";

/// Postal code the mock upstream reports as unknown.
pub const UNKNOWN_CEP: &str = "99999999";

/// Product id the mock upstream serves with a negative price.
pub const MALFORMED_PRODUCT_ID: i32 = 5;

/// A running storefront and its mock upstream.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub state: AppState,
}

impl TestContext {
    /// Start the mock upstream and the storefront app.
    ///
    /// # Panics
    ///
    /// Panics if either server cannot bind a local port.
    #[allow(clippy::unwrap_used)]
    pub async fn spawn() -> Self {
        let upstream = serve(mock_upstream()).await;

        let mut config = StorefrontConfig::default();
        config.api.base_url = format!("http://{upstream}");
        config.api.timeout = Duration::from_secs(5);
        config.api.retry = RetryPolicy::none();
        config.viacep_url = format!("http://{upstream}/ws");

        let state = AppState::with_storage(config, Arc::new(MemoryStorage::new())).unwrap();
        let app = serve(routes::app(state.clone())).await;

        Self {
            client: Client::new(),
            base_url: format!("http://{app}"),
            state,
        }
    }

    /// Absolute URL for an app path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Sign in with the mock upstream's credentials.
    ///
    /// # Panics
    ///
    /// Panics if the login request fails.
    #[allow(clippy::unwrap_used)]
    pub async fn login(&self) {
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(&json!({ "username": TEST_USERNAME, "password": TEST_PASSWORD }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    /// Add a product to the cart through the API.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or is rejected.
    #[allow(clippy::unwrap_used)]
    pub async fn add_to_cart(&self, product_id: i32, quantity: u32) -> Value {
        let response = self
            .client
            .post(self.url("/cart/items"))
            .json(&json!({ "product_id": product_id, "quantity": quantity }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        response.json().await.unwrap()
    }
}

/// A valid checkout form as sent by the client.
#[must_use]
pub fn checkout_form() -> Value {
    json!({
        "email": "carla@example.com",
        "firstName": "Carla",
        "lastName": "Mendes",
        "address": "Av. Paulista, 1000",
        "city": "São Paulo",
        "neighborhood": "Bela Vista",
        "state": "SP",
        "zipCode": "01310-100",
        "phone": "(11) 98765-4321",
        "paymentMethod": "credit-card",
        "cardNumber": "4111 1111 1111 1111",
        "cardExpiry": "12/30",
        "cardCvc": "123"
    })
}

#[allow(clippy::unwrap_used)]
async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

// ============================================================================
// Mock upstream
// ============================================================================

fn catalog() -> Vec<Value> {
    vec![
        product(1, "Fjallraven Backpack", 109.95, "men's clothing", 3.9),
        product(2, "Gold Chain Bracelet", 695.0, "jewelery", 4.6),
        product(3, "Portable SSD 1TB", 109.0, "electronics", 4.8),
        product(4, "Cotton Jacket", 55.99, "men's clothing", 4.7),
    ]
}

fn product(id: i32, title: &str, price: f64, category: &str, rate: f64) -> Value {
    json!({
        "id": id,
        "title": title,
        "price": price,
        "description": format!("{title} description"),
        "category": category,
        "image": format!("https://fakestoreapi.com/img/{id}.jpg"),
        "rating": { "rate": rate, "count": 120 }
    })
}

fn mock_upstream() -> Router {
    Router::new()
        .route("/products", get(|| async { Json(catalog()) }))
        .route(
            "/products/categories",
            get(|| async { Json(json!(["electronics", "jewelery", "men's clothing"])) }),
        )
        .route("/products/category/{category}", get(products_in_category))
        .route("/products/{id}", get(product_by_id))
        .route("/auth/login", post(login))
        .route("/users/1", get(current_user))
        .route("/ws/{cep}/json/", get(address))
}

async fn products_in_category(Path(category): Path<String>) -> Json<Vec<Value>> {
    Json(
        catalog()
            .into_iter()
            .filter(|p| p["category"] == category.as_str())
            .collect(),
    )
}

/// Unknown ids answer 200 with an empty body, like the real service.
async fn product_by_id(Path(id): Path<i32>) -> String {
    if id == MALFORMED_PRODUCT_ID {
        return product(id, "Broken Listing", -12.5, "electronics", 4.0).to_string();
    }
    catalog()
        .into_iter()
        .find(|p| p["id"] == id)
        .map(|p| p.to_string())
        .unwrap_or_default()
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["username"] == TEST_USERNAME && body["password"] == TEST_PASSWORD {
        Json(json!({ "token": TEST_TOKEN })).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, "username or password is incorrect").into_response()
    }
}

async fn current_user(headers: HeaderMap) -> Response {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TEST_TOKEN}"));
    if !authorized {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    Json(json!({
        "id": 1,
        "email": "john@gmail.com",
        "username": TEST_USERNAME,
        "password": TEST_PASSWORD,
        "name": { "firstname": "john", "lastname": "doe" },
        "phone": "1-570-236-7033"
    }))
    .into_response()
}

async fn address(Path(cep): Path<String>) -> Json<Value> {
    if cep == KNOWN_CEP {
        Json(json!({
            "cep": "01310-100",
            "logradouro": "Avenida Paulista",
            "complemento": "de 612 a 1510 - lado par",
            "bairro": "Bela Vista",
            "localidade": "São Paulo",
            "uf": "SP",
            "ibge": "3550308",
            "ddd": "11"
        }))
    } else {
        Json(json!({ "erro": "true" }))
    }
}
