//! Integration tests for Corner Shop.
//!
//! Every test drives the real router in-process against a throwaway data
//! directory, so no server or network is needed:
//!
//! ```bash
//! cargo test -p corner-shop-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront` - Catalog, cart and health endpoints
//! - `checkout` - Order placement, stock handling and order lookup
//! - `admin` - Admin login and the product manager

use std::path::PathBuf;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use tempfile::TempDir;
use tower::ServiceExt;

use corner_shop_core::{Order, Price, Product, ProductId};
use corner_shop_storefront::{config::ShopConfig, routes, state::AppState, store::FileStorage};

/// A running shop with its own data directory and a single browser session.
pub struct TestShop {
    dir: TempDir,
    app: Router,
    state: AppState,
    cookie: Option<String>,
}

/// What the shop answered.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    /// `Location` header of redirects.
    pub location: Option<String>,
    pub body: String,
}

impl TestResponse {
    /// Assert a `303 See Other` to `to` and return self for chaining.
    #[track_caller]
    pub fn assert_redirect(&self, to: &str) -> &Self {
        assert_eq!(self.status, StatusCode::SEE_OTHER, "body: {}", self.body);
        assert_eq!(self.location.as_deref(), Some(to));
        self
    }
}

impl TestShop {
    /// Start a shop whose catalog holds `products`.
    pub async fn with_products(products: Vec<Product>) -> Self {
        let dir = TempDir::new().expect("Failed to create data directory");
        let config = ShopConfig::local(dir.path());
        let state = AppState::from_config(config)
            .await
            .expect("Failed to open data directory");
        state
            .storage()
            .save_products(&products)
            .await
            .expect("Failed to seed catalog");

        Self {
            dir,
            app: routes::app(state.clone()),
            state,
            cookie: None,
        }
    }

    /// Start a shop with the default three-product catalog.
    pub async fn new() -> Self {
        Self::with_products(default_products()).await
    }

    /// Shop storage, for inspecting what requests persisted.
    #[must_use]
    pub fn storage(&self) -> &FileStorage {
        self.state.storage()
    }

    /// Path of a file in the data directory.
    #[must_use]
    pub fn data_file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Products currently in the snapshot.
    pub async fn products(&self) -> Vec<Product> {
        self.storage()
            .load_products()
            .await
            .expect("Failed to load catalog")
    }

    /// Orders currently in the order log, oldest first.
    #[must_use]
    pub fn orders(&self) -> Vec<Order> {
        read_file(&self.data_file("orders.jsonl"))
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).expect("Malformed order line"))
            .collect()
    }

    /// Lines of the audit log.
    #[must_use]
    pub fn audit_lines(&self) -> Vec<String> {
        read_file(&self.data_file("audit.log"))
            .lines()
            .map(str::to_owned)
            .collect()
    }

    /// Drop the session cookie, as a different browser would.
    pub fn new_visitor(&mut self) {
        self.cookie = None;
    }

    /// Issue a GET with the current session cookie.
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = self
            .request("GET", uri)
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(request).await
    }

    /// Issue a form POST with the current session cookie.
    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let request = self
            .request("POST", uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .expect("Failed to build request");
        self.send(request).await
    }

    /// Add `qty` of a product to the cart.
    pub async fn add_to_cart(&mut self, product_id: &str, qty: &str) -> TestResponse {
        self.post_form("/cart/add", &[("product_id", product_id), ("qty", qty)])
            .await
    }

    /// Submit the checkout form with a complete buyer.
    pub async fn checkout(&mut self) -> TestResponse {
        self.post_form(
            "/checkout",
            &[
                ("name", "Ada Lovelace"),
                ("email", "ada@example.com"),
                ("address", "12 Analytical Row"),
            ],
        )
        .await
    }

    /// Log in with the default admin credentials.
    pub async fn login_admin(&mut self) -> TestResponse {
        self.post_form(
            "/admin/login",
            &[("username", "admin"), ("password", "12345")],
        )
        .await
    }

    fn request(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");

        if let Some(cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
        {
            self.cookie = Some(cookie.to_owned());
        }

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");

        TestResponse {
            status,
            location,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

fn read_file(path: &std::path::Path) -> String {
    std::fs::read_to_string(path).unwrap_or_default()
}

/// Build a product.
#[must_use]
pub fn product(id: &str, name: &str, price: &str, stock: u32, category: Option<&str>) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        price: Price::parse(price).expect("Invalid test price"),
        stock,
        category: category.map(str::to_owned),
        image: None,
    }
}

/// Three products across two categories, one of them scarce.
#[must_use]
pub fn default_products() -> Vec<Product> {
    vec![
        product("P-AAAA", "Blue Mug", "12.50", 5, Some("Kitchen")),
        product("P-BBBB", "Tea Towel", "4.00", 20, Some("Kitchen")),
        product("P-CCCC", "Desk Lamp", "30.00", 1, Some("Office")),
    ]
}
