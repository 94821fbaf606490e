//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Catalog (query: q, category)
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (catalog loads)
//!
//! # Cart
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart (product_id, qty)
//! POST /cart/update            - Set quantity, <= 0 removes (product_id, qty)
//!
//! # Checkout
//! GET  /checkout               - Buyer details form
//! POST /checkout               - Place order
//! GET  /order/{order_id}       - Order summary
//!
//! # Admin
//! GET  /admin/login            - Login page
//! POST /admin/login            - Login action
//! GET  /admin/logout           - Logout action
//! GET  /admin/products         - Product manager (requires admin)
//! POST /admin/products         - Create or update a product (requires admin)
//! ```

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod health;
pub mod orders;

use axum::{
    Router,
    body::Body,
    http::Request,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::error::AppError;
use crate::middleware::{ShopSession, create_session_layer, request_id_middleware};
use crate::models::Flash;
use crate::services::cart::CartService;
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(admin::login_page).post(admin::login))
        .route("/logout", get(admin::logout))
        .route("/products", get(admin::products).post(admin::save_product))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::index))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/cart", cart_routes())
        .route("/checkout", get(checkout::form).post(checkout::submit))
        .route("/order/{order_id}", get(orders::show))
        .nest("/admin", admin_routes())
}

/// Build the complete application: routes, static files, sessions, request
/// ids and tracing.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());
    let static_dir = ServeDir::new(&state.config().static_dir);

    Router::new()
        .merge(routes())
        .nest_service("/static", static_dir)
        .layer(session_layer)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}

// =============================================================================
// Page Chrome
// =============================================================================

/// Values the shared page header renders on every full page.
pub struct Chrome {
    pub cart_total: String,
    pub cart_count: u32,
    pub is_admin: bool,
    /// `ok` or `error`; empty when there is no notice.
    pub flash_kind: String,
    pub flash_message: String,
}

impl Chrome {
    /// Gather header values for the current visitor.
    ///
    /// Consumes the pending flash notice, so call it only for pages that are
    /// actually rendered.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the catalog cannot be loaded.
    pub async fn load(state: &AppState, shop: &ShopSession) -> Result<Self, AppError> {
        let cart = shop.cart().await;
        let summary = CartService::new(state.storage()).summary(&cart).await?;
        let flash = shop.take_flash().await;

        Ok(Self {
            cart_total: summary.total.to_string(),
            cart_count: cart.item_count(),
            is_admin: shop.current_admin().await.is_some(),
            flash_kind: flash.as_ref().map(|f| f.kind.to_string()).unwrap_or_default(),
            flash_message: flash.map(|f| f.message).unwrap_or_default(),
        })
    }
}

/// Queue a flash notice and redirect.
///
/// # Errors
///
/// Returns `AppError::Session` if the notice cannot be stored.
pub async fn redirect_with(shop: &ShopSession, flash: Flash, to: &str) -> Result<Response, AppError> {
    shop.flash(flash).await?;
    Ok(Redirect::to(to).into_response())
}
