//! Checkout route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::IntoResponse, response::Response};
use tracing::instrument;

use super::cart::CartView;
use super::{Chrome, redirect_with};
use crate::error::{AppError, add_breadcrumb};
use crate::middleware::ShopSession;
use crate::models::Flash;
use crate::services::cart::CartService;
use crate::services::checkout::{BuyerInput, CheckoutError, CheckoutService};
use crate::state::AppState;

const EMPTY_CART: &str = "Your cart is empty.";

/// Checkout form template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout.html")]
pub struct CheckoutTemplate {
    pub chrome: Chrome,
    pub cart: CartView,
}

/// Display the buyer details form.
#[instrument(skip(state, shop))]
pub async fn form(State(state): State<AppState>, shop: ShopSession) -> Result<Response, AppError> {
    let cart = shop.cart().await;
    let summary = CartService::new(state.storage()).summary(&cart).await?;
    if summary.is_empty() {
        return redirect_with(&shop, Flash::error(EMPTY_CART), "/").await;
    }

    let chrome = Chrome::load(&state, &shop).await?;
    Ok(CheckoutTemplate {
        chrome,
        cart: CartView::from(&summary),
    }
    .into_response())
}

/// Place the order.
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    shop: ShopSession,
    Form(input): Form<BuyerInput>,
) -> Result<Response, AppError> {
    let mut cart = shop.cart().await;

    match CheckoutService::new(state.storage())
        .place_order(&mut cart, &input)
        .await
    {
        Ok(order) => {
            add_breadcrumb("checkout", "Order placed", &[("order_id", order.id.as_str())]);
            shop.set_cart(&cart).await?;
            shop.set_last_order_id(&order.id).await?;
            redirect_with(&shop, Flash::ok("Order placed!"), &format!("/order/{}", order.id)).await
        }
        Err(CheckoutError::EmptyCart) => redirect_with(&shop, Flash::error(EMPTY_CART), "/").await,
        Err(CheckoutError::MissingField(_)) => {
            redirect_with(&shop, Flash::error("All fields are required."), "/checkout").await
        }
        Err(CheckoutError::InsufficientStock { name }) => {
            let message = format!("Insufficient stock for {name}.");
            redirect_with(&shop, Flash::error(message), "/cart").await
        }
        Err(CheckoutError::Store(e)) => Err(e.into()),
    }
}
