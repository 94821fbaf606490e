//! Cart route handlers.
//!
//! The cart lives in the session and is re-resolved against the catalog on
//! every render, so prices and stock shown are always current.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use corner_shop_core::{CartSummary, ProductId};

use super::{Chrome, redirect_with};
use crate::error::AppError;
use crate::middleware::ShopSession;
use crate::models::Flash;
use crate::services::cart::{CartError, CartService, parse_add_qty, parse_update_qty};
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Debug, Clone)]
pub struct CartLineView {
    pub product_id: String,
    pub name: String,
    pub price: String,
    pub qty: u32,
    pub line_total: String,
    pub stock: u32,
    /// Image URL, empty when the product has none.
    pub image: String,
}

/// Resolved cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total: String,
}

impl From<&CartSummary> for CartView {
    fn from(summary: &CartSummary) -> Self {
        Self {
            lines: summary
                .lines
                .iter()
                .map(|line| CartLineView {
                    product_id: line.product_id.to_string(),
                    name: line.name.clone(),
                    price: line.price.to_string(),
                    qty: line.qty,
                    line_total: line.line_total.to_string(),
                    stock: line.stock,
                    image: line.image.clone().unwrap_or_default(),
                })
                .collect(),
            total: summary.total.to_string(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddToCartForm {
    pub product_id: String,
    pub qty: Option<String>,
}

/// Update cart form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub qty: Option<String>,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartTemplate {
    pub chrome: Chrome,
    pub cart: CartView,
}

/// Display cart page.
#[instrument(skip(state, shop))]
pub async fn show(
    State(state): State<AppState>,
    shop: ShopSession,
) -> Result<CartTemplate, AppError> {
    let cart = shop.cart().await;
    let summary = CartService::new(state.storage()).summary(&cart).await?;
    let chrome = Chrome::load(&state, &shop).await?;

    Ok(CartTemplate {
        chrome,
        cart: CartView::from(&summary),
    })
}

/// Add item to cart.
#[instrument(skip(state, shop))]
pub async fn add(
    State(state): State<AppState>,
    shop: ShopSession,
    Form(form): Form<AddToCartForm>,
) -> Result<Response, AppError> {
    let product_id = ProductId::new(form.product_id.trim());
    let qty = parse_add_qty(form.qty.as_deref());

    let mut cart = shop.cart().await;
    match CartService::new(state.storage())
        .add(&mut cart, &product_id, qty)
        .await
    {
        Ok(_) => {
            shop.set_cart(&cart).await?;
            redirect_with(&shop, Flash::ok("Item added to cart."), "/cart").await
        }
        Err(CartError::ProductNotFound) => {
            redirect_with(&shop, Flash::error("Product not found."), "/").await
        }
        Err(CartError::Store(e)) => Err(e.into()),
    }
}

/// Update item quantity; zero or less removes the item.
#[instrument(skip(state, shop))]
pub async fn update(
    State(state): State<AppState>,
    shop: ShopSession,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response, AppError> {
    let product_id = ProductId::new(form.product_id.trim());
    let qty = parse_update_qty(form.qty.as_deref());

    let mut cart = shop.cart().await;
    CartService::new(state.storage())
        .update(&mut cart, &product_id, qty)
        .await;
    shop.set_cart(&cart).await?;

    Ok(Redirect::to("/cart").into_response())
}
