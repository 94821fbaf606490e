//! Order summary route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use tracing::instrument;

use corner_shop_core::{Order, OrderId};

use super::{Chrome, redirect_with};
use crate::error::AppError;
use crate::middleware::ShopSession;
use crate::models::Flash;
use crate::state::AppState;

/// Order line display data for templates.
#[derive(Debug, Clone)]
pub struct OrderItemView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub qty: u32,
    pub line_total: String,
}

/// Order display data for templates.
#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: String,
    pub buyer_name: String,
    pub buyer_email: String,
    pub buyer_address: String,
    pub items: Vec<OrderItemView>,
    pub total: String,
    pub created_at: String,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            buyer_name: order.buyer.name.clone(),
            buyer_email: order.buyer.email.clone(),
            buyer_address: order.buyer.address.clone(),
            items: order
                .items
                .iter()
                .map(|item| OrderItemView {
                    id: item.id.to_string(),
                    name: item.name.clone(),
                    price: item.price.to_string(),
                    qty: item.qty,
                    line_total: item.line_total().to_string(),
                })
                .collect(),
            total: order.total.to_string(),
            created_at: order.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        }
    }
}

/// Order summary template.
#[derive(Template, WebTemplate)]
#[template(path = "order.html")]
pub struct OrderTemplate {
    pub chrome: Chrome,
    pub order: OrderView,
}

/// Display a placed order.
#[instrument(skip(state, shop))]
pub async fn show(
    State(state): State<AppState>,
    shop: ShopSession,
    Path(order_id): Path<String>,
) -> Result<Response, AppError> {
    let Some(order) = state.storage().find_order(&OrderId::new(order_id)).await? else {
        return redirect_with(&shop, Flash::error("Order not found."), "/").await;
    };

    let chrome = Chrome::load(&state, &shop).await?;
    Ok(OrderTemplate {
        chrome,
        order: OrderView::from(&order),
    }
    .into_response())
}
