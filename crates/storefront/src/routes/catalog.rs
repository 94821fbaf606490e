//! Catalog route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::instrument;

use corner_shop_core::Product;

use super::Chrome;
use crate::error::AppError;
use crate::middleware::ShopSession;
use crate::services::catalog::list_products;
use crate::state::AppState;

/// Catalog query parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CatalogQuery {
    pub q: String,
    pub category: String,
}

/// Product display data for templates.
#[derive(Debug, Clone)]
pub struct ProductCard {
    pub id: String,
    pub name: String,
    pub price: String,
    pub stock: u32,
    /// Empty when the product has no category.
    pub category: String,
    /// Empty when the product has no image.
    pub image: String,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            price: product.price.to_string(),
            stock: product.stock,
            category: product.category().unwrap_or_default().to_owned(),
            image: product.image().unwrap_or_default().to_owned(),
        }
    }
}

/// Category filter option.
#[derive(Debug, Clone)]
pub struct CategoryOption {
    pub name: String,
    pub selected: bool,
}

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog.html")]
pub struct CatalogTemplate {
    pub chrome: Chrome,
    pub products: Vec<ProductCard>,
    pub categories: Vec<CategoryOption>,
    pub query: String,
    /// Empty when no order has been placed in this session.
    pub last_order_id: String,
}

/// Display the catalog, optionally filtered.
#[instrument(skip(state, shop))]
pub async fn index(
    State(state): State<AppState>,
    shop: ShopSession,
    Query(query): Query<CatalogQuery>,
) -> Result<CatalogTemplate, AppError> {
    let products = state.storage().load_products().await?;
    let listing = list_products(products, Some(&query.q), Some(&query.category));
    let selected = query.category.trim();

    let chrome = Chrome::load(&state, &shop).await?;

    Ok(CatalogTemplate {
        chrome,
        products: listing.products.iter().map(ProductCard::from).collect(),
        categories: listing
            .categories
            .into_iter()
            .map(|name| CategoryOption {
                selected: name == selected,
                name,
            })
            .collect(),
        query: query.q.trim().to_owned(),
        last_order_id: shop
            .last_order_id()
            .await
            .map(|id| id.to_string())
            .unwrap_or_default(),
    })
}
