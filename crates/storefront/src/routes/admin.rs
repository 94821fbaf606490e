//! Admin route handlers.
//!
//! Login is checked against the configured credential pair; every product
//! page requires [`RequireAdmin`].

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use corner_shop_core::Product;

use super::{Chrome, redirect_with};
use crate::error::AppError;
use crate::middleware::{RequireAdmin, ShopSession, clear_current_admin, set_current_admin};
use crate::models::{CurrentAdmin, Flash};
use crate::services::admin::{AdminService, ProductForm, UpsertError};
use crate::state::AppState;

/// Admin login form data.
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Admin login page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/login.html")]
pub struct LoginTemplate {
    pub chrome: Chrome,
    /// Empty unless the previous attempt failed.
    pub error: String,
}

/// Product row in the admin product manager.
#[derive(Debug, Clone)]
pub struct AdminProductRow {
    pub id: String,
    pub name: String,
    pub category: String,
    pub image: String,
    /// Plain decimal for the edit form.
    pub price: String,
    pub stock: u32,
}

impl From<&Product> for AdminProductRow {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            category: product.category().unwrap_or_default().to_owned(),
            image: product.image().unwrap_or_default().to_owned(),
            price: format!("{:.2}", product.price.amount()),
            stock: product.stock,
        }
    }
}

/// Admin product manager template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/products.html")]
pub struct AdminProductsTemplate {
    pub chrome: Chrome,
    pub admin: String,
    pub products: Vec<AdminProductRow>,
}

/// Display the login page.
#[instrument(skip(state, shop))]
pub async fn login_page(
    State(state): State<AppState>,
    shop: ShopSession,
) -> Result<LoginTemplate, AppError> {
    Ok(LoginTemplate {
        chrome: Chrome::load(&state, &shop).await?,
        error: String::new(),
    })
}

/// Check credentials and log in.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    shop: ShopSession,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let service = AdminService::new(state.storage(), state.credentials());

    if service.authenticate(&form.username, &form.password).await {
        let admin = CurrentAdmin {
            username: form.username,
        };
        set_current_admin(shop.session(), &admin).await?;
        return Ok(Redirect::to("/admin/products").into_response());
    }

    Ok(LoginTemplate {
        chrome: Chrome::load(&state, &shop).await?,
        error: "Invalid credentials".to_string(),
    }
    .into_response())
}

/// Log out.
#[instrument(skip(shop))]
pub async fn logout(shop: ShopSession) -> Result<Response, AppError> {
    clear_current_admin(shop.session()).await?;
    redirect_with(&shop, Flash::ok("Logged out."), "/").await
}

/// Display the product manager.
#[instrument(skip(state, shop, admin))]
pub async fn products(
    State(state): State<AppState>,
    shop: ShopSession,
    RequireAdmin(admin): RequireAdmin,
) -> Result<AdminProductsTemplate, AppError> {
    let products = state.storage().load_products().await?;

    Ok(AdminProductsTemplate {
        chrome: Chrome::load(&state, &shop).await?,
        admin: admin.username,
        products: products.iter().map(AdminProductRow::from).collect(),
    })
}

/// Create or update a product.
#[instrument(skip(state, shop, admin))]
pub async fn save_product(
    State(state): State<AppState>,
    shop: ShopSession,
    RequireAdmin(admin): RequireAdmin,
    Form(form): Form<ProductForm>,
) -> Result<Response, AppError> {
    let service = AdminService::new(state.storage(), state.credentials());

    match service.upsert_product(&form).await {
        Ok(outcome) => {
            tracing::info!(admin = %admin.username, ?outcome, "Product saved");
            redirect_with(&shop, Flash::ok("Saved."), "/admin/products").await
        }
        Err(UpsertError::Invalid(e)) => {
            redirect_with(&shop, Flash::error(e.to_string()), "/admin/products").await
        }
        Err(UpsertError::Store(e)) => Err(e.into()),
    }
}
