//! Admin catalog manager.
//!
//! Authenticates the administrator and creates or updates catalog products.

mod error;

pub use error::{ProductFormError, UpsertError};

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use corner_shop_core::{Price, PriceError, Product, ProductId};

use crate::config::AdminCredentialsConfig;
use crate::store::{AppendLog, ProductSnapshot, Storage};

/// Checks admin login attempts.
pub trait CredentialVerifier: Send + Sync {
    /// Whether `username` / `password` identify an administrator.
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// A single fixed username and password pair.
pub struct FixedCredentials {
    username: String,
    password: SecretString,
}

impl FixedCredentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }
}

impl From<&AdminCredentialsConfig> for FixedCredentials {
    fn from(config: &AdminCredentialsConfig) -> Self {
        Self::new(config.username.clone(), config.password.clone())
    }
}

impl CredentialVerifier for FixedCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        username == self.username && password == self.password.expose_secret()
    }
}

/// Product form as submitted by the admin panel.
///
/// Every field is optional on the wire; missing price or stock count as `0`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProductForm {
    pub id: Option<String>,
    pub name: String,
    pub category: String,
    pub image: String,
    pub price: Option<String>,
    pub stock: Option<String>,
}

/// A validated product form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInput {
    /// Identifier of the product to update, if one was supplied.
    pub id: Option<ProductId>,
    pub name: String,
    pub category: Option<String>,
    pub image: Option<String>,
    pub price: Price,
    pub stock: u32,
}

impl ProductForm {
    /// Parse and validate the form.
    ///
    /// Numeric checks run first, then the name, then the range checks.
    ///
    /// # Errors
    ///
    /// Returns the first `ProductFormError` that applies.
    pub fn parse(&self) -> Result<ProductInput, ProductFormError> {
        let price = Price::parse(self.price.as_deref().unwrap_or("0"));
        if matches!(price, Err(PriceError::NotNumeric)) {
            return Err(ProductFormError::NotNumeric);
        }
        let stock = self
            .stock
            .as_deref()
            .unwrap_or("0")
            .trim()
            .parse::<i64>()
            .map_err(|_| ProductFormError::NotNumeric)?;

        let name = self.name.trim();
        if name.is_empty() {
            return Err(ProductFormError::NameRequired);
        }

        let price = price.map_err(|e| match e {
            PriceError::TooLarge => ProductFormError::PriceTooLarge,
            PriceError::NotNumeric | PriceError::Negative => ProductFormError::Negative,
        })?;
        if stock < 0 {
            return Err(ProductFormError::Negative);
        }
        let stock = u32::try_from(stock).map_err(|_| ProductFormError::NotNumeric)?;

        Ok(ProductInput {
            id: self
                .id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(ProductId::from),
            name: name.to_owned(),
            category: non_empty(&self.category),
            image: non_empty(&self.image),
            price,
            stock,
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

/// Result of a successful upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created(ProductId),
    Updated(ProductId),
}

/// Admin catalog service.
pub struct AdminService<'a, S, L> {
    storage: &'a Storage<S, L>,
    verifier: &'a dyn CredentialVerifier,
}

impl<'a, S: ProductSnapshot, L: AppendLog> AdminService<'a, S, L> {
    #[must_use]
    pub const fn new(storage: &'a Storage<S, L>, verifier: &'a dyn CredentialVerifier) -> Self {
        Self { storage, verifier }
    }

    /// Check a login attempt and audit it.
    pub async fn authenticate(&self, username: &str, password: &str) -> bool {
        let ok = self.verifier.verify(username, password);

        self.storage
            .log_action(
                "admin_login",
                &[("user", username.to_owned()), ("ok", ok.to_string())],
            )
            .await;

        if ok {
            tracing::info!(user = username, "Admin logged in");
        } else {
            tracing::warn!(user = username, "Admin login failed");
        }

        ok
    }

    /// Create or update a product from a submitted form.
    ///
    /// A recognized id updates that product in place. A missing or unknown id
    /// appends a new product under a freshly generated id.
    ///
    /// # Errors
    ///
    /// Returns `UpsertError::Invalid` without touching the catalog if the
    /// form does not validate.
    pub async fn upsert_product(&self, form: &ProductForm) -> Result<UpsertOutcome, UpsertError> {
        let input = form.parse()?;

        let mut catalog = self.storage.begin_catalog_write().await?;

        let existing = input
            .id
            .as_ref()
            .and_then(|id| catalog.products.iter_mut().find(|p| &p.id == id));

        let outcome = if let Some(product) = existing {
            product.name = input.name;
            product.price = input.price;
            product.stock = input.stock;
            product.category = input.category;
            product.image = input.image;
            UpsertOutcome::Updated(product.id.clone())
        } else {
            let id = fresh_product_id(&catalog.products);
            catalog.products.push(Product {
                id: id.clone(),
                name: input.name,
                price: input.price,
                stock: input.stock,
                category: input.category,
                image: input.image,
            });
            UpsertOutcome::Created(id)
        };

        catalog.commit().await?;

        let (event, id) = match &outcome {
            UpsertOutcome::Created(id) => ("admin_add_product", id),
            UpsertOutcome::Updated(id) => ("admin_update_product", id),
        };
        self.storage
            .log_action(event, &[("product_id", id.to_string())])
            .await;

        Ok(outcome)
    }
}

/// Generate a product id not yet used in `products`.
fn fresh_product_id(products: &[Product]) -> ProductId {
    loop {
        let id = ProductId::generate();
        if products.iter().all(|p| p.id != id) {
            return id;
        }
    }
}
