//! Cart operations.
//!
//! The cart itself lives in the session; this service resolves it against
//! the catalog and audits every change.

use thiserror::Error;

use corner_shop_core::{Cart, CartSummary, ProductId};

use crate::store::{AppendLog, ProductSnapshot, Storage, StoreError};

/// Errors that can occur while changing a cart.
#[derive(Debug, Error)]
pub enum CartError {
    /// The product is not in the catalog.
    #[error("product not found")]
    ProductNotFound,

    /// Catalog could not be loaded.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Cart service.
pub struct CartService<'a, S, L> {
    storage: &'a Storage<S, L>,
}

impl<'a, S: ProductSnapshot, L: AppendLog> CartService<'a, S, L> {
    #[must_use]
    pub const fn new(storage: &'a Storage<S, L>) -> Self {
        Self { storage }
    }

    /// Resolve the cart against the current catalog.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the catalog cannot be loaded.
    pub async fn summary(&self, cart: &Cart) -> Result<CartSummary, StoreError> {
        let products = self.storage.load_products().await?;
        Ok(cart.resolve(&products))
    }

    /// Add `qty` units of a product, clamped by its current stock.
    ///
    /// Returns the product's new quantity in the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ProductNotFound` if the product does not exist.
    pub async fn add(
        &self,
        cart: &mut Cart,
        product_id: &ProductId,
        qty: u32,
    ) -> Result<u32, CartError> {
        let products = self.storage.load_products().await?;
        let product = products
            .iter()
            .find(|p| &p.id == product_id)
            .ok_or(CartError::ProductNotFound)?;

        let qty = qty.max(1);
        let new_qty = cart.add(product_id, qty, product.stock);

        self.storage
            .log_action(
                "add_to_cart",
                &[
                    ("product_id", product_id.to_string()),
                    ("qty", qty.to_string()),
                    ("new_qty", new_qty.to_string()),
                ],
            )
            .await;

        Ok(new_qty)
    }

    /// Set a product's quantity; `qty <= 0` removes the line.
    pub async fn update(&self, cart: &mut Cart, product_id: &ProductId, qty: i64) {
        if cart.set(product_id, qty) {
            self.storage
                .log_action("remove_from_cart", &[("product_id", product_id.to_string())])
                .await;
        } else {
            self.storage
                .log_action(
                    "update_cart",
                    &[
                        ("product_id", product_id.to_string()),
                        ("qty", cart.quantity(product_id).to_string()),
                    ],
                )
                .await;
        }
    }
}

/// Quantity for an add-to-cart request: missing or unparsable means 1.
#[must_use]
pub fn parse_add_qty(raw: Option<&str>) -> u32 {
    let qty = raw
        .and_then(|r| r.trim().parse::<i64>().ok())
        .unwrap_or(1)
        .max(1);
    u32::try_from(qty).unwrap_or(u32::MAX)
}

/// Quantity for a cart update: missing or unparsable means 0 (remove).
#[must_use]
pub fn parse_update_qty(raw: Option<&str>) -> i64 {
    raw.and_then(|r| r.trim().parse::<i64>().ok()).unwrap_or(0)
}
