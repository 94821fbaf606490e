//! Checkout workflow.
//!
//! Turns a session cart into a persisted order:
//!
//! 1. The resolved cart must not be empty.
//! 2. Buyer name, email and address must be non-empty after trimming.
//! 3. Under the catalog lock, every line is re-checked against a freshly
//!    loaded snapshot. The first line exceeding stock aborts with nothing
//!    changed.
//! 4. The order is appended to the order log.
//! 5. Purchased quantities are deducted and the snapshot saved.
//! 6. The cart is cleared and the checkout audited.
//!
//! Steps 4 and 5 are not atomic: a crash between them leaves an order whose
//! stock was never deducted.

use chrono::{Local, Utc};
use serde::Deserialize;
use thiserror::Error;

use corner_shop_core::{Buyer, Cart, Order};

use crate::store::{AppendLog, ProductSnapshot, Storage, StoreError};

/// Errors that can occur during checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing in the cart resolves against the catalog.
    #[error("cart is empty")]
    EmptyCart,

    /// A required buyer field is blank.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// A line asks for more units than are in stock.
    #[error("not enough stock for {name}")]
    InsufficientStock { name: String },

    /// Data file operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Raw buyer details as submitted by the checkout form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BuyerInput {
    pub name: String,
    pub email: String,
    pub address: String,
}

impl BuyerInput {
    /// Trim every field and require all three to be present.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::MissingField` naming the first blank field.
    pub fn validate(&self) -> Result<Buyer, CheckoutError> {
        let name = required(&self.name, "name")?;
        let email = required(&self.email, "email")?;
        let address = required(&self.address, "address")?;
        Ok(Buyer {
            name,
            email,
            address,
        })
    }
}

fn required(value: &str, field: &'static str) -> Result<String, CheckoutError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CheckoutError::MissingField(field));
    }
    Ok(value.to_owned())
}

/// Checkout service.
pub struct CheckoutService<'a, S, L> {
    storage: &'a Storage<S, L>,
}

impl<'a, S: ProductSnapshot, L: AppendLog> CheckoutService<'a, S, L> {
    #[must_use]
    pub const fn new(storage: &'a Storage<S, L>) -> Self {
        Self { storage }
    }

    /// Fail early if the cart has nothing to buy.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if no cart line resolves.
    pub async fn ensure_not_empty(&self, cart: &Cart) -> Result<(), CheckoutError> {
        let products = self.storage.load_products().await?;
        if cart.resolve(&products).is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        Ok(())
    }

    /// Place an order for the cart's contents.
    ///
    /// On success the cart is cleared and the stored order returned. On any
    /// error the cart, the catalog and the order log are left untouched.
    ///
    /// # Errors
    ///
    /// See [`CheckoutError`].
    pub async fn place_order(
        &self,
        cart: &mut Cart,
        input: &BuyerInput,
    ) -> Result<Order, CheckoutError> {
        self.ensure_not_empty(cart).await?;
        let buyer = input.validate()?;

        let mut catalog = self.storage.begin_catalog_write().await?;

        let summary = cart.resolve(&catalog.products);
        if summary.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        if let Some(line) = summary.lines.iter().find(|line| line.qty > line.stock) {
            tracing::info!(
                product_id = %line.product_id,
                requested = line.qty,
                stock = line.stock,
                "Checkout rejected: insufficient stock"
            );
            return Err(CheckoutError::InsufficientStock {
                name: line.name.clone(),
            });
        }

        let now = Local::now();
        let order = Order::from_cart(
            self.storage.next_order_id(&now),
            buyer,
            &summary,
            now.with_timezone(&Utc),
        );
        self.storage.append_order(&order).await?;

        for item in &order.items {
            if let Some(product) = catalog.products.iter_mut().find(|p| p.id == item.id) {
                product.stock = product.stock.saturating_sub(item.qty);
            }
        }
        catalog.commit().await?;

        cart.clear();

        self.storage
            .log_action(
                "checkout",
                &[
                    ("order_id", order.id.to_string()),
                    ("total", format!("{:.2}", order.total.amount())),
                    ("items", order.items.len().to_string()),
                ],
            )
            .await;

        tracing::info!(order_id = %order.id, total = %order.total, "Order placed");

        Ok(order)
    }
}
