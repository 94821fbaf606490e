//! Session cart and its resolution against the catalog.
//!
//! A [`Cart`] only stores product identifiers and requested quantities.
//! Names, prices and stock are always re-read from the current catalog via
//! [`Cart::resolve`], so a product removed from the catalog silently drops
//! out of every cart that references it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{Price, Product, ProductId};

/// One requested product in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    pub product_id: ProductId,
    pub qty: u32,
}

/// Per-session mapping from product identifier to requested quantity.
///
/// Entries keep their insertion order for display. Quantities are always
/// positive; setting a quantity to zero removes the entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Whether the cart has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The raw entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Requested quantity for a product, zero if absent.
    #[must_use]
    pub fn quantity(&self, product_id: &ProductId) -> u32 {
        self.entries
            .iter()
            .find(|e| &e.product_id == product_id)
            .map_or(0, |e| e.qty)
    }

    /// Total number of units across all entries.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.entries
            .iter()
            .fold(0_u32, |acc, e| acc.saturating_add(e.qty))
    }

    /// Add `qty` units of a product, clamped by the product's stock.
    ///
    /// `qty` is floored at 1. When `stock > 0` the resulting quantity is
    /// `min(existing + qty, stock)`. When `stock == 0` no ceiling applies and
    /// the quantity is `existing + qty`; checkout rejects the line later.
    ///
    /// Returns the new quantity for the product.
    pub fn add(&mut self, product_id: &ProductId, qty: u32, stock: u32) -> u32 {
        let qty = qty.max(1);
        let mut new_qty = self.quantity(product_id).saturating_add(qty);
        if stock > 0 {
            new_qty = new_qty.min(stock);
        }
        self.put(product_id, new_qty);
        new_qty
    }

    /// Set the quantity of a product; a quantity `<= 0` removes it.
    ///
    /// Returns `true` if the product was removed (or absent), `false` if a
    /// positive quantity was stored.
    pub fn set(&mut self, product_id: &ProductId, qty: i64) -> bool {
        if qty <= 0 {
            self.remove(product_id);
            return true;
        }
        let qty = u32::try_from(qty).unwrap_or(u32::MAX);
        self.put(product_id, qty);
        false
    }

    /// Remove a product from the cart.
    pub fn remove(&mut self, product_id: &ProductId) {
        self.entries.retain(|e| &e.product_id != product_id);
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn put(&mut self, product_id: &ProductId, qty: u32) {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|e| &e.product_id == product_id)
        {
            entry.qty = qty;
        } else {
            self.entries.push(CartEntry {
                product_id: product_id.clone(),
                qty,
            });
        }
    }

    /// Join the cart against the current catalog.
    ///
    /// Entries whose product no longer exists are skipped. The result is
    /// computed fresh on every call.
    #[must_use]
    pub fn resolve(&self, products: &[Product]) -> CartSummary {
        let by_id: HashMap<&ProductId, &Product> = products.iter().map(|p| (&p.id, p)).collect();

        let lines: Vec<CartLine> = self
            .entries
            .iter()
            .filter_map(|entry| {
                let product = by_id.get(&entry.product_id)?;
                Some(CartLine {
                    product_id: entry.product_id.clone(),
                    name: product.name.clone(),
                    price: product.price,
                    qty: entry.qty,
                    line_total: product.price.times(entry.qty),
                    stock: product.stock,
                    image: product.image().map(str::to_owned),
                })
            })
            .collect();

        let total = lines.iter().map(|l| l.line_total).sum();

        CartSummary { lines, total }
    }
}

/// A cart entry joined with its current catalog data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
    pub qty: u32,
    pub line_total: Price,
    /// Stock at the time of resolution.
    pub stock: u32,
    pub image: Option<String>,
}

/// Resolved cart lines and their grand total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary {
    pub lines: Vec<CartLine>,
    pub total: Price,
}

impl CartSummary {
    /// Whether no line resolved against the catalog.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn product(id: &str, price: &str, stock: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Price::parse(price).unwrap(),
            stock,
            category: None,
            image: None,
        }
    }

    #[test]
    fn test_add_clamps_to_stock() {
        let id = ProductId::new("P-AAAA");
        let mut cart = Cart::new();
        assert_eq!(cart.add(&id, 3, 5), 3);
        assert_eq!(cart.add(&id, 4, 5), 5);
        assert_eq!(cart.quantity(&id), 5);
    }

    #[test]
    fn test_add_floors_quantity_at_one() {
        let id = ProductId::new("P-1");
        let mut cart = Cart::new();
        assert_eq!(cart.add(&id, 0, 10), 1);
    }

    #[test]
    fn test_add_zero_stock_is_not_clamped() {
        let id = ProductId::new("P-1");
        let mut cart = Cart::new();
        assert_eq!(cart.add(&id, 2, 0), 2);
        assert_eq!(cart.add(&id, 3, 0), 5);
    }

    #[test]
    fn test_set_zero_removes() {
        let id = ProductId::new("P-1");
        let mut cart = Cart::new();
        cart.add(&id, 2, 10);
        assert!(!cart.set(&id, 4));
        assert_eq!(cart.quantity(&id), 4);
        assert!(cart.set(&id, 0));
        assert!(cart.is_empty());
        cart.add(&id, 1, 10);
        assert!(cart.set(&id, -3));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_resolve_totals_and_drops_missing_products() {
        let products = vec![product("A", "2.50", 10), product("B", "1.00", 10)];
        let mut cart = Cart::new();
        cart.add(&ProductId::new("A"), 2, 10);
        cart.add(&ProductId::new("GONE"), 1, 10);
        cart.add(&ProductId::new("B"), 3, 10);

        let summary = cart.resolve(&products);
        assert_eq!(summary.lines.len(), 2);
        assert_eq!(summary.lines[0].product_id.as_str(), "A");
        assert_eq!(summary.lines[0].line_total, Price::parse("5.00").unwrap());
        assert_eq!(summary.lines[1].line_total, Price::parse("3.00").unwrap());
        assert_eq!(summary.total, Price::parse("8.00").unwrap());
    }

    #[test]
    fn test_resolve_reflects_latest_catalog() {
        let mut cart = Cart::new();
        cart.add(&ProductId::new("A"), 1, 10);
        let before = cart.resolve(&[product("A", "1.00", 10)]);
        let after = cart.resolve(&[product("A", "4.00", 10)]);
        assert_eq!(before.total, Price::parse("1").unwrap());
        assert_eq!(after.total, Price::parse("4").unwrap());
    }

    #[test]
    fn test_item_count() {
        let mut cart = Cart::new();
        cart.add(&ProductId::new("A"), 2, 10);
        cart.add(&ProductId::new("B"), 3, 10);
        assert_eq!(cart.item_count(), 5);
    }
}
