//! Immutable order records.
//!
//! An order is a frozen copy of the cart taken at checkout time. Later
//! catalog edits never change a stored order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CartSummary, OrderId, Price, ProductId};

/// Buyer details captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buyer {
    pub name: String,
    pub email: String,
    pub address: String,
}

/// A purchased line, frozen at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub qty: u32,
}

impl OrderItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.qty)
    }
}

/// A placed order as stored in the order log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub buyer: Buyer,
    pub items: Vec<OrderItem>,
    pub total: Price,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Freeze a resolved cart into an order.
    ///
    /// The total is recomputed from the frozen items.
    #[must_use]
    pub fn from_cart(
        id: OrderId,
        buyer: Buyer,
        cart: &CartSummary,
        created_at: DateTime<Utc>,
    ) -> Self {
        let items: Vec<OrderItem> = cart
            .lines
            .iter()
            .map(|line| OrderItem {
                id: line.product_id.clone(),
                name: line.name.clone(),
                price: line.price,
                qty: line.qty,
            })
            .collect();
        let total = items.iter().map(OrderItem::line_total).sum();

        Self {
            id,
            buyer,
            items,
            total,
            created_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{Cart, Product};

    #[test]
    fn test_from_cart_freezes_lines() {
        let products = vec![Product {
            id: ProductId::new("P-AAAA"),
            name: "Mug".to_string(),
            price: Price::parse("4.00").unwrap(),
            stock: 5,
            category: None,
            image: None,
        }];
        let mut cart = Cart::new();
        cart.add(&ProductId::new("P-AAAA"), 5, 5);

        let order = Order::from_cart(
            OrderId::new("20240101-000000-ABCDEF"),
            Buyer {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                address: "1 Loop Rd".to_string(),
            },
            &cart.resolve(&products),
            Utc::now(),
        );

        assert_eq!(order.items.len(), 1);
        assert_eq!(order.total, Price::parse("20").unwrap());

        let json = serde_json::to_string(&order).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.contains("\"qty\":5"));
        let parsed: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, order);
    }
}
