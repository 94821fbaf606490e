//! Catalog product type.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A product in the catalog snapshot.
///
/// The snapshot file is the single source of truth for price and stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier within the catalog.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Units available for sale.
    #[serde(default)]
    pub stock: u32,
    /// Optional category used for filtering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Optional image URL or path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Product {
    /// The category, if set and non-empty.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }

    /// The image reference, if set and non-empty.
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref().filter(|i| !i.is_empty())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal() {
        let json = r#"{"id": "P-AAAA", "name": "Mug", "price": 8.5}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id.as_str(), "P-AAAA");
        assert_eq!(product.stock, 0);
        assert_eq!(product.category(), None);
    }

    #[test]
    fn test_empty_category_is_none() {
        let json = r#"{"id": "P-1", "name": "Mug", "price": 1, "stock": 2, "category": "", "image": ""}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.category(), None);
        assert_eq!(product.image(), None);
    }

    #[test]
    fn test_negative_stock_rejected() {
        let json = r#"{"id": "P-1", "name": "Mug", "price": 1, "stock": -1}"#;
        assert!(serde_json::from_str::<Product>(json).is_err());
    }
}
