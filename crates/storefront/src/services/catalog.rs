//! Catalog browsing.

use std::collections::BTreeSet;

use corner_shop_core::Product;

/// Filtered product list plus the categories available for filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogListing {
    /// Products matching the filters, in catalog order.
    pub products: Vec<Product>,
    /// Sorted, de-duplicated, non-empty categories of the whole catalog.
    pub categories: Vec<String>,
}

/// Filter the catalog by a name query and an exact category.
///
/// The query is trimmed and matched case-insensitively as a substring of the
/// product name. Empty or whitespace-only filters are ignored. Categories are
/// always collected from the unfiltered catalog.
#[must_use]
pub fn list_products(
    products: Vec<Product>,
    query: Option<&str>,
    category: Option<&str>,
) -> CatalogListing {
    let categories: Vec<String> = products
        .iter()
        .filter_map(Product::category)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect();

    let needle = query
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase);
    let category = category.map(str::trim).filter(|c| !c.is_empty());

    let products = products
        .into_iter()
        .filter(|p| {
            needle
                .as_deref()
                .is_none_or(|n| p.name.to_lowercase().contains(n))
        })
        .filter(|p| category.is_none_or(|c| p.category() == Some(c)))
        .collect();

    CatalogListing {
        products,
        categories,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use corner_shop_core::{Price, ProductId};

    use super::*;

    fn product(id: &str, name: &str, category: Option<&str>) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            price: Price::parse("1.00").unwrap(),
            stock: 1,
            category: category.map(str::to_owned),
            image: None,
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product("P-1", "Blue Mug", Some("Kitchen")),
            product("P-2", "Red Mug", Some("Kitchen")),
            product("P-3", "Notebook", Some("Office")),
            product("P-4", "Sticker", Some("")),
            product("P-5", "Pen", None),
        ]
    }

    #[test]
    fn test_no_filters_returns_everything() {
        let listing = list_products(catalog(), None, None);
        assert_eq!(listing.products.len(), 5);
        assert_eq!(listing.categories, vec!["Kitchen", "Office"]);
    }

    #[test]
    fn test_query_is_case_insensitive_substring() {
        let listing = list_products(catalog(), Some("  mUg "), None);
        let names: Vec<_> = listing.products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Blue Mug", "Red Mug"]);
    }

    #[test]
    fn test_category_is_exact() {
        let listing = list_products(catalog(), None, Some("Office"));
        assert_eq!(listing.products.len(), 1);
        assert_eq!(listing.products[0].name, "Notebook");

        let listing = list_products(catalog(), None, Some("office"));
        assert!(listing.products.is_empty());
    }

    #[test]
    fn test_blank_filters_are_ignored() {
        let listing = list_products(catalog(), Some("   "), Some(""));
        assert_eq!(listing.products.len(), 5);
    }

    #[test]
    fn test_categories_come_from_full_catalog() {
        let listing = list_products(catalog(), Some("pen"), None);
        assert_eq!(listing.products.len(), 1);
        assert_eq!(listing.categories, vec!["Kitchen", "Office"]);
    }
}
