//! Catalog, cart and health endpoints.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::StatusCode;
use corner_shop_integration_tests::TestShop;

#[tokio::test]
async fn test_health_endpoints() {
    let mut shop = TestShop::new().await;

    let resp = shop.get("/health").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, "ok");

    assert_eq!(shop.get("/health/ready").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_readiness_fails_on_corrupt_catalog() {
    let mut shop = TestShop::new().await;
    std::fs::write(shop.data_file("products.json"), "{not json").unwrap();

    assert_eq!(
        shop.get("/health/ready").await.status,
        StatusCode::SERVICE_UNAVAILABLE
    );
    assert_eq!(
        shop.get("/").await.status,
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[tokio::test]
async fn test_catalog_lists_everything_by_default() {
    let mut shop = TestShop::new().await;

    let resp = shop.get("/").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Blue Mug"));
    assert!(resp.body.contains("Tea Towel"));
    assert!(resp.body.contains("Desk Lamp"));
    assert!(resp.body.contains("$12.50"));
    assert!(resp.body.contains(r#"<option value="Kitchen">Kitchen</option>"#));
    assert!(resp.body.contains(r#"<option value="Office">Office</option>"#));
}

#[tokio::test]
async fn test_catalog_filters_by_name_and_category() {
    let mut shop = TestShop::new().await;

    let resp = shop.get("/?q=MUG").await;
    assert!(resp.body.contains("Blue Mug"));
    assert!(!resp.body.contains("Tea Towel"));
    assert!(!resp.body.contains("Desk Lamp"));

    let resp = shop.get("/?category=Office").await;
    assert!(resp.body.contains("Desk Lamp"));
    assert!(!resp.body.contains("Blue Mug"));
    assert!(resp.body.contains(r#"<option value="Office" selected>Office</option>"#));

    let resp = shop.get("/?q=towel&category=Office").await;
    assert!(resp.body.contains("No products found."));
}

#[tokio::test]
async fn test_add_to_cart_updates_header_and_cart_page() {
    let mut shop = TestShop::new().await;

    shop.add_to_cart("P-AAAA", "2").await.assert_redirect("/cart");

    let resp = shop.get("/cart").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Item added to cart."));
    assert!(resp.body.contains("Cart (2) &middot; $25.00"));
    assert!(resp.body.contains("Blue Mug"));

    // The notice is shown once.
    let resp = shop.get("/cart").await;
    assert!(!resp.body.contains("Item added to cart."));

    let audit = shop.audit_lines();
    assert!(audit[0].ends_with("| add_to_cart | product_id=P-AAAA, qty=2, new_qty=2"));
}

#[tokio::test]
async fn test_add_to_cart_clamps_to_stock() {
    let mut shop = TestShop::new().await;

    shop.add_to_cart("P-AAAA", "4").await;
    shop.add_to_cart("P-AAAA", "4").await;

    let resp = shop.get("/cart").await;
    assert!(resp.body.contains("Cart (5) &middot; $62.50"));
}

#[tokio::test]
async fn test_add_unknown_product() {
    let mut shop = TestShop::new().await;

    shop.add_to_cart("P-NOPE", "1").await.assert_redirect("/");

    let resp = shop.get("/").await;
    assert!(resp.body.contains("Product not found."));
    assert!(resp.body.contains("Cart (0) &middot; $0.00"));
}

#[tokio::test]
async fn test_bad_quantity_adds_one() {
    let mut shop = TestShop::new().await;

    shop.add_to_cart("P-BBBB", "lots").await;

    let resp = shop.get("/cart").await;
    assert!(resp.body.contains("Cart (1) &middot; $4.00"));
}

#[tokio::test]
async fn test_update_and_remove_cart_lines() {
    let mut shop = TestShop::new().await;
    shop.add_to_cart("P-AAAA", "1").await;
    shop.add_to_cart("P-BBBB", "1").await;

    shop.post_form("/cart/update", &[("product_id", "P-BBBB"), ("qty", "3")])
        .await
        .assert_redirect("/cart");
    let resp = shop.get("/cart").await;
    assert!(resp.body.contains("Cart (4) &middot; $24.50"));

    shop.post_form("/cart/update", &[("product_id", "P-AAAA"), ("qty", "0")])
        .await;
    let resp = shop.get("/cart").await;
    assert!(resp.body.contains("Cart (3) &middot; $12.00"));
    assert!(!resp.body.contains("Blue Mug"));

    let audit = shop.audit_lines();
    assert!(audit[2].ends_with("| update_cart | product_id=P-BBBB, qty=3"));
    assert!(audit[3].ends_with("| remove_from_cart | product_id=P-AAAA"));
}

#[tokio::test]
async fn test_sessions_have_separate_carts() {
    let mut shop = TestShop::new().await;
    shop.add_to_cart("P-AAAA", "1").await;
    assert!(shop.get("/cart").await.body.contains("Cart (1)"));

    shop.new_visitor();
    let resp = shop.get("/cart").await;
    assert!(resp.body.contains("Your cart is empty."));
    assert!(resp.body.contains("Cart (0)"));
}
