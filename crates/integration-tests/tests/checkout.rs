//! Order placement, stock handling and order lookup.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::StatusCode;
use corner_shop_core::Price;
use corner_shop_integration_tests::TestShop;

fn order_path(location: Option<&str>) -> String {
    let location = location.unwrap();
    assert!(location.starts_with("/order/"), "unexpected redirect {location}");
    location.to_owned()
}

#[tokio::test]
async fn test_checkout_with_empty_cart_redirects_home() {
    let mut shop = TestShop::new().await;

    shop.get("/checkout").await.assert_redirect("/");
    let resp = shop.get("/").await;
    assert!(resp.body.contains("Your cart is empty."));

    shop.checkout().await.assert_redirect("/");
    assert!(shop.orders().is_empty());
}

#[tokio::test]
async fn test_checkout_form_shows_summary() {
    let mut shop = TestShop::new().await;
    shop.add_to_cart("P-BBBB", "3").await;

    let resp = shop.get("/checkout").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("3 &times; Tea Towel"));
    assert!(resp.body.contains("Total: $12.00"));
}

#[tokio::test]
async fn test_place_order_end_to_end() {
    let mut shop = TestShop::new().await;
    shop.add_to_cart("P-AAAA", "2").await;
    shop.add_to_cart("P-BBBB", "1").await;

    let resp = shop.checkout().await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    let path = order_path(resp.location.as_deref());

    // One order line with the buyer, items and total.
    let orders = shop.orders();
    assert_eq!(orders.len(), 1);
    let order = &orders[0];
    assert_eq!(path, format!("/order/{}", order.id));
    assert_eq!(order.buyer.name, "Ada Lovelace");
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.total, Price::parse("29.00").unwrap());

    // Stock is decremented.
    let products = shop.products().await;
    assert_eq!(products[0].stock, 3);
    assert_eq!(products[1].stock, 19);
    assert_eq!(products[2].stock, 1);

    // The cart is emptied and the order page renders.
    let resp = shop.get(&path).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Order placed!"));
    assert!(resp.body.contains(order.id.as_str()));
    assert!(resp.body.contains("12 Analytical Row"));
    assert!(resp.body.contains("$29.00"));
    assert!(resp.body.contains("Cart (0) &middot; $0.00"));

    // The catalog links to the last order.
    let resp = shop.get("/").await;
    assert!(resp.body.contains(&format!(r#"<a href="{path}">"#)));

    let audit = shop.audit_lines();
    let last = audit.last().unwrap();
    assert!(last.contains(&format!(
        "| checkout | order_id={}, total=29.00, items=2",
        order.id
    )));
}

#[tokio::test]
async fn test_insufficient_stock_changes_nothing() {
    let mut shop = TestShop::new().await;
    shop.add_to_cart("P-AAAA", "1").await;
    shop.add_to_cart("P-CCCC", "1").await;
    shop.post_form("/cart/update", &[("product_id", "P-CCCC"), ("qty", "3")])
        .await;
    let before = shop.products().await;

    shop.checkout().await.assert_redirect("/cart");

    let resp = shop.get("/cart").await;
    assert!(resp.body.contains("Insufficient stock for Desk Lamp."));
    assert!(resp.body.contains("Cart (4)"));
    assert!(shop.orders().is_empty());
    assert_eq!(shop.products().await, before);
}

#[tokio::test]
async fn test_missing_buyer_field() {
    let mut shop = TestShop::new().await;
    shop.add_to_cart("P-AAAA", "1").await;

    shop.post_form(
        "/checkout",
        &[("name", "Ada"), ("email", "   "), ("address", "Somewhere")],
    )
    .await
    .assert_redirect("/checkout");

    let resp = shop.get("/checkout").await;
    assert!(resp.body.contains("All fields are required."));
    assert!(shop.orders().is_empty());
}

#[tokio::test]
async fn test_order_ids_are_unique() {
    let mut shop = TestShop::new().await;

    for _ in 0..3 {
        shop.add_to_cart("P-BBBB", "1").await;
        shop.checkout().await;
    }

    let orders = shop.orders();
    assert_eq!(orders.len(), 3);
    assert_ne!(orders[0].id, orders[1].id);
    assert_ne!(orders[1].id, orders[2].id);
    assert_ne!(orders[0].id, orders[2].id);
    assert_eq!(shop.products().await[1].stock, 17);
}

#[tokio::test]
async fn test_unknown_order() {
    let mut shop = TestShop::new().await;

    shop.get("/order/20240101-000000-FFFF")
        .await
        .assert_redirect("/");
    let resp = shop.get("/").await;
    assert!(resp.body.contains("Order not found."));
}

#[tokio::test]
async fn test_orders_are_visible_from_other_sessions() {
    let mut shop = TestShop::new().await;
    shop.add_to_cart("P-AAAA", "1").await;
    let path = order_path(shop.checkout().await.location.as_deref());

    shop.new_visitor();
    let resp = shop.get(&path).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Ada Lovelace"));
}

#[tokio::test]
async fn test_scarce_product_walkthrough() {
    let mut shop = TestShop::new().await;

    shop.add_to_cart("P-AAAA", "3").await;
    assert!(shop.get("/cart").await.body.contains("Cart (3)"));
    shop.add_to_cart("P-AAAA", "4").await;
    assert!(shop.get("/cart").await.body.contains("Cart (5)"));

    let resp = shop.checkout().await;
    assert!(resp.location.as_deref().unwrap().starts_with("/order/"));
    assert_eq!(shop.products().await[0].stock, 0);

    // Restock to 5 and try to buy 6.
    shop.login_admin().await;
    shop.post_form(
        "/admin/products",
        &[
            ("id", "P-AAAA"),
            ("name", "Blue Mug"),
            ("category", "Kitchen"),
            ("price", "12.50"),
            ("stock", "5"),
        ],
    )
    .await;
    shop.add_to_cart("P-AAAA", "1").await;
    shop.post_form("/cart/update", &[("product_id", "P-AAAA"), ("qty", "6")])
        .await;

    shop.checkout().await.assert_redirect("/cart");
    assert_eq!(shop.products().await[0].stock, 5);
    assert_eq!(shop.orders().len(), 1);
}
