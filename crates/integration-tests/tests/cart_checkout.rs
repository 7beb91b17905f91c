//! Cart checkout against a live storefront.

use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde_json::json;
use shopfront_cart::{
    CheckoutDetails, CheckoutError, FileStorage, HttpOrderSubmitter, PersistentCart,
};
use shopfront_core::api::Envelope;
use shopfront_core::{Product, ShippingAddress};
use shopfront_integration_tests::{ADMIN_KEY, TestServer};

/// Create a product through the admin API and return it as the server sees it.
async fn create_product(server: &TestServer, name: &str, price: u32, inventory: u32) -> Product {
    let resp = server
        .client()
        .post(server.url("/products"))
        .header("x-api-key", ADMIN_KEY)
        .json(&json!({
            "name": name,
            "description": "integration test product",
            "price": price,
            "category": "Test",
            "inventory": inventory
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    match resp.json::<Envelope<Product>>().await.unwrap() {
        Envelope::Ok(body) => body.data,
        Envelope::Err(e) => panic!("create failed: {}", e.error),
    }
}

fn details() -> CheckoutDetails {
    CheckoutDetails {
        customer_email: "sam@example.com".to_string(),
        customer_name: "Sam Lee".to_string(),
        shipping_address: ShippingAddress::Line("1 Main St, Springfield".to_string()),
    }
}

#[tokio::test]
async fn test_checkout_totals_and_clears_cart() {
    let server = TestServer::start().await;
    let a = create_product(&server, "Ten", 10, 5).await;
    let b = create_product(&server, "Five", 5, 5).await;

    let dir = tempfile::tempdir().unwrap();
    let mut cart = PersistentCart::open(FileStorage::open(dir.path()).unwrap());
    cart.add_item(&a, 1).unwrap();
    cart.add_item(&a, 1).unwrap();
    cart.add_item(&b, 1).unwrap();

    let submitter = HttpOrderSubmitter::new(&server.base_url());
    let order = cart.checkout(details(), &submitter).await.unwrap();

    assert_eq!(order.total_amount, Decimal::from(25));
    assert_eq!(order.items.len(), 2);
    assert!(cart.cart().is_empty());

    // A reload sees the cleared cart.
    let reopened = PersistentCart::open(FileStorage::open(dir.path()).unwrap());
    assert!(reopened.cart().is_empty());

    let orders: serde_json::Value = server
        .client()
        .get(server.url("/orders"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(orders["data"][0]["id"], order.id.as_str());
    assert_eq!(orders["data"][0]["totalAmount"].as_f64(), Some(25.0));
}

#[tokio::test]
async fn test_rejected_checkout_keeps_cart() {
    let server = TestServer::start().await;
    let a = create_product(&server, "Ten", 10, 5).await;

    let dir = tempfile::tempdir().unwrap();
    let mut cart = PersistentCart::open(FileStorage::open(dir.path()).unwrap());
    cart.add_item(&a, 2).unwrap();

    let mut bad = details();
    bad.customer_email = "not-an-email".to_string();

    let submitter = HttpOrderSubmitter::new(&server.base_url());
    let err = cart.checkout(bad, &submitter).await.unwrap_err();
    assert!(matches!(err, CheckoutError::Rejected { status: 400, .. }));

    assert_eq!(cart.cart().item_count(), 2);
    let reopened = PersistentCart::open(FileStorage::open(dir.path()).unwrap());
    assert_eq!(reopened.cart().item_count(), 2);
}

#[tokio::test]
async fn test_unreachable_server_keeps_cart() {
    // Bind and release a port so nothing is listening on it.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let product: Product = serde_json::from_value(json!({
        "id": "1",
        "name": "Ten",
        "description": "",
        "price": 10,
        "category": "Test",
        "stock": 5
    }))
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let mut cart = PersistentCart::open(FileStorage::open(dir.path()).unwrap());
    cart.add_item(&product, 1).unwrap();

    let submitter = HttpOrderSubmitter::new(&format!("http://{addr}"));
    let err = cart.checkout(details(), &submitter).await.unwrap_err();
    assert!(matches!(err, CheckoutError::Transport(_)));
    assert_eq!(cart.cart().item_count(), 1);
}
