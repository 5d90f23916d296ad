//! Integration tests for the API server.

use std::sync::OnceLock;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use metrics_exporter_prometheus::PrometheusHandle;
use store::{CatalogStore, InMemoryStore, UserStore};
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

async fn setup() -> (axum::Router, InMemoryStore) {
    let store = InMemoryStore::new();
    api::seed::seed_demo_data(&store).await.unwrap();
    let state = api::create_state(store.clone());
    let app = api::create_app(state, get_metrics_handle());
    (app, store)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_as(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, token: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Looks up a seeded book's id by title via the public listing.
async fn book_id_by_title(app: &axum::Router, title: &str) -> String {
    let response = app.clone().oneshot(get("/books?limit=100")).await.unwrap();
    let json = body_json(response).await;
    json["books"]
        .as_array()
        .unwrap()
        .iter()
        .find(|book| book["title"] == title)
        .unwrap_or_else(|| panic!("seeded book {title} missing"))["id"]
        .as_str()
        .unwrap()
        .to_string()
}

fn shipping_payload() -> serde_json::Value {
    serde_json::json!({
        "shipping_address": {
            "full_name": "Nguyễn Thị Lan",
            "phone": "0901234567",
            "address": "1 Lê Lợi",
            "city": "Hà Nội"
        },
        "payment_method": "COD"
    })
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = setup().await;

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let (app, _) = setup().await;

    let response = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_list_books_is_public_and_paginated() {
    let (app, _) = setup().await;

    let response = app.clone().oneshot(get("/books")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["total"], 5);
    assert_eq!(json["page"], 1);
    assert_eq!(json["limit"], 12);
    assert_eq!(json["total_pages"], 1);
    assert_eq!(json["books"].as_array().unwrap().len(), 5);

    let response = app.oneshot(get("/books?page=1&limit=2")).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json["books"].as_array().unwrap().len(), 2);
    assert_eq!(json["total_pages"], 3);
}

#[tokio::test]
async fn test_search_books_by_title() {
    let (app, _) = setup().await;

    let response = app
        .oneshot(get("/books?search=s%E1%BB%91%20%C4%91%E1%BB%8F"))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["books"][0]["title"], "Số Đỏ");
}

#[tokio::test]
async fn test_get_book_by_id() {
    let (app, _) = setup().await;
    let id = book_id_by_title(&app, "Số Đỏ").await;

    let response = app.clone().oneshot(get(&format!("/books/{id}"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["title"], "Số Đỏ");
    assert_eq!(json["price"], 85000);

    let missing = uuid::Uuid::new_v4();
    let response = app
        .clone()
        .oneshot(get(&format!("/books/{missing}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.oneshot(get("/books/not-a-uuid")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cart_requires_authentication() {
    let (app, _) = setup().await;

    let response = app.clone().oneshot(get("/cart")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(get_as("/cart", "bogus-token"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Valid token on a disabled account.
    let response = app
        .oneshot(get_as("/cart", api::seed::DISABLED_TOKEN))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_add_to_cart_and_read_back() {
    let (app, _) = setup().await;
    let id = book_id_by_title(&app, "Số Đỏ").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/cart/items",
            api::seed::CUSTOMER_TOKEN,
            serde_json::json!({ "book_id": id, "quantity": 2 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_as("/cart", api::seed::CUSTOMER_TOKEN))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["items"].as_array().unwrap().len(), 1);
    assert_eq!(json["items"][0]["quantity"], 2);
    assert_eq!(json["items"][0]["line_total"], 170_000);
    assert_eq!(json["items_price"], 170_000);
}

#[tokio::test]
async fn test_cart_rejects_additions_beyond_stock() {
    let (app, _) = setup().await;
    // "Tắt Đèn" is seeded with 25 in stock.
    let id = book_id_by_title(&app, "Tắt Đèn").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/cart/items",
            api::seed::CUSTOMER_TOKEN,
            serde_json::json!({ "book_id": id, "quantity": 26 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Sold-out book.
    let id = book_id_by_title(&app, "Nhật Ký Trong Tù").await;
    let response = app
        .oneshot(json_request(
            "POST",
            "/cart/items",
            api::seed::CUSTOMER_TOKEN,
            serde_json::json!({ "book_id": id, "quantity": 1 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_catalog_writes_require_admin() {
    let (app, _) = setup().await;

    let payload = serde_json::json!({
        "title": "Lão Hạc",
        "description": "Nam Cao",
        "price": 60000,
        "cover_image": "lao-hac.jpg",
        "stock": 15
    });

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/books",
            api::seed::CUSTOMER_TOKEN,
            payload.clone(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/books",
            api::seed::ADMIN_TOKEN,
            payload,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["title"], "Lão Hạc");

    let response = app.oneshot(get("/books?limit=100")).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json["total"], 6);
}

#[tokio::test]
async fn test_invalid_book_payload_is_rejected() {
    let (app, _) = setup().await;

    // Discount not below the base price.
    let response = app
        .oneshot(json_request(
            "POST",
            "/books",
            api::seed::ADMIN_TOKEN,
            serde_json::json!({
                "title": "Lão Hạc",
                "price": 60000,
                "discount_price": 60000,
                "stock": 15
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_book_hides_it_from_the_catalog() {
    let (app, store) = setup().await;
    let id = book_id_by_title(&app, "Số Đỏ").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "DELETE",
            &format!("/books/{id}"),
            api::seed::ADMIN_TOKEN,
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(get(&format!("/books/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.oneshot(get("/books?limit=100")).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json["total"], 4);

    // The record survives for order history.
    let book_id = common::BookId::from(uuid::Uuid::parse_str(&id).unwrap());
    assert!(store.find_book(book_id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_place_order_from_cart() {
    let (app, store) = setup().await;
    let id = book_id_by_title(&app, "Số Đỏ").await;

    app.clone()
        .oneshot(json_request(
            "POST",
            "/cart/items",
            api::seed::CUSTOMER_TOKEN,
            serde_json::json!({ "book_id": id, "quantity": 2 }),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/orders",
            api::seed::CUSTOMER_TOKEN,
            shipping_payload(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let order = body_json(response).await;
    assert_eq!(order["status"], "Pending");
    assert_eq!(order["items_price"], 170_000);
    assert_eq!(order["shipping_price"], 30_000);
    assert_eq!(order["tax_price"], 17_000);
    assert_eq!(order["total_price"], 217_000);
    assert_eq!(order["shipping_address"]["country"], "Việt Nam");
    assert_eq!(order["payment_method"], "COD");

    // Stock was reserved.
    let book_id = common::BookId::from(uuid::Uuid::parse_str(&id).unwrap());
    let book = store.find_book(book_id).await.unwrap().unwrap();
    assert_eq!(book.stock, 28);
    assert_eq!(book.sold_count, 2);

    // The cart was emptied.
    let response = app
        .oneshot(get_as("/cart", api::seed::CUSTOMER_TOKEN))
        .await
        .unwrap();
    let cart = body_json(response).await;
    assert!(cart["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_place_order_with_empty_cart_fails() {
    let (app, _) = setup().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/orders",
            api::seed::CUSTOMER_TOKEN,
            shipping_payload(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_my_orders_and_admin_listing() {
    let (app, _) = setup().await;
    let id = book_id_by_title(&app, "Số Đỏ").await;

    app.clone()
        .oneshot(json_request(
            "POST",
            "/cart/items",
            api::seed::CUSTOMER_TOKEN,
            serde_json::json!({ "book_id": id, "quantity": 1 }),
        ))
        .await
        .unwrap();
    app.clone()
        .oneshot(json_request(
            "POST",
            "/orders",
            api::seed::CUSTOMER_TOKEN,
            shipping_payload(),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(get_as("/orders/my-orders", api::seed::CUSTOMER_TOKEN))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let orders = body_json(response).await;
    assert_eq!(orders.as_array().unwrap().len(), 1);

    // The admin listing includes owner contact details.
    let response = app
        .clone()
        .oneshot(get_as("/orders", api::seed::ADMIN_TOKEN))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let orders = body_json(response).await;
    assert_eq!(orders[0]["customer"]["email"], "lan@example.com");

    // Customers cannot use it.
    let response = app
        .oneshot(get_as("/orders", api::seed::CUSTOMER_TOKEN))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_cancel_order_restores_stock() {
    let (app, store) = setup().await;
    let id = book_id_by_title(&app, "Số Đỏ").await;

    app.clone()
        .oneshot(json_request(
            "POST",
            "/cart/items",
            api::seed::CUSTOMER_TOKEN,
            serde_json::json!({ "book_id": id, "quantity": 3 }),
        ))
        .await
        .unwrap();
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/orders",
            api::seed::CUSTOMER_TOKEN,
            shipping_payload(),
        ))
        .await
        .unwrap();
    let order = body_json(response).await;
    let order_id = order["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/orders/{order_id}/cancel"),
            api::seed::CUSTOMER_TOKEN,
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cancelled = body_json(response).await;
    assert_eq!(cancelled["status"], "Cancelled");
    assert!(cancelled["cancelled_at"].is_string());

    let book_id = common::BookId::from(uuid::Uuid::parse_str(&id).unwrap());
    let book = store.find_book(book_id).await.unwrap().unwrap();
    assert_eq!(book.stock, 30);
    assert_eq!(book.sold_count, 0);

    // Cancelling twice is rejected.
    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/orders/{order_id}/cancel"),
            api::seed::CUSTOMER_TOKEN,
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_status_updates_are_admin_only() {
    let (app, _) = setup().await;
    let id = book_id_by_title(&app, "Số Đỏ").await;

    app.clone()
        .oneshot(json_request(
            "POST",
            "/cart/items",
            api::seed::CUSTOMER_TOKEN,
            serde_json::json!({ "book_id": id, "quantity": 1 }),
        ))
        .await
        .unwrap();
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/orders",
            api::seed::CUSTOMER_TOKEN,
            shipping_payload(),
        ))
        .await
        .unwrap();
    let order = body_json(response).await;
    let order_id = order["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/orders/{order_id}/status"),
            api::seed::CUSTOMER_TOKEN,
            serde_json::json!({ "status": "Shipped" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/orders/{order_id}/status"),
            api::seed::ADMIN_TOKEN,
            serde_json::json!({ "status": "Shipped" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["status"], "Shipped");

    // Unknown status names are rejected before touching the order.
    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/orders/{order_id}/status"),
            api::seed::ADMIN_TOKEN,
            serde_json::json!({ "status": "Teleported" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_order_detail_is_owner_or_admin_only() {
    let (app, store) = setup().await;
    let id = book_id_by_title(&app, "Số Đỏ").await;

    // A second customer account.
    let other = domain::User::customer("Minh", "minh@example.com", "0907654321");
    store.insert_user(&other, "other-token").await.unwrap();

    app.clone()
        .oneshot(json_request(
            "POST",
            "/cart/items",
            api::seed::CUSTOMER_TOKEN,
            serde_json::json!({ "book_id": id, "quantity": 1 }),
        ))
        .await
        .unwrap();
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/orders",
            api::seed::CUSTOMER_TOKEN,
            shipping_payload(),
        ))
        .await
        .unwrap();
    let order = body_json(response).await;
    let order_id = order["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(get_as(
            &format!("/orders/{order_id}"),
            api::seed::CUSTOMER_TOKEN,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let detail = body_json(response).await;
    assert_eq!(detail["customer"]["name"], "Nguyễn Thị Lan");

    let response = app
        .clone()
        .oneshot(get_as(&format!("/orders/{order_id}"), api::seed::ADMIN_TOKEN))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_as(&format!("/orders/{order_id}"), "other-token"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
