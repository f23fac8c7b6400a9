//! Order history against the fake backend.

#![allow(clippy::unwrap_used)]

use axum::http::{Method, StatusCode};
use rust_decimal::Decimal;
use serde_json::json;
use shopfront_client::orders::{ORDERS_PATH, OrdersError, OrdersService};
use shopfront_client::session::InMemorySession;
use shopfront_client::views::{OrderProductRow, OrderRow};
use shopfront_core::{BadgeStyle, CurrentUser, OrderId, UserId};
use shopfront_integration_tests::{FakeBackend, Stub};

fn orders_for(backend: &FakeBackend, session: InMemorySession) -> OrdersService {
    let (store, tokens) = session.shared();
    OrdersService::new(backend.api_client(tokens), store)
}

fn signed_in() -> InMemorySession {
    InMemorySession::signed_in(CurrentUser::new(UserId::new("665f1c2ab4")), "tok_orders")
}

fn order_list() -> serde_json::Value {
    json!([
        {
            "_id": "6660aa01",
            "id": "ORD-1001",
            "paymentId": "pay_77",
            "name": "Asha Rao",
            "phoneNumber": 9_876_543_210_u64,
            "address": "12 MG Road, Bengaluru",
            "pincode": 560_001,
            "amount": 1250,
            "email": "asha@example.com",
            "userid": "665f1c2ab4",
            "status": "pending",
            "date": "2024-06-05T10:15:30.000Z"
        },
        {
            "_id": "6660aa02",
            "name": "Asha Rao",
            "amount": 499.5,
            "status": "Delivered",
            "date": "2024-05-28T08:00:00.000Z"
        }
    ])
}

#[tokio::test]
async fn test_list_orders_queries_by_user() {
    let backend = FakeBackend::start(vec![Stub::json(Method::GET, ORDERS_PATH, order_list())])
        .await
        .unwrap();
    let orders = orders_for(&backend, signed_in());

    let list = orders
        .list_orders(&UserId::new("665f1c2ab4"))
        .await
        .unwrap();
    assert_eq!(list.len(), 2);

    let request = &backend.requests()[0];
    assert_eq!(request.query.as_deref(), Some("userid=665f1c2ab4"));
    assert_eq!(request.authorization.as_deref(), Some("Bearer tok_orders"));
}

#[tokio::test]
async fn test_list_current_user_orders_renders_rows() {
    let backend = FakeBackend::start(vec![Stub::json(Method::GET, ORDERS_PATH, order_list())])
        .await
        .unwrap();
    let orders = orders_for(&backend, signed_in());

    let list = orders.list_current_user_orders().await.unwrap();
    let rows: Vec<OrderRow> = list.iter().map(OrderRow::from).collect();

    assert_eq!(rows[0].order_id, "6660aa01");
    assert_eq!(rows[0].phone_number, "9876543210");
    assert_eq!(rows[0].pincode, "560001");
    assert_eq!(rows[0].amount, "1250");
    assert_eq!(rows[0].date, "2024-06-05");
    assert_eq!(rows[0].badge, BadgeStyle::Danger);

    assert_eq!(rows[1].status, "Delivered");
    assert_eq!(rows[1].badge, BadgeStyle::Success);
    assert_eq!(rows[1].amount, "499.5");
}

#[tokio::test]
async fn test_empty_order_list() {
    let backend = FakeBackend::start(vec![Stub::json(Method::GET, ORDERS_PATH, json!([]))])
        .await
        .unwrap();
    let orders = orders_for(&backend, signed_in());

    assert!(orders.list_current_user_orders().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_order_products() {
    let backend = FakeBackend::start(vec![Stub::json(
        Method::GET,
        "/api/orders/6660aa01",
        json!({
            "_id": "6660aa01",
            "products": [
                {
                    "productId": "p-1",
                    "productTitle": "Kashmiri Saffron Premium Grade A Threads 2g",
                    "image": "https://cdn.example.in/saffron.png",
                    "quantity": 2,
                    "price": 500,
                    "subTotal": 1000
                }
            ]
        }),
    )])
    .await
    .unwrap();
    let orders = orders_for(&backend, signed_in());

    let products = orders
        .get_order_products(&OrderId::new("6660aa01"))
        .await
        .unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].sub_total, Decimal::new(1000, 0));

    let row = OrderProductRow::from(&products[0]);
    assert_eq!(row.title, "Kashmiri Saffron Premium Grade...");
    assert_eq!(row.quantity, 2);
}

#[tokio::test]
async fn test_signed_out_sends_nothing() {
    let backend = FakeBackend::start(vec![Stub::json(Method::GET, ORDERS_PATH, order_list())])
        .await
        .unwrap();
    let orders = orders_for(&backend, InMemorySession::signed_out());

    let err = orders.list_current_user_orders().await.unwrap_err();
    assert!(matches!(err, OrdersError::NotSignedIn));

    let err = orders
        .get_order_products(&OrderId::new("6660aa01"))
        .await
        .unwrap_err();
    assert!(matches!(err, OrdersError::NotSignedIn));

    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_unknown_order_is_transport_error() {
    let backend = FakeBackend::start(Vec::new()).await.unwrap();
    let orders = orders_for(&backend, signed_in());

    let err = orders
        .get_order_products(&OrderId::new("missing"))
        .await
        .unwrap_err();

    let OrdersError::Transport(api_err) = &err else {
        panic!("expected transport error, got {err:?}");
    };
    assert_eq!(api_err.status(), Some(StatusCode::NOT_FOUND));
    assert!(err.alert().is_error());
}
