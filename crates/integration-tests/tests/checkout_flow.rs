//! Checkout against the fake backend: validation, session creation, and the
//! hand-off to the payment widget.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use axum::http::{Method, StatusCode};
use rust_decimal::Decimal;
use serde_json::json;
use shopfront_client::api::StaticToken;
use shopfront_client::checkout::{CART_PATH, Checkout, CheckoutError, PAYMENT_SESSION_PATH};
use shopfront_client::widget::{PaymentWidget, RedirectTarget};
use shopfront_core::{BillingField, BillingForm, CartLine, CurrentUser, UserId};
use shopfront_integration_tests::{FakeBackend, LogCapture, RecordingWidget, Stub};

fn complete_form() -> BillingForm {
    BillingForm {
        full_name: "Asha Rao".to_string(),
        country: "India".to_string(),
        street_address_line1: "12 MG Road".to_string(),
        street_address_line2: "Indiranagar".to_string(),
        city: "Bengaluru".to_string(),
        state: "Karnataka".to_string(),
        zip_code: "560001".to_string(),
        phone_number: "9876543210".to_string(),
        email: "asha@example.com".to_string(),
    }
}

fn shopper() -> CurrentUser {
    CurrentUser::new(UserId::new("665f1c2ab4"))
}

fn cart() -> Vec<CartLine> {
    vec![
        CartLine {
            product_id: None,
            product_title: "Kashmiri Saffron".to_string(),
            quantity: 2,
            price: Decimal::new(500, 0),
            sub_total: Decimal::new(1000, 0),
            image: None,
        },
        CartLine {
            product_id: None,
            product_title: "Ghee".to_string(),
            quantity: 1,
            price: Decimal::new(250, 0),
            sub_total: Decimal::new(250, 0),
            image: None,
        },
    ]
}

fn checkout(backend: &FakeBackend, widget: Option<Arc<dyn PaymentWidget>>) -> Checkout {
    Checkout::new(backend.api_client(Arc::new(StaticToken::new("tok_abc"))), widget)
}

// =============================================================================
// Happy path
// =============================================================================

#[tokio::test]
async fn test_submit_starts_widget_with_session_id() {
    let backend = FakeBackend::start(vec![Stub::json(
        Method::POST,
        PAYMENT_SESSION_PATH,
        json!({"payment_session_id": "sess_123"}),
    )])
    .await
    .unwrap();
    let widget = Arc::new(RecordingWidget::default());
    let checkout = checkout(&backend, Some(widget.clone()));

    let session_id = checkout
        .submit(&complete_form(), &cart(), &shopper())
        .await
        .unwrap();
    assert_eq!(session_id.as_str(), "sess_123");

    let calls = widget.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].payment_session_id.as_str(), "sess_123");
    assert_eq!(calls[0].redirect_target, RedirectTarget::SelfTab);
}

#[tokio::test]
async fn test_submit_sends_payment_request() {
    let backend = FakeBackend::start(vec![Stub::json(
        Method::POST,
        PAYMENT_SESSION_PATH,
        json!({"payment_session_id": "sess_123"}),
    )])
    .await
    .unwrap();
    let checkout = checkout(&backend, Some(Arc::new(RecordingWidget::default())));

    checkout
        .submit(&complete_form(), &cart(), &shopper())
        .await
        .unwrap();

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.path, PAYMENT_SESSION_PATH);
    assert_eq!(request.authorization.as_deref(), Some("Bearer tok_abc"));
    assert_eq!(request.content_type.as_deref(), Some("application/json"));
    assert_eq!(
        request.json().unwrap(),
        json!({
            "amount": 1250.0,
            "userId": "665f1c2ab4",
            "email": "asha@example.com",
            "phone": "9876543210",
            "name": "Asha Rao",
        })
    );
}

#[tokio::test]
async fn test_empty_cart_requests_zero_amount() {
    let backend = FakeBackend::start(vec![Stub::json(
        Method::POST,
        PAYMENT_SESSION_PATH,
        json!({"payment_session_id": "sess_0"}),
    )])
    .await
    .unwrap();
    let checkout = checkout(&backend, Some(Arc::new(RecordingWidget::default())));

    checkout
        .submit(&complete_form(), &[], &shopper())
        .await
        .unwrap();

    let body = backend.requests()[0].json().unwrap();
    assert_eq!(body["amount"], json!(0.0));
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_missing_field_sends_nothing() {
    let backend = FakeBackend::start(Vec::new()).await.unwrap();
    let widget = Arc::new(RecordingWidget::default());
    let checkout = checkout(&backend, Some(widget.clone()));

    let mut form = complete_form();
    form.set(BillingField::City, "");
    form.set(BillingField::Email, "");

    let err = checkout
        .submit(&form, &cart(), &shopper())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CheckoutError::Validation {
            field: BillingField::City
        }
    ));
    assert_eq!(err.alert().message, "Please fill city");
    assert!(backend.requests().is_empty());
    assert!(widget.calls().is_empty());
}

#[tokio::test]
async fn test_missing_session_id_skips_widget() {
    let backend = FakeBackend::start(vec![Stub::json(
        Method::POST,
        PAYMENT_SESSION_PATH,
        json!({"message": "ok"}),
    )])
    .await
    .unwrap();
    let widget = Arc::new(RecordingWidget::default());
    let checkout = checkout(&backend, Some(widget.clone()));

    let err = checkout
        .submit(&complete_form(), &cart(), &shopper())
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::SessionCreation));
    assert_eq!(err.alert().message, "Payment session creation failed.");
    assert!(widget.calls().is_empty());
}

#[tokio::test]
async fn test_server_error_is_transport_failure() {
    let backend = FakeBackend::start(vec![Stub::status(
        Method::POST,
        PAYMENT_SESSION_PATH,
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"error": "gateway down"}),
    )])
    .await
    .unwrap();
    let widget = Arc::new(RecordingWidget::default());
    let checkout = checkout(&backend, Some(widget.clone()));

    let err = checkout
        .submit(&complete_form(), &cart(), &shopper())
        .await
        .unwrap_err();

    let CheckoutError::Transport(api_err) = &err else {
        panic!("expected transport error, got {err:?}");
    };
    assert_eq!(api_err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(
        err.alert().message,
        "Something went wrong with payment initiation."
    );
    assert_eq!(backend.requests().len(), 1);
    assert!(widget.calls().is_empty());
}

#[tokio::test]
async fn test_server_error_is_logged_with_cause() {
    let backend = FakeBackend::start(vec![Stub::status(
        Method::POST,
        PAYMENT_SESSION_PATH,
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"error": "gateway down"}),
    )])
    .await
    .unwrap();
    let checkout = checkout(&backend, Some(Arc::new(RecordingWidget::default())));

    let logs = LogCapture::default();
    let err = {
        let _guard = logs.install();
        checkout
            .submit(&complete_form(), &cart(), &shopper())
            .await
            .unwrap_err()
    };
    assert!(matches!(err, CheckoutError::Transport(_)));

    let errors = logs.errors();
    assert_eq!(errors.len(), 1, "unexpected log: {}", logs.contents());
    let line = &errors[0];
    assert!(line.contains("POST request failed"), "{line}");
    assert!(line.contains("method=POST"), "{line}");
    assert!(
        line.contains(&format!("{}{PAYMENT_SESSION_PATH}", backend.base_url())),
        "{line}"
    );
    assert!(line.contains("status=500"), "{line}");
    assert!(line.contains("gateway down"), "{line}");
}

#[tokio::test]
async fn test_missing_widget_is_integration_unavailable() {
    let backend = FakeBackend::start(vec![Stub::json(
        Method::POST,
        PAYMENT_SESSION_PATH,
        json!({"payment_session_id": "sess_123"}),
    )])
    .await
    .unwrap();
    let checkout = checkout(&backend, None);

    let err = checkout
        .submit(&complete_form(), &cart(), &shopper())
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::IntegrationUnavailable(_)));
    assert_eq!(err.alert().message, "Payment widget is not loaded.");
}

#[tokio::test]
async fn test_failing_widget_is_integration_unavailable() {
    let backend = FakeBackend::start(vec![Stub::json(
        Method::POST,
        PAYMENT_SESSION_PATH,
        json!({"payment_session_id": "sess_123"}),
    )])
    .await
    .unwrap();
    let widget = Arc::new(RecordingWidget::failing("script blocked"));
    let checkout = checkout(&backend, Some(widget.clone()));

    let err = checkout
        .submit(&complete_form(), &cart(), &shopper())
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::IntegrationUnavailable(_)));
    assert_eq!(widget.calls().len(), 1);
}

#[tokio::test]
async fn test_concurrent_submit_is_rejected() {
    let backend = FakeBackend::start(vec![
        Stub::json(
            Method::POST,
            PAYMENT_SESSION_PATH,
            json!({"payment_session_id": "sess_slow"}),
        )
        .delayed(Duration::from_millis(200)),
    ])
    .await
    .unwrap();
    let widget = Arc::new(RecordingWidget::default());
    let checkout = checkout(&backend, Some(widget.clone()));

    let form = complete_form();
    let lines = cart();
    let user = shopper();
    let (first, second) = tokio::join!(
        checkout.submit(&form, &lines, &user),
        checkout.submit(&form, &lines, &user),
    );

    let results = [first, second];
    let rejected = results
        .iter()
        .filter(|result| matches!(result, Err(CheckoutError::SubmissionInProgress)))
        .count();
    let started = results
        .iter()
        .filter(|result| matches!(result, Ok(id) if id.as_str() == "sess_slow"))
        .count();

    assert_eq!(rejected, 1);
    assert_eq!(started, 1);
    assert_eq!(backend.requests().len(), 1);
    assert_eq!(widget.calls().len(), 1);
}

#[tokio::test]
async fn test_guard_released_after_failure() {
    let backend = FakeBackend::start(vec![Stub::json(
        Method::POST,
        PAYMENT_SESSION_PATH,
        json!({}),
    )])
    .await
    .unwrap();
    let checkout = checkout(&backend, Some(Arc::new(RecordingWidget::default())));

    for _ in 0..2 {
        let err = checkout
            .submit(&complete_form(), &cart(), &shopper())
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::SessionCreation));
    }
    assert_eq!(backend.requests().len(), 2);
}

// =============================================================================
// Cart
// =============================================================================

#[tokio::test]
async fn test_load_cart_totals_lines() {
    let backend = FakeBackend::start(vec![Stub::json(
        Method::GET,
        CART_PATH,
        json!([
            {"productTitle": "Kashmiri Saffron", "quantity": 2, "price": 500, "subTotal": 1000},
            {"productTitle": "Ghee", "quantity": 1, "price": 250.5, "subTotal": 250.5},
        ]),
    )])
    .await
    .unwrap();
    let checkout = checkout(&backend, None);

    let summary = checkout.load_cart(&shopper()).await.unwrap();
    assert_eq!(summary.lines.len(), 2);
    assert_eq!(summary.total, Decimal::new(12505, 1));

    let request = &backend.requests()[0];
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.query.as_deref(), Some("userId=665f1c2ab4"));
    assert_eq!(request.authorization.as_deref(), Some("Bearer tok_abc"));
}

#[tokio::test]
async fn test_load_empty_cart() {
    let backend = FakeBackend::start(vec![Stub::json(Method::GET, CART_PATH, json!([]))])
        .await
        .unwrap();
    let checkout = checkout(&backend, None);

    let summary = checkout.load_cart(&shopper()).await.unwrap();
    assert!(summary.lines.is_empty());
    assert_eq!(summary.total, Decimal::ZERO);
}
