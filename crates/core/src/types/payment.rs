//! Payment-session request and response payloads.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{BillingForm, CurrentUser, UserId, define_id};

define_id!(PaymentSessionId);

/// Body sent to the backend to open a payment session.
///
/// Built once per submission from the billing form, the cart total, and the
/// signed-in user. Never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub user_id: UserId,
    pub email: String,
    pub phone: String,
    pub name: String,
}

impl PaymentRequest {
    /// Assemble the request from its three sources.
    #[must_use]
    pub fn new(form: &BillingForm, amount: Decimal, user: &CurrentUser) -> Self {
        Self {
            amount,
            user_id: user.user_id.clone(),
            email: form.email.clone(),
            phone: form.phone_number.clone(),
            name: form.full_name.clone(),
        }
    }
}

/// Backend reply to a payment-session request.
///
/// Only `payment_session_id` is read; everything else the gateway returns is
/// ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentSessionResponse {
    #[serde(default)]
    pub payment_session_id: Option<String>,
}

impl PaymentSessionResponse {
    /// The session id, if the backend returned a non-empty one.
    #[must_use]
    pub fn session_id(&self) -> Option<PaymentSessionId> {
        self.payment_session_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(PaymentSessionId::new)
    }
}
