//! Checkout flow: billing validation, cart total, payment session, widget.
//!
//! A submission runs strictly in this order and stops at the first failure:
//!
//! 1. Validate the billing form (first empty field wins)
//! 2. Total the cart (`price * quantity`, zero when empty)
//! 3. `POST /api/cashfree-token` with the payment request
//! 4. Hand the returned session id to the payment widget (same-tab redirect)
//!
//! Nothing is retried. Each failure comes back once as a [`CheckoutError`];
//! [`CheckoutError::alert`] gives the message to show the shopper.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rust_decimal::Decimal;
use shopfront_core::{
    BillingError, BillingField, BillingForm, CartError, CartLine, CurrentUser, PaymentRequest,
    PaymentSessionId, PaymentSessionResponse, order_total,
};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::api::{ApiClient, ApiError, RequestAuth, path_with_query};
use crate::notify::Alert;
use crate::widget::{DropinOptions, PaymentWidget};

/// Cart endpoint.
pub const CART_PATH: &str = "/api/cart";

/// Payment-session endpoint.
pub const PAYMENT_SESSION_PATH: &str = "/api/cashfree-token";

/// Errors that can end a checkout submission.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// A required billing field is empty.
    #[error("missing required field: {field}")]
    Validation { field: BillingField },

    /// The cart lines cannot be totalled.
    #[error("invalid cart: {0}")]
    InvalidCart(#[from] CartError),

    /// The backend replied without a payment session id.
    #[error("payment session was not created")]
    SessionCreation,

    /// No payment widget is registered, or it failed to start.
    #[error("payment widget unavailable: {0}")]
    IntegrationUnavailable(String),

    /// The backend could not be reached or answered with an error.
    #[error("transport error: {0}")]
    Transport(#[from] ApiError),

    /// Another submission is still in flight.
    #[error("a checkout submission is already in progress")]
    SubmissionInProgress,
}

impl CheckoutError {
    /// The message to show the shopper.
    #[must_use]
    pub fn alert(&self) -> Alert {
        match self {
            Self::Validation { field } => Alert::error(format!("Please fill {}", field.spaced_name())),
            Self::InvalidCart(_) => Alert::error("Your cart total could not be calculated."),
            Self::SessionCreation => Alert::error("Payment session creation failed."),
            Self::IntegrationUnavailable(_) => Alert::error("Payment widget is not loaded."),
            Self::Transport(_) => Alert::error("Something went wrong with payment initiation."),
            Self::SubmissionInProgress => Alert::error("Payment is already being processed."),
        }
    }
}

impl From<BillingError> for CheckoutError {
    fn from(err: BillingError) -> Self {
        match err {
            BillingError::MissingField { field } => Self::Validation { field },
        }
    }
}

/// The shopper's cart with its computed total.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartSummary {
    pub lines: Vec<CartLine>,
    pub total: Decimal,
}

impl CartSummary {
    /// Summarise fetched cart lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the total does not fit in a `Decimal`.
    pub fn new(lines: Vec<CartLine>) -> Result<Self, CartError> {
        let total = order_total(&lines)?;
        Ok(Self { lines, total })
    }
}

// =============================================================================
// Checkout
// =============================================================================

/// Runs checkout submissions against the backend.
///
/// At most one submission runs at a time per `Checkout`; a second call while
/// one is in flight fails with [`CheckoutError::SubmissionInProgress`].
pub struct Checkout {
    api: ApiClient,
    widget: Option<Arc<dyn PaymentWidget>>,
    in_flight: AtomicBool,
}

impl Checkout {
    /// Create a checkout flow. `widget` is `None` when no payment widget is
    /// available in this front end.
    #[must_use]
    pub fn new(api: ApiClient, widget: Option<Arc<dyn PaymentWidget>>) -> Self {
        Self {
            api,
            widget,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Whether a payment widget is registered.
    #[must_use]
    pub fn has_widget(&self) -> bool {
        self.widget.is_some()
    }

    /// Fetch the user's cart and total it.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Transport`] if the cart cannot be fetched, or
    /// [`CheckoutError::InvalidCart`] if its total is out of range.
    #[instrument(skip(self, user), fields(user_id = %user.user_id))]
    pub async fn load_cart(&self, user: &CurrentUser) -> Result<CartSummary, CheckoutError> {
        let path = path_with_query(CART_PATH, &[("userId", user.user_id.as_str())]);
        let lines: Vec<CartLine> = self.api.get(&path).await?;

        let summary = CartSummary::new(lines)?;
        info!(lines = summary.lines.len(), total = %summary.total, "Cart loaded");
        Ok(summary)
    }

    /// Submit the billing form and start payment.
    ///
    /// Returns the session id handed to the payment widget.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::Validation`] for the first empty billing field
    ///   (no request is sent)
    /// - [`CheckoutError::SubmissionInProgress`] if another submission is running
    /// - [`CheckoutError::InvalidCart`] if the cart total is out of range
    ///   (no request is sent)
    /// - [`CheckoutError::Transport`] if the session request fails
    /// - [`CheckoutError::SessionCreation`] if no session id comes back
    /// - [`CheckoutError::IntegrationUnavailable`] if the widget is missing or
    ///   fails to start
    #[instrument(skip_all, fields(user_id = %user.user_id, lines = cart.len()))]
    pub async fn submit(
        &self,
        form: &BillingForm,
        cart: &[CartLine],
        user: &CurrentUser,
    ) -> Result<PaymentSessionId, CheckoutError> {
        form.validate()?;

        let _guard = InFlight::acquire(&self.in_flight)?;

        let amount = order_total(cart)?;
        let request = PaymentRequest::new(form, amount, user);
        info!(amount = %request.amount, "Requesting payment session");

        let response: PaymentSessionResponse = self
            .api
            .post(PAYMENT_SESSION_PATH, &request, RequestAuth::Bearer)
            .await?;

        let Some(session_id) = response.session_id() else {
            warn!("Backend returned no payment_session_id");
            return Err(CheckoutError::SessionCreation);
        };

        let Some(widget) = &self.widget else {
            warn!("No payment widget registered");
            return Err(CheckoutError::IntegrationUnavailable(
                "no payment widget registered".to_string(),
            ));
        };

        widget
            .initialise_dropin(&DropinOptions::same_tab(session_id.clone()))
            .map_err(|e| {
                warn!(error = %e, "Payment widget failed to start");
                CheckoutError::IntegrationUnavailable(e.to_string())
            })?;

        info!(payment_session_id = %session_id, "Payment widget started");
        Ok(session_id)
    }
}

impl std::fmt::Debug for Checkout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Checkout")
            .field("api", &self.api)
            .field("has_widget", &self.widget.is_some())
            .field("in_flight", &self.in_flight.load(Ordering::Relaxed))
            .finish()
    }
}

/// Marks a submission as running until dropped.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, CheckoutError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| CheckoutError::SubmissionInProgress)?;
        Ok(Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
