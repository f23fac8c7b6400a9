//! Payment widget integration point.
//!
//! Completing a payment is the job of a third-party "drop-in" widget that is
//! handed the session id the backend issued. The checkout flow only knows the
//! [`PaymentWidget`] trait; whichever front end hosts the flow registers an
//! implementation (or none, in which case checkout reports the integration as
//! unavailable).

use std::io::Write;
use std::sync::Mutex;

use serde::Serialize;
use shopfront_core::PaymentSessionId;
use thiserror::Error;
use url::Url;

/// Errors reported by a payment widget.
#[derive(Debug, Error)]
pub enum WidgetError {
    /// The widget is not loaded or cannot run here.
    #[error("payment widget unavailable: {0}")]
    Unavailable(String),

    /// The widget was found but failed to start.
    #[error("payment widget failed to launch: {0}")]
    Launch(String),
}

/// Where the widget sends the shopper once payment completes.
///
/// Checkout always redirects in the same browsing context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum RedirectTarget {
    #[default]
    #[serde(rename = "_self")]
    SelfTab,
}

impl RedirectTarget {
    /// The target name as the widget expects it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SelfTab => "_self",
        }
    }
}

/// Arguments for [`PaymentWidget::initialise_dropin`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DropinOptions {
    pub payment_session_id: PaymentSessionId,
    pub redirect_target: RedirectTarget,
}

impl DropinOptions {
    /// Options for a same-tab redirect, as checkout uses.
    #[must_use]
    pub fn same_tab(payment_session_id: PaymentSessionId) -> Self {
        Self {
            payment_session_id,
            redirect_target: RedirectTarget::SelfTab,
        }
    }
}

/// A payment widget that can take over once a session exists.
pub trait PaymentWidget: Send + Sync {
    /// Start the widget for the given session.
    ///
    /// # Errors
    ///
    /// Returns an error if the widget cannot be started.
    fn initialise_dropin(&self, options: &DropinOptions) -> Result<(), WidgetError>;
}

// =============================================================================
// HostedCheckout
// =============================================================================

/// Widget for terminal front ends: builds the hosted payment page URL for the
/// session and writes it to `out` for the shopper to open.
pub struct HostedCheckout<W> {
    checkout_url: Url,
    out: Mutex<W>,
}

impl<W: Write + Send> HostedCheckout<W> {
    /// Create a widget pointing at the hosted payment page `checkout_url`.
    #[must_use]
    pub const fn new(checkout_url: Url, out: W) -> Self {
        Self {
            checkout_url,
            out: Mutex::new(out),
        }
    }

    /// URL of the hosted payment page for a session.
    #[must_use]
    pub fn launch_url(&self, options: &DropinOptions) -> Url {
        let mut url = self.checkout_url.clone();
        url.query_pairs_mut()
            .append_pair("payment_session_id", options.payment_session_id.as_str())
            .append_pair("redirect_target", options.redirect_target.as_str());
        url
    }
}

impl<W: Write + Send> PaymentWidget for HostedCheckout<W> {
    fn initialise_dropin(&self, options: &DropinOptions) -> Result<(), WidgetError> {
        let url = self.launch_url(options);

        let mut out = self
            .out
            .lock()
            .map_err(|_| WidgetError::Launch("output lock poisoned".to_string()))?;
        writeln!(out, "{url}").map_err(|e| WidgetError::Launch(e.to_string()))?;

        tracing::info!(%url, "Hosted checkout ready");
        Ok(())
    }
}

impl<W> std::fmt::Debug for HostedCheckout<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostedCheckout")
            .field("checkout_url", &self.checkout_url.as_str())
            .finish_non_exhaustive()
    }
}
