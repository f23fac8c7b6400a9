//! Checkout submission.

use std::io::Write;

use shopfront_client::AppState;
use shopfront_client::checkout::CheckoutError;
use shopfront_client::notify::{Alert, Notifier, TracingNotifier};
use shopfront_client::views::CartSummaryView;
use shopfront_core::BillingForm;

/// Validate the form, load the cart, show what is being paid for, and start
/// payment. An incomplete form is reported before anything is sent.
///
/// With a hosted checkout page configured, its URL for the new session is
/// printed for the shopper to open.
///
/// # Errors
///
/// Returns an error if a billing field is empty, nobody is signed in, the
/// cart cannot be fetched, or the checkout submission fails.
pub async fn submit(state: &AppState, form: BillingForm) -> shopfront_client::Result<()> {
    form.validate().map_err(CheckoutError::from)?;

    let user = state.session().require_user()?;
    let summary = state.checkout().load_cart(&user).await?;

    {
        let view = CartSummaryView::from(&summary);
        let mut out = std::io::stdout().lock();
        writeln!(out, "Paying {} for {} item(s)", view.subtotal, view.lines.len())?;
    }

    let session_id = state
        .checkout()
        .submit(&form, &summary.lines, &user)
        .await?;

    TracingNotifier.notify(&Alert::success(format!(
        "Payment session {session_id} created"
    )));
    Ok(())
}
