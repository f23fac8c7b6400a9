//! Cart display.

use std::io::Write;

use shopfront_client::AppState;
use shopfront_client::views::CartSummaryView;

/// Print the signed-in shopper's cart and its subtotal.
///
/// # Errors
///
/// Returns an error if nobody is signed in or the cart cannot be fetched.
pub async fn show(state: &AppState) -> shopfront_client::Result<()> {
    let user = state.session().require_user()?;
    let summary = state.checkout().load_cart(&user).await?;

    let view = CartSummaryView::from(&summary);
    let mut out = std::io::stdout().lock();
    if view.lines.is_empty() {
        writeln!(out, "Your cart is empty.")?;
    }
    for line in &view.lines {
        writeln!(out, "{:<40} {:>14}", line.label, line.subtotal)?;
    }
    writeln!(out, "{:<40} {:>14}", "Subtotal", view.subtotal)?;

    Ok(())
}
