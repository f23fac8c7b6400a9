//! Order history listing and detail.

use std::io::Write;

use shopfront_client::AppState;
use shopfront_client::views::{OrderProductRow, OrderRow};
use shopfront_core::OrderId;

/// Print one row per order.
///
/// # Errors
///
/// Returns an error if nobody is signed in or the orders cannot be fetched.
pub async fn list(state: &AppState) -> shopfront_client::Result<()> {
    let orders = state.orders().list_current_user_orders().await?;

    let mut out = std::io::stdout().lock();
    if orders.is_empty() {
        writeln!(out, "No orders yet.")?;
        return Ok(());
    }

    for row in orders.iter().map(OrderRow::from) {
        writeln!(
            out,
            "{}  {}  {:<10} [{}]  {:>10}  {}  {}, {} {}  {}",
            row.order_id,
            row.date,
            row.status,
            row.badge.css_class(),
            row.amount,
            row.name,
            row.address,
            row.pincode,
            row.phone_number,
            row.email,
        )?;
    }

    Ok(())
}

/// Print the products of one order.
///
/// # Errors
///
/// Returns an error if nobody is signed in or the order cannot be fetched.
pub async fn show(state: &AppState, order_id: &str) -> shopfront_client::Result<()> {
    let products = state
        .orders()
        .get_order_products(&OrderId::new(order_id))
        .await?;

    let mut out = std::io::stdout().lock();
    for row in products.iter().map(OrderProductRow::from) {
        writeln!(
            out,
            "{:<34} {:>4} × {:>10} = {:>10}  {}",
            row.title,
            row.quantity,
            row.price,
            row.sub_total,
            row.image.as_deref().unwrap_or("-"),
        )?;
    }

    Ok(())
}
