//! Cart lines as returned by the cart service.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ProductId;

/// One line of the shopper's cart.
///
/// Owned by the remote cart service and only ever read here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    pub product_title: String,
    pub quantity: u32,
    /// Unit price.
    pub price: Decimal,
    /// Line subtotal as computed by the cart service.
    #[serde(default)]
    pub sub_total: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Errors raised when totalling a cart.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// A line total or the running sum does not fit in a `Decimal`.
    #[error("cart total overflows at line \"{product_title}\"")]
    Overflow { product_title: String },
}

impl CartLine {
    /// Unit price times quantity, or `None` on overflow.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Sum of `price * quantity` over every line. An empty cart totals zero.
///
/// # Errors
///
/// Returns [`CartError::Overflow`] naming the first line that pushes the
/// total out of range.
pub fn order_total(lines: &[CartLine]) -> Result<Decimal, CartError> {
    lines.iter().try_fold(Decimal::ZERO, |total, line| {
        line.line_total()
            .and_then(|line_total| total.checked_add(line_total))
            .ok_or_else(|| CartError::Overflow {
                product_title: line.product_title.clone(),
            })
    })
}
