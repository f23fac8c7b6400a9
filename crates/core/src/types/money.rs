//! Money display helpers.
//!
//! Amounts are carried as [`Decimal`] in the store currency (Indian rupees)
//! and formatted the way the storefront displays them: currency symbol,
//! en-US digit grouping, and exactly two decimal places.

use rust_decimal::{Decimal, RoundingStrategy};

/// Symbol for the store currency (INR).
pub const CURRENCY_SYMBOL: &str = "₹";

/// Format an amount as an INR display string (e.g. `₹1,234.50`).
///
/// Rounds half away from zero to two decimal places. Negative amounts are
/// prefixed with `-` ahead of the symbol.
///
/// ```
/// use rust_decimal::Decimal;
/// use shopfront_core::format_inr;
///
/// assert_eq!(format_inr(Decimal::new(123_450, 2)), "₹1,234.50");
/// assert_eq!(format_inr(Decimal::ZERO), "₹0.00");
/// ```
#[must_use]
pub fn format_inr(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    let plain = format!("{:.2}", rounded.abs());
    let (whole, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    format!("{sign}{CURRENCY_SYMBOL}{}.{fraction}", group_thousands(whole))
}

/// Insert a comma between every group of three digits, counting from the right.
fn group_thousands(digits: &str) -> String {
    let len = digits.chars().count();
    let mut grouped = String::with_capacity(len + len / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    grouped
}
