//! Display rows for the cart summary and order tables.
//!
//! These mirror what the storefront pages render: truncated product titles,
//! rupee-formatted subtotals, status badges, and date-only timestamps.

use rust_decimal::Decimal;
use shopfront_core::{BadgeStyle, CartLine, Order, OrderProduct, format_inr};

use crate::checkout::CartSummary;

/// Characters of a product title shown in the checkout summary.
pub const CART_TITLE_CHARS: usize = 20;

/// Characters of a product title shown in the order detail.
pub const ORDER_TITLE_CHARS: usize = 30;

/// Keep the first `max_chars` characters and append `...`.
///
/// The ellipsis is always appended, even to short titles.
#[must_use]
pub fn truncate_title(title: &str, max_chars: usize) -> String {
    let mut truncated: String = title.chars().take(max_chars).collect();
    truncated.push_str("...");
    truncated
}

// =============================================================================
// Checkout summary
// =============================================================================

/// One row of the "your order" table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineView {
    /// `<title>... × <quantity>`
    pub label: String,
    pub subtotal: String,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            label: format!(
                "{} × {}",
                truncate_title(&line.product_title, CART_TITLE_CHARS),
                line.quantity
            ),
            subtotal: format_inr(line.sub_total),
        }
    }
}

/// The "your order" table shown beside the billing form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummaryView {
    pub lines: Vec<CartLineView>,
    pub subtotal: String,
}

impl From<&CartSummary> for CartSummaryView {
    fn from(summary: &CartSummary) -> Self {
        Self {
            lines: summary.lines.iter().map(CartLineView::from).collect(),
            subtotal: format_inr(summary.total),
        }
    }
}

// =============================================================================
// Order history
// =============================================================================

/// One row of the orders table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRow {
    /// Document id used to open the detail view.
    pub order_id: String,
    pub public_id: String,
    pub payment_id: String,
    pub name: String,
    pub phone_number: String,
    pub address: String,
    pub pincode: String,
    pub amount: String,
    pub email: String,
    pub user_id: String,
    pub status: String,
    pub badge: BadgeStyle,
    pub date: String,
}

impl From<&Order> for OrderRow {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.order_id.to_string(),
            public_id: order.id.clone().unwrap_or_default(),
            payment_id: order.payment_id.clone().unwrap_or_default(),
            name: order.name.clone(),
            phone_number: order.phone_number.clone(),
            address: order.address.clone(),
            pincode: order.pincode.clone(),
            amount: plain_amount(order.amount),
            email: order.email.clone(),
            user_id: order
                .user_id
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            status: order.status.to_string(),
            badge: order.status.badge(),
            date: order.date_part().unwrap_or_default().to_string(),
        }
    }
}

/// One row of the order detail table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderProductRow {
    pub product_id: String,
    pub title: String,
    pub image: Option<String>,
    pub quantity: u32,
    pub price: String,
    pub sub_total: String,
}

impl From<&OrderProduct> for OrderProductRow {
    fn from(product: &OrderProduct) -> Self {
        Self {
            product_id: product
                .product_id
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            title: truncate_title(&product.product_title, ORDER_TITLE_CHARS),
            image: product.image.clone(),
            quantity: product.quantity,
            price: plain_amount(product.price),
            sub_total: plain_amount(product.sub_total),
        }
    }
}

/// Amounts in the order tables are shown as plain numbers.
fn plain_amount(amount: Decimal) -> String {
    amount.normalize().to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopfront_core::{OrderId, OrderStatus, ProductId, UserId};

    use super::*;

    fn cart_line(title: &str, quantity: u32, price: i64) -> CartLine {
        CartLine {
            product_id: None,
            product_title: title.to_string(),
            quantity,
            price: Decimal::new(price, 0),
            sub_total: Decimal::new(price * i64::from(quantity), 0),
            image: None,
        }
    }

    #[test]
    fn test_truncate_title() {
        assert_eq!(
            truncate_title("Organic Basmati Rice Extra Long Grain 5kg", 20),
            "Organic Basmati Rice..."
        );
        assert_eq!(truncate_title("Ghee", 20), "Ghee...");
        assert_eq!(truncate_title("केसर केसर केसर", 4), "केसर...");
    }

    #[test]
    fn test_cart_summary_view() {
        let summary = CartSummary::new(vec![
            cart_line("Organic Basmati Rice Extra Long Grain 5kg", 2, 1250),
            cart_line("Ghee", 1, 675),
        ])
        .unwrap();
        let view = CartSummaryView::from(&summary);

        assert_eq!(view.lines[0].label, "Organic Basmati Rice... × 2");
        assert_eq!(view.lines[0].subtotal, "₹2,500.00");
        assert_eq!(view.lines[1].label, "Ghee... × 1");
        assert_eq!(view.subtotal, "₹3,175.00");
    }

    #[test]
    fn test_empty_cart_summary_view() {
        let view = CartSummaryView::from(&CartSummary::default());
        assert!(view.lines.is_empty());
        assert_eq!(view.subtotal, "₹0.00");
    }

    #[test]
    fn test_order_row() {
        let order = Order {
            order_id: OrderId::new("6660aa01"),
            id: Some("ORD-1001".to_string()),
            payment_id: Some("pay_77".to_string()),
            name: "Asha Rao".to_string(),
            phone_number: "9876543210".to_string(),
            address: "12 MG Road".to_string(),
            pincode: "560001".to_string(),
            amount: Decimal::new(149_900, 2),
            email: "asha@example.com".to_string(),
            user_id: Some(UserId::new("u-1")),
            status: OrderStatus::from("pending"),
            date: Some("2024-06-05T10:15:30.000Z".to_string()),
            products: Vec::new(),
        };

        let row = OrderRow::from(&order);
        assert_eq!(row.order_id, "6660aa01");
        assert_eq!(row.public_id, "ORD-1001");
        assert_eq!(row.amount, "1499");
        assert_eq!(row.badge, BadgeStyle::Danger);
        assert_eq!(row.status, "pending");
        assert_eq!(row.date, "2024-06-05");
    }

    #[test]
    fn test_order_row_completed_status() {
        let order: Order =
            serde_json::from_str(r#"{"_id": "x", "status": "delivered"}"#).unwrap();
        let row = OrderRow::from(&order);
        assert_eq!(row.badge, BadgeStyle::Success);
        assert_eq!(row.date, "");
        assert_eq!(row.payment_id, "");
    }

    #[test]
    fn test_order_product_row() {
        let product = OrderProduct {
            product_id: Some(ProductId::new("p1")),
            product_title: "Kashmiri Saffron Premium Grade A Threads 2g".to_string(),
            image: Some("https://cdn.example.in/saffron.png".to_string()),
            quantity: 2,
            price: Decimal::new(49_950, 2),
            sub_total: Decimal::new(99_900, 2),
        };

        let row = OrderProductRow::from(&product);
        assert_eq!(row.product_id, "p1");
        assert_eq!(row.title, "Kashmiri Saffron Premium Grade...");
        assert_eq!(row.price, "499.5");
        assert_eq!(row.sub_total, "999");
    }
}
