//! Core types for Shopfront.
//!
//! This module provides type-safe wrappers for the checkout and order
//! history domain.

pub mod billing;
pub mod cart;
pub mod id;
pub mod money;
pub mod order;
pub mod payment;
pub mod status;
pub mod user;

pub use billing::{BillingError, BillingField, BillingForm};
pub use cart::{CartError, CartLine, order_total};
pub use id::*;
pub use money::{CURRENCY_SYMBOL, format_inr};
pub use order::{Order, OrderDetail, OrderProduct};
pub use payment::{PaymentRequest, PaymentSessionId, PaymentSessionResponse};
pub use status::{BadgeStyle, OrderStatus};
pub use user::CurrentUser;
