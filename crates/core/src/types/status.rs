//! Order status as reported by the order service.
//!
//! Only `pending` is told apart from everything else. The backend's full set
//! of statuses is not known to the client, so anything that is not pending is
//! kept verbatim and shown as complete.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Order status.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    /// Awaiting payment confirmation.
    Pending,
    /// Any other value the backend sends, kept as-is.
    Other(String),
}

impl OrderStatus {
    /// Wire value for a pending order.
    pub const PENDING: &'static str = "pending";

    /// The status text as sent by the backend.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => Self::PENDING,
            Self::Other(s) => s,
        }
    }

    /// Badge style the order table renders this status with.
    #[must_use]
    pub const fn badge(&self) -> BadgeStyle {
        match self {
            Self::Pending => BadgeStyle::Danger,
            Self::Other(_) => BadgeStyle::Success,
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for OrderStatus {
    fn from(s: String) -> Self {
        if s == Self::PENDING {
            Self::Pending
        } else {
            Self::Other(s)
        }
    }
}

impl From<&str> for OrderStatus {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Pending => OrderStatus::PENDING.to_owned(),
            OrderStatus::Other(s) => s,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual style of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BadgeStyle {
    Danger,
    Success,
}

impl BadgeStyle {
    /// CSS class for the badge.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Danger => "badge-danger",
            Self::Success => "badge-success",
        }
    }
}
