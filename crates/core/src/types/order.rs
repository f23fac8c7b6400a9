//! Past orders and their products.
//!
//! These are read-only projections of what the order service stores; the
//! client never mutates an order.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{OrderId, OrderStatus, ProductId, UserId};

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Document id, used to fetch the order's products.
    #[serde(rename = "_id")]
    pub order_id: OrderId,
    /// Public order id as shown to the shopper.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub payment_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub phone_number: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub pincode: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub amount: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, rename = "userid")]
    pub user_id: Option<UserId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: OrderStatus,
    /// ISO-8601 timestamp of when the order was placed.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub products: Vec<OrderProduct>,
}

impl Order {
    /// The calendar-date part of `date` (everything before `T`).
    #[must_use]
    pub fn date_part(&self) -> Option<&str> {
        self.date
            .as_deref()
            .and_then(|date| date.split('T').next())
    }
}

/// The order detail endpoint's payload; only the products are read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderDetail {
    #[serde(default, deserialize_with = "null_as_default")]
    pub products: Vec<OrderProduct>,
}

/// One product line within an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderProduct {
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub product_title: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quantity: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sub_total: Decimal,
}

/// Treat an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept either a JSON string or number for free-form numeric text
/// (phone numbers, postcodes).
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
        Null(()),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
        Raw::Null(()) => String::new(),
    })
}
