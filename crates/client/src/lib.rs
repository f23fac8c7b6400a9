//! Shopfront client library.
//!
//! Checkout and order history against the storefront REST backend: an API
//! client with per-request bearer auth, the checkout flow that hands off to a
//! payment widget, order listing, and the display rows front ends render.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod checkout;
pub mod config;
pub mod error;
pub mod notify;
pub mod orders;
pub mod session;
pub mod state;
pub mod views;
pub mod widget;

pub use error::{Error, Result};
pub use state::AppState;
