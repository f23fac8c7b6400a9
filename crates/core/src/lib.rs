//! Shopfront Core - Shared domain types.
//!
//! This crate provides the types shared by the Shopfront client components:
//! - `client` - API client, checkout flow, and order history services
//! - `cli` - Command-line front end driving those services
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no session storage. Everything that talks to the backend lives in
//! `shopfront-client`.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, money, billing form, cart lines, payment
//!   requests, orders, and order statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
