//! Order history: list a user's orders and drill into one.
//!
//! Both calls need a signed-in session; without a token they fail with
//! [`OrdersError::NotSignedIn`] before anything is sent.

use std::sync::Arc;

use shopfront_core::{Order, OrderDetail, OrderId, OrderProduct, UserId};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::api::{ApiClient, ApiError, path_with_query};
use crate::notify::Alert;
use crate::session::{SessionError, SessionStore};

/// Orders endpoint.
pub const ORDERS_PATH: &str = "/api/orders";

/// Errors that can occur when loading order history.
#[derive(Debug, Error)]
pub enum OrdersError {
    /// Nobody is signed in.
    #[error("Not signed in")]
    NotSignedIn,

    /// The session could not be read.
    #[error("Session error: {0}")]
    Session(#[source] SessionError),

    /// The backend could not be reached or answered with an error.
    #[error("Transport error: {0}")]
    Transport(#[from] ApiError),
}

impl From<SessionError> for OrdersError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotSignedIn => Self::NotSignedIn,
            other => Self::Session(other),
        }
    }
}

impl OrdersError {
    /// The message to show the shopper.
    #[must_use]
    pub fn alert(&self) -> Alert {
        match self {
            Self::NotSignedIn => Alert::error("Please sign in to view your orders."),
            Self::Session(_) | Self::Transport(_) => {
                Alert::error("Something went wrong while loading your orders.")
            }
        }
    }
}

/// Reads order history for the signed-in shopper.
#[derive(Clone)]
pub struct OrdersService {
    api: ApiClient,
    session: Arc<dyn SessionStore>,
}

impl OrdersService {
    /// Create an orders service.
    #[must_use]
    pub fn new(api: ApiClient, session: Arc<dyn SessionStore>) -> Self {
        Self { api, session }
    }

    /// List the orders placed by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`OrdersError::NotSignedIn`] without a token, or
    /// [`OrdersError::Transport`] if the request fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn list_orders(&self, user_id: &UserId) -> Result<Vec<Order>, OrdersError> {
        self.require_sign_in()?;

        let path = path_with_query(ORDERS_PATH, &[("userid", user_id.as_str())]);
        let orders: Vec<Order> = self.api.get(&path).await?;

        debug!(count = orders.len(), "Orders loaded");
        Ok(orders)
    }

    /// List the orders of whoever is signed in.
    ///
    /// # Errors
    ///
    /// Returns [`OrdersError::NotSignedIn`] when no user is signed in, or the
    /// errors of [`OrdersService::list_orders`].
    pub async fn list_current_user_orders(&self) -> Result<Vec<Order>, OrdersError> {
        let user = self.session.require_user()?;
        self.list_orders(&user.user_id).await
    }

    /// Fetch the products of one order.
    ///
    /// The whole order is fetched before anything is returned.
    ///
    /// # Errors
    ///
    /// Returns [`OrdersError::NotSignedIn`] without a token, or
    /// [`OrdersError::Transport`] if the request fails.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_order_products(
        &self,
        order_id: &OrderId,
    ) -> Result<Vec<OrderProduct>, OrdersError> {
        self.require_sign_in()?;

        let path = format!("{ORDERS_PATH}/{}", url_segment(order_id.as_str()));
        let detail: OrderDetail = self.api.get(&path).await?;

        debug!(count = detail.products.len(), "Order products loaded");
        Ok(detail.products)
    }

    fn require_sign_in(&self) -> Result<(), OrdersError> {
        if self.session.token().is_some() {
            Ok(())
        } else {
            Err(OrdersError::NotSignedIn)
        }
    }
}

impl std::fmt::Debug for OrdersService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrdersService")
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}

/// Percent-encode an id for use as a single path segment.
fn url_segment(id: &str) -> String {
    url::form_urlencoded::byte_serialize(id.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
