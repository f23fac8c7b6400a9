//! Unified error type for front ends driving the client.
//!
//! Each service returns its own error; `Error` gathers them so a CLI or UI
//! can propagate with `?` and turn the outcome into one [`Alert`].

use thiserror::Error;

use crate::api::ApiError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::notify::Alert;
use crate::orders::OrdersError;
use crate::session::SessionError;

/// Client-level error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The session could not be read.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// A backend call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Checkout failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Loading orders failed.
    #[error("Orders error: {0}")]
    Orders(#[from] OrdersError),

    /// Local I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// The message to show the shopper.
    ///
    /// Internal details (paths, status bodies) are kept out of the message.
    #[must_use]
    pub fn alert(&self) -> Alert {
        match self {
            Self::Checkout(err) => err.alert(),
            Self::Orders(err) => err.alert(),
            Self::Session(SessionError::NotSignedIn) => Alert::error("Please sign in first."),
            Self::Session(_) => Alert::error("Your session could not be read. Please sign in again."),
            Self::Api(ApiError::MissingToken) => Alert::error("Please sign in first."),
            Self::Api(_) => Alert::error("Something went wrong. Please try again."),
            Self::Config(err) => Alert::error(err.to_string()),
            Self::Io(err) => Alert::error(err.to_string()),
        }
    }

    /// Whether this error points at a fault outside the shopper's control.
    ///
    /// Validation problems and missing sign-in are the shopper's to fix;
    /// everything else is worth reporting.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        match self {
            Self::Checkout(
                CheckoutError::Validation { .. } | CheckoutError::SubmissionInProgress,
            )
            | Self::Orders(OrdersError::NotSignedIn)
            | Self::Session(SessionError::NotSignedIn)
            | Self::Api(ApiError::MissingToken)
            | Self::Config(_) => false,
            _ => true,
        }
    }
}

/// Result type alias for [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
