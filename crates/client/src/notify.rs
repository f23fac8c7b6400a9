//! User-facing alerts.
//!
//! Operations return `Result`s; the front end turns them into an [`Alert`]
//! and decides how to show it through a [`Notifier`].

use core::fmt;

/// Whether an alert reports a failure or a success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertKind {
    Error,
    Success,
}

/// A message for the shopper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    /// An error alert.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Error,
            message: message.into(),
        }
    }

    /// A success alert.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Success,
            message: message.into(),
        }
    }

    /// Whether this alert reports a failure.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind == AlertKind::Error
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Surfaces alerts to the shopper.
pub trait Notifier: Send + Sync {
    fn notify(&self, alert: &Alert);
}

/// Writes alerts to the log: errors at `ERROR`, successes at `INFO`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, alert: &Alert) {
        match alert.kind {
            AlertKind::Error => tracing::error!(alert = %alert.message, "Alert"),
            AlertKind::Success => tracing::info!(alert = %alert.message, "Alert"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_constructors() {
        let alert = Alert::error("Payment session creation failed.");
        assert!(alert.is_error());
        assert_eq!(alert.to_string(), "Payment session creation failed.");

        assert!(!Alert::success("Order placed").is_error());
    }
}
