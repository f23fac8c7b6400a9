//! Wiring shared by every front end.

use std::sync::Arc;

use crate::api::{ApiClient, ApiError, TokenProvider};
use crate::checkout::Checkout;
use crate::config::ClientConfig;
use crate::orders::OrdersService;
use crate::session::{FileSessionStore, SessionStore};
use crate::widget::PaymentWidget;

/// Services built from one configuration.
///
/// This struct is cheaply cloneable via `Arc`. The session store doubles as
/// the API client's token provider, so every request sees the token as it is
/// at send time.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ClientConfig,
    session: Arc<dyn SessionStore>,
    api: ApiClient,
    checkout: Checkout,
    orders: OrdersService,
}

impl AppState {
    /// Build the services, reading the session from `config.session_file`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(
        config: ClientConfig,
        widget: Option<Arc<dyn PaymentWidget>>,
    ) -> Result<Self, ApiError> {
        let store = Arc::new(FileSessionStore::new(config.session_file.clone()));
        let session: Arc<dyn SessionStore> = store.clone();
        let tokens: Arc<dyn TokenProvider> = store;

        Self::with_session(config, session, tokens, widget)
    }

    /// Build the services around an existing session.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn with_session(
        config: ClientConfig,
        session: Arc<dyn SessionStore>,
        tokens: Arc<dyn TokenProvider>,
        widget: Option<Arc<dyn PaymentWidget>>,
    ) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config, tokens)?;
        let checkout = Checkout::new(api.clone(), widget);
        let orders = OrdersService::new(api.clone(), Arc::clone(&session));

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                session,
                api,
                checkout,
                orders,
            }),
        })
    }

    /// Get a reference to the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Get a reference to the session store.
    #[must_use]
    pub fn session(&self) -> &dyn SessionStore {
        self.inner.session.as_ref()
    }

    /// Get a reference to the API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get a reference to the checkout flow.
    #[must_use]
    pub fn checkout(&self) -> &Checkout {
        &self.inner.checkout
    }

    /// Get a reference to the orders service.
    #[must_use]
    pub fn orders(&self) -> &OrdersService {
        &self.inner.orders
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("api", &self.inner.api)
            .field("checkout", &self.inner.checkout)
            .finish_non_exhaustive()
    }
}
