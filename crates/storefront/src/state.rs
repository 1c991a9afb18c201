//! Application state shared across views.

use std::sync::Arc;

use crate::api::StorefrontApi;
use crate::config::StorefrontConfig;
use crate::error::AppError;
use crate::services::auth::AuthService;
use crate::session::SessionStore;
use crate::stores::{CartStore, SearchStore, ToastStore};

/// Application state shared by the shell and every view.
///
/// Cheaply cloneable via `Arc`. Holds the API client, the persistent
/// session store, and the reactive stores (cart, search, toasts).
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: StorefrontApi,
    session: SessionStore,
    cart: CartStore,
    search: SearchStore,
    toasts: ToastStore,
}

impl AppState {
    /// Create application state, opening the persistent session file.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the session
    /// file cannot be read.
    pub fn new(config: StorefrontConfig) -> Result<Self, AppError> {
        let session = SessionStore::open(&config.session_file)?;
        Self::with_session(config, session)
    }

    /// Create application state with an in-memory session. Used in tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn in_memory(config: StorefrontConfig) -> Result<Self, AppError> {
        Self::with_session(config, SessionStore::in_memory())
    }

    fn with_session(config: StorefrontConfig, session: SessionStore) -> Result<Self, AppError> {
        let api = StorefrontApi::new(&config)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                session,
                cart: CartStore::new(),
                search: SearchStore::new(),
                toasts: ToastStore::new(),
            }),
        })
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the API client.
    #[must_use]
    pub fn api(&self) -> &StorefrontApi {
        &self.inner.api
    }

    /// Get a reference to the session store.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// Get a reference to the shared search query store.
    #[must_use]
    pub fn search(&self) -> &SearchStore {
        &self.inner.search
    }

    /// Get a reference to the toast queue.
    #[must_use]
    pub fn toasts(&self) -> &ToastStore {
        &self.inner.toasts
    }

    /// Build an auth service over this state's API client and session.
    #[must_use]
    pub fn auth(&self) -> AuthService {
        AuthService::new(self.inner.api.clone(), self.inner.session.clone())
    }
}
