//! Application shell: navigable views and form submission logic.
//!
//! The shell owns every view and the navigation state between them. It does
//! no rendering; the binary reads this state and draws it.

use std::time::Duration;

use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;
use crate::stores::{ToastLevel, TransientMessage};
use crate::views::{CategoryBrowser, ProductsView, ProfileView};

use crate::api::types::{Credentials, RegisterRequest};

/// How long an inline login error stays visible.
const LOGIN_ERROR_DISPLAY: Duration = Duration::from_millis(5000);

/// The navigable in-app views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Home,
    Categories,
    Signup,
    Login,
    Cart,
    Profile,
}

impl View {
    /// Lowercase name used in navigation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Categories => "categories",
            Self::Signup => "signup",
            Self::Login => "login",
            Self::Cart => "cart",
            Self::Profile => "profile",
        }
    }

    /// Parse a navigation target.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "home" => Some(Self::Home),
            "categories" => Some(Self::Categories),
            "signup" => Some(Self::Signup),
            "login" => Some(Self::Login),
            "cart" => Some(Self::Cart),
            "profile" => Some(Self::Profile),
            _ => None,
        }
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The application shell.
pub struct AppShell {
    state: AppState,
    auth: AuthService,
    current_view: View,
    logged_in: bool,
    login_error: TransientMessage,

    pub products: ProductsView,
    pub categories: CategoryBrowser,
    pub profile: ProfileView,
}

impl AppShell {
    /// Build the shell and its views from shared state.
    ///
    /// Login state is derived from the persisted session, so a stored
    /// token survives a restart.
    #[must_use]
    pub fn new(state: AppState) -> Self {
        let auth = state.auth();
        let logged_in = auth.is_logged_in();

        let products = ProductsView::new(
            state.api().clone(),
            state.search().clone(),
            state.config().products_per_page,
        );
        let categories = CategoryBrowser::new(
            state.api().clone(),
            state.search().clone(),
            state.config().category_page_size,
        );
        let profile = ProfileView::new(auth.clone());

        Self {
            state,
            auth,
            current_view: View::default(),
            logged_in,
            login_error: TransientMessage::new(),
            products,
            categories,
            profile,
        }
    }

    /// Navigate to a view, applying the navigation rules and loading
    /// whatever the target view needs.
    ///
    /// - `signup` while logged in redirects to `home`
    /// - re-selecting `categories` resets the browser to its root list
    pub async fn navigate(&mut self, requested: View) {
        let mut target = requested;

        if target == View::Signup && self.logged_in {
            tracing::info!("Already logged in, redirecting signup to home");
            target = View::Home;
        }

        if target == View::Categories && self.current_view == View::Categories {
            tracing::info!("Categories re-selected, resetting to category list");
            self.categories.back_to_categories();
        }

        self.current_view = target;
        self.refresh_auth_state();

        match target {
            View::Home => self.products.load().await,
            View::Categories => self.categories.load_categories().await,
            View::Profile => self.profile.refresh().await,
            View::Login => self.auth.ensure_user_cached(),
            View::Signup | View::Cart => {}
        }
    }

    /// Submit the login form.
    pub async fn submit_login(&mut self, email: &str, password: &str) {
        let credentials = Credentials::new(email, password);

        match self.auth.login(&credentials).await {
            Ok(()) => {
                self.login_error.clear();
                self.refresh_auth_state();
                tracing::info!("Login successful");
            }
            Err(AuthError::EmptyCredentials) => {
                self.login_error.set(
                    "Please enter both email and password.",
                    LOGIN_ERROR_DISPLAY,
                );
            }
            Err(AuthError::LoginFailed(message)) => {
                self.login_error.set(message, LOGIN_ERROR_DISPLAY);
            }
            Err(e) => {
                tracing::error!(error = %e, "Login error");
                self.login_error.set(
                    "Login failed. Please check your credentials and try again.",
                    LOGIN_ERROR_DISPLAY,
                );
            }
        }
    }

    /// Submit the registration form.
    ///
    /// On success shows a toast; when the backend did not auto-login, moves
    /// to the login view. Validation and server failures surface as an
    /// error toast.
    pub async fn submit_registration(&mut self, request: RegisterRequest) {
        match self.auth.register(&request).await {
            Ok(()) => {
                self.state
                    .toasts()
                    .show("Registration successful", ToastLevel::Success);
                self.refresh_auth_state();
                if !self.logged_in {
                    self.navigate(View::Login).await;
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Registration error");
                self.state.toasts().show(e.to_string(), ToastLevel::Error);
            }
        }
    }

    /// Log out and re-derive the navigation state.
    pub fn logout(&mut self) {
        self.auth.logout();
        self.refresh_auth_state();
    }

    /// Re-derive login state from the session store.
    fn refresh_auth_state(&mut self) {
        self.logged_in = self.auth.is_logged_in();
    }

    /// The view currently shown.
    #[must_use]
    pub const fn current_view(&self) -> View {
        self.current_view
    }

    /// Whether a session token is present.
    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    /// The inline login error, if showing.
    #[must_use]
    pub fn login_error(&self) -> Option<String> {
        self.login_error.message()
    }

    /// Shared application state.
    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// The auth service bound to this shell.
    #[must_use]
    pub const fn auth(&self) -> &AuthService {
        &self.auth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::StorefrontConfig;
    use crate::session::keys;

    fn shell() -> AppShell {
        let state = AppState::in_memory(StorefrontConfig::default()).expect("state builds");
        AppShell::new(state)
    }

    #[test]
    fn test_view_parse_round_trip() {
        for view in [
            View::Home,
            View::Categories,
            View::Signup,
            View::Login,
            View::Cart,
            View::Profile,
        ] {
            assert_eq!(View::parse(view.as_str()), Some(view));
        }
        assert_eq!(View::parse("checkout"), None);
    }

    #[tokio::test]
    async fn test_signup_redirects_to_home_when_logged_in() {
        let mut app = shell();
        app.state().session().set(keys::TOKEN, "tok");
        app.navigate(View::Cart).await; // refreshes auth state
        assert!(app.is_logged_in());

        app.navigate(View::Signup).await;
        assert_eq!(app.current_view(), View::Home);
    }

    #[tokio::test]
    async fn test_signup_reachable_when_logged_out() {
        let mut app = shell();
        app.navigate(View::Signup).await;
        assert_eq!(app.current_view(), View::Signup);
    }

    #[tokio::test]
    async fn test_logout_clears_session_and_state() {
        let mut app = shell();
        app.state().session().set(keys::TOKEN, "tok");
        app.state().session().set(keys::EMAIL, "a@b.com");
        app.navigate(View::Cart).await;
        assert!(app.is_logged_in());

        app.logout();

        assert!(!app.is_logged_in());
        assert!(app.state().session().get(keys::TOKEN).is_none());
        assert!(app.state().session().get(keys::EMAIL).is_none());
    }

    #[tokio::test]
    async fn test_login_with_empty_fields_sets_inline_error() {
        let mut app = shell();
        app.submit_login("", "").await;
        assert_eq!(
            app.login_error().as_deref(),
            Some("Please enter both email and password.")
        );
    }

    #[tokio::test]
    async fn test_navigation_to_cart_does_not_touch_views() {
        let mut app = shell();
        app.navigate(View::Cart).await;
        assert_eq!(app.current_view(), View::Cart);
        assert!(app.products.products().is_empty());
    }
}
