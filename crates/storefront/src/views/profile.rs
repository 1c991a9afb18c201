//! Logged-in user's profile view.

use std::time::Duration;

use crate::services::auth::AuthService;
use crate::stores::TransientMessage;

/// How long a failed profile refresh shows its inline error.
const ERROR_DISPLAY: Duration = Duration::from_millis(4000);

/// Identity fields shown on the profile page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
}

/// Profile page state.
///
/// Populates immediately from the session store, then refreshes from the
/// backend. Session values win until the refresh lands, so the page is
/// never blank for a logged-in user.
pub struct ProfileView {
    auth: AuthService,
    user: UserProfile,
    loading: bool,
    error: TransientMessage,
}

impl ProfileView {
    /// Create an empty profile view.
    #[must_use]
    pub fn new(auth: AuthService) -> Self {
        Self {
            auth,
            user: UserProfile::default(),
            loading: false,
            error: TransientMessage::new(),
        }
    }

    /// Fill the displayed fields from the session store.
    pub fn populate_from_session(&mut self) {
        self.user = UserProfile {
            name: self.auth.user_name().unwrap_or_default(),
            email: self.auth.user_email().unwrap_or_default(),
            phone: self.auth.user_phone().unwrap_or_default(),
            role: self.auth.user_role().unwrap_or_default(),
        };
    }

    /// Populate from the session, then refresh from the backend.
    ///
    /// Without a token only the local populate happens. A failed refresh
    /// keeps the session-derived fields and shows a transient error.
    pub async fn refresh(&mut self) {
        self.auth.ensure_user_cached();
        self.populate_from_session();

        if !self.auth.is_logged_in() {
            return;
        }

        self.loading = true;
        match self.auth.fetch_current_user().await {
            Ok(Some(_)) => self.populate_from_session(),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Profile refresh failed");
                self.error.set("Failed to load profile", ERROR_DISPLAY);
            }
        }
        self.loading = false;
    }

    /// The currently displayed identity fields.
    #[must_use]
    pub const fn user(&self) -> &UserProfile {
        &self.user
    }

    /// Whether a refresh is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// The transient inline error, if showing.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.error.message()
    }
}
