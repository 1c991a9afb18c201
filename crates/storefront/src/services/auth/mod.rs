//! Credential authentication service.
//!
//! Delegates credential checks to the remote auth endpoints and persists
//! the recovered identity fields in the session store. The backend's
//! response shapes vary, so persistence goes through the candidate-key
//! extraction in [`claims`], with the bearer token's own payload as a final
//! data source for anything the response omitted.
//!
//! There is no retry and no refresh-token rotation: a stored refresh token
//! is kept but never exercised.

mod claims;
mod error;

pub use error::AuthError;

use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::instrument;

use bazaar_core::Email;

use crate::api::StorefrontApi;
use crate::api::types::{Credentials, RegisterRequest};
use crate::session::{SessionStore, keys};

use claims::{PROFILE_FIELDS, TOKEN_CLAIM_FIELDS, decode_token_claims, extract_field};

/// Minimum password length accepted at registration.
const MIN_PASSWORD_LENGTH: usize = 8;
/// Minimum display-name length accepted at registration.
const MIN_NAME_LENGTH: usize = 2;

/// Authentication service.
///
/// Cheaply cloneable; clones share the API client and session store.
#[derive(Clone)]
pub struct AuthService {
    api: StorefrontApi,
    session: SessionStore,
}

impl AuthService {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(api: StorefrontApi, session: SessionStore) -> Self {
        Self { api, session }
    }

    // =========================================================================
    // Session Reads
    // =========================================================================

    /// Stored bearer token, if any.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.session.get(keys::TOKEN)
    }

    /// Stored refresh token, if any.
    #[must_use]
    pub fn refresh_token(&self) -> Option<String> {
        self.session.get(keys::REFRESH_TOKEN)
    }

    /// Stored account role, if any.
    #[must_use]
    pub fn user_role(&self) -> Option<String> {
        self.session.get(keys::ROLE)
    }

    /// Stored account email, if any.
    #[must_use]
    pub fn user_email(&self) -> Option<String> {
        self.session.get(keys::EMAIL)
    }

    /// Stored display name, if any.
    #[must_use]
    pub fn user_name(&self) -> Option<String> {
        self.session.get(keys::NAME)
    }

    /// Stored phone number, if any.
    #[must_use]
    pub fn user_phone(&self) -> Option<String> {
        self.session.get(keys::PHONE)
    }

    /// Whether a bearer token is currently stored.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.token().is_some()
    }

    // =========================================================================
    // Credential Operations
    // =========================================================================

    /// Authenticate with email and password.
    ///
    /// On a token-bearing response, persists the token, refresh token, and
    /// whatever identity fields can be recovered from the response, then
    /// backfills the rest from the token payload.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::EmptyCredentials` before any network call when
    /// either field is blank, `AuthError::LoginFailed` when the backend
    /// answers without a token, or the underlying `ApiError`.
    #[instrument(skip_all, fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<(), AuthError> {
        if credentials.email.trim().is_empty() || credentials.password.expose_secret().is_empty() {
            return Err(AuthError::EmptyCredentials);
        }

        let response = self.api.login(credentials).await?;

        let Some(token) = response.get("token").and_then(Value::as_str) else {
            let message = response
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("login rejected by server")
                .to_owned();
            return Err(AuthError::LoginFailed(message));
        };

        self.session.set(keys::TOKEN, token);
        if let Some(refresh) = response.get("refreshToken").and_then(Value::as_str) {
            self.session.set(keys::REFRESH_TOKEN, refresh);
        }

        self.persist_profile_fields(&response);
        self.ensure_user_cached();

        tracing::info!("Login succeeded");
        Ok(())
    }

    /// Register a new account.
    ///
    /// Validates the payload locally before any network call. When the
    /// backend returns a token the new user is logged in immediately,
    /// persisting the same fields as [`Self::login`] plus the phone number.
    ///
    /// # Errors
    ///
    /// Returns a validation error, or the underlying `ApiError`.
    #[instrument(skip_all, fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<(), AuthError> {
        validate_registration(request)?;

        let response = self.api.register(request).await?;

        // Auto-login when the backend returns a token with the registration
        if let Some(token) = response.get("token").and_then(Value::as_str) {
            self.session.set(keys::TOKEN, token);
            if let Some(refresh) = response.get("refreshToken").and_then(Value::as_str) {
                self.session.set(keys::REFRESH_TOKEN, refresh);
            }
            self.persist_profile_fields(&response);
            if let Some(phone) = response.get("phone").and_then(Value::as_str) {
                self.session.set(keys::PHONE, phone);
            }
            self.ensure_user_cached();
            tracing::info!("Registration auto-logged the new user in");
        }

        Ok(())
    }

    /// Backfill missing identity fields from the stored token's payload.
    ///
    /// A no-op without a token, or when email and role are both already
    /// cached. Never overwrites a stored value.
    pub fn ensure_user_cached(&self) {
        let Some(token) = self.token() else {
            tracing::debug!("No token present, skipping claim backfill");
            return;
        };
        if self.user_email().is_some() && self.user_role().is_some() {
            return;
        }

        let Some(payload) = decode_token_claims(&token) else {
            return;
        };

        for field in TOKEN_CLAIM_FIELDS {
            if let Some(value) = extract_field(&payload, field.candidates) {
                self.session.set_if_absent(field.session_key, &value);
            }
        }
    }

    /// Fetch the logged-in user's profile and persist recovered fields.
    ///
    /// Resolves to `None` without a token. On success the raw profile is
    /// returned so callers can inspect fields this service does not track.
    ///
    /// # Errors
    ///
    /// Returns the underlying `ApiError` when the profile fetch fails.
    #[instrument(skip(self))]
    pub async fn fetch_current_user(&self) -> Result<Option<Value>, AuthError> {
        let Some(token) = self.token() else {
            return Ok(None);
        };

        let profile = self.api.current_user(&token).await?;

        self.persist_profile_fields(&profile);
        if let Some(phone) = profile.get("phone").and_then(Value::as_str) {
            self.session.set(keys::PHONE, phone);
        }
        // Whatever the profile omitted may still be in the token payload
        self.ensure_user_cached();

        Ok(Some(profile))
    }

    /// Log out, clearing the entire session store.
    pub fn logout(&self) {
        self.session.clear();
        tracing::info!("Logged out, session cleared");
    }

    /// Persist every profile field recoverable from a response payload.
    fn persist_profile_fields(&self, payload: &Value) {
        for field in PROFILE_FIELDS {
            match extract_field(payload, field.candidates) {
                Some(value) => self.session.set(field.session_key, &value),
                None if field.session_key == keys::ROLE => {
                    tracing::warn!("No role found in auth response");
                }
                None => {}
            }
        }
    }
}

/// Validate a registration payload before it goes on the wire.
fn validate_registration(request: &RegisterRequest) -> Result<(), AuthError> {
    if request.name.trim().chars().count() < MIN_NAME_LENGTH {
        return Err(AuthError::NameTooShort {
            min: MIN_NAME_LENGTH,
        });
    }

    Email::parse(&request.email)?;

    validate_password(request.password.expose_secret())?;

    if request.password.expose_secret() != request.confirm_password.expose_secret() {
        return Err(AuthError::PasswordMismatch);
    }

    Ok(())
}

/// Password strength rules: minimum length plus one of each character class.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    if !password.chars().any(char::is_uppercase) {
        return Err(AuthError::WeakPassword(
            "must contain an uppercase letter".to_owned(),
        ));
    }
    if !password.chars().any(char::is_lowercase) {
        return Err(AuthError::WeakPassword(
            "must contain a lowercase letter".to_owned(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AuthError::WeakPassword("must contain a digit".to_owned()));
    }
    if password.chars().all(char::is_alphanumeric) {
        return Err(AuthError::WeakPassword(
            "must contain a special character".to_owned(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use secrecy::SecretString;
    use serde_json::json;

    use crate::api::types::Role;
    use crate::config::StorefrontConfig;

    fn service() -> AuthService {
        let api = StorefrontApi::new(&StorefrontConfig::default()).expect("client builds");
        AuthService::new(api, SessionStore::in_memory())
    }

    fn fake_token(claims: &Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string().as_bytes());
        format!("{header}.{payload}.sig")
    }

    fn register_request(password: &str, confirm: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Asha".to_owned(),
            email: "asha@example.com".to_owned(),
            password: SecretString::from(password.to_owned()),
            confirm_password: SecretString::from(confirm.to_owned()),
            role: Role::Customer,
            phone: None,
            address: None,
        }
    }

    #[test]
    fn test_ensure_user_cached_fills_missing_fields() {
        let auth = service();
        let token = fake_token(&json!({"email": "a@b.com", "role": "admin"}));
        auth.session.set(keys::TOKEN, &token);

        auth.ensure_user_cached();

        assert_eq!(auth.user_email().as_deref(), Some("a@b.com"));
        assert_eq!(auth.user_role().as_deref(), Some("admin"));
    }

    #[test]
    fn test_ensure_user_cached_never_overwrites() {
        let auth = service();
        let token = fake_token(&json!({"email": "claims@b.com", "role": "admin"}));
        auth.session.set(keys::TOKEN, &token);
        auth.session.set(keys::EMAIL, "stored@b.com");

        auth.ensure_user_cached();

        assert_eq!(auth.user_email().as_deref(), Some("stored@b.com"));
        assert_eq!(auth.user_role().as_deref(), Some("admin"));
    }

    #[test]
    fn test_ensure_user_cached_without_token_is_noop() {
        let auth = service();
        auth.ensure_user_cached();
        assert!(auth.user_email().is_none());
    }

    #[test]
    fn test_ensure_user_cached_ignores_undecodable_token() {
        let auth = service();
        auth.session.set(keys::TOKEN, "opaque-server-token");

        auth.ensure_user_cached();

        assert!(auth.user_email().is_none());
        assert!(auth.user_role().is_none());
    }

    #[test]
    fn test_logout_clears_every_field() {
        let auth = service();
        auth.session.set(keys::TOKEN, "t");
        auth.session.set(keys::EMAIL, "a@b.com");
        auth.session.set(keys::PHONE, "555-0100");

        auth.logout();

        assert!(auth.token().is_none());
        assert!(auth.user_email().is_none());
        assert!(auth.user_phone().is_none());
        assert!(!auth.is_logged_in());
    }

    #[tokio::test]
    async fn test_login_rejects_empty_credentials_before_network() {
        // Unroutable credentials: an empty form must fail fast without I/O
        let auth = service();
        let result = auth.login(&Credentials::new("", "")).await;
        assert!(matches!(result, Err(AuthError::EmptyCredentials)));

        let result = auth.login(&Credentials::new("a@b.com", "")).await;
        assert!(matches!(result, Err(AuthError::EmptyCredentials)));
    }

    #[tokio::test]
    async fn test_fetch_current_user_without_token_is_none() {
        let auth = service();
        let profile = auth.fetch_current_user().await.expect("no-op succeeds");
        assert!(profile.is_none());
    }

    #[test]
    fn test_validate_registration_accepts_strong_payload() {
        assert!(validate_registration(&register_request("Str0ng!pass", "Str0ng!pass")).is_ok());
    }

    #[test]
    fn test_validate_registration_rejects_weak_passwords() {
        assert!(matches!(
            validate_registration(&register_request("Ab1!", "Ab1!")),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(matches!(
            validate_registration(&register_request("alllower1!", "alllower1!")),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(matches!(
            validate_registration(&register_request("ALLUPPER1!", "ALLUPPER1!")),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(matches!(
            validate_registration(&register_request("NoDigits!!", "NoDigits!!")),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(matches!(
            validate_registration(&register_request("NoSpecial1A", "NoSpecial1A")),
            Err(AuthError::WeakPassword(_))
        ));
    }

    #[test]
    fn test_validate_registration_rejects_mismatch_and_bad_name() {
        assert!(matches!(
            validate_registration(&register_request("Str0ng!pass", "Different1!")),
            Err(AuthError::PasswordMismatch)
        ));

        let mut request = register_request("Str0ng!pass", "Str0ng!pass");
        request.name = "A".to_owned();
        assert!(matches!(
            validate_registration(&request),
            Err(AuthError::NameTooShort { .. })
        ));

        let mut request = register_request("Str0ng!pass", "Str0ng!pass");
        request.email = "not-an-email".to_owned();
        assert!(matches!(
            validate_registration(&request),
            Err(AuthError::InvalidEmail(_))
        ));
    }
}
