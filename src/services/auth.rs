//! Authentication operations. The only facade that writes the session.

use serde::Serialize;
use serde_json::Value;

use crate::client::{ApiClient, ApiRequest};
use crate::error::{ApiError, ApiResult};
use crate::models::{LoginRequest, LoginResponse, ProfileUpdate, Registration, UserProfile};
use crate::services::validation::{validate_email, validate_password, validate_phone_number};
use crate::session::{SessionEvent, Transition};

pub struct AuthService<'a> {
    client: &'a ApiClient,
}

#[derive(Serialize)]
struct ResetRequest<'a> {
    phone: &'a str,
}

#[derive(Serialize)]
struct PasswordReset<'a> {
    token: &'a str,
    password: &'a str,
}

impl<'a> AuthService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Resume a previous session from the persisted token.
    ///
    /// Returns the verified user, or `None` when there is no usable token.
    /// Verification failures are not errors; they leave the session
    /// anonymous.
    pub async fn restore_session(&self) -> Option<UserProfile> {
        let session = self.client.session();
        if let Some(user) = session.user().filter(|_| session.is_authenticated()) {
            return Some(user);
        }

        let Some(token) = session.persisted_token() else {
            session.dispatch(SessionEvent::NoPersistedToken);
            return None;
        };
        session.dispatch(SessionEvent::TokenRestored(token));

        match self.client.fetch::<Value>(ApiRequest::get("/auth/verify")).await {
            Ok(data) => match extract_user(data) {
                Ok(user) => {
                    session.dispatch(SessionEvent::Verified(user.clone()));
                    tracing::info!(user_id = user.user_id, "Session restored");
                    Some(user)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Token verification returned no user");
                    session.dispatch(SessionEvent::VerificationFailed);
                    None
                }
            },
            Err(e) => {
                tracing::info!(error = %e, kind = e.kind().as_str(), "Persisted token rejected");
                session.dispatch(SessionEvent::VerificationFailed);
                None
            }
        }
    }

    pub async fn login(&self, phone: &str, password: &str) -> ApiResult<UserProfile> {
        validate_phone_number(phone)?;
        validate_password(password)?;

        let body = LoginRequest {
            phone: phone.trim().to_string(),
            password: password.to_string(),
        };
        let LoginResponse { access_token, user } = self
            .client
            .fetch(ApiRequest::post("/auth/login").json(&body)?)
            .await
            .map_err(|e| e.with_fallback("Login failed"))?;

        self.client.session().dispatch(SessionEvent::LoggedIn {
            user: user.clone(),
            access_token,
        });
        tracing::info!(user_id = user.user_id, "Logged in");
        Ok(user)
    }

    pub async fn register(&self, registration: &Registration) -> ApiResult<UserProfile> {
        if registration.full_name.trim().is_empty() {
            return Err(ApiError::validation("Full name is required"));
        }
        validate_phone_number(&registration.phone)?;
        validate_password(&registration.password)?;
        validate_email(registration.email.as_deref())?;

        let data = self
            .client
            .fetch::<Value>(ApiRequest::post("/auth/register").json(registration)?)
            .await
            .map_err(|e| e.with_fallback("Registration failed"))?;
        extract_user(data)
    }

    /// End the session locally. The backend keeps no session state.
    pub fn logout(&self) -> Transition {
        self.client.session().dispatch(SessionEvent::LoggedOut)
    }

    /// Re-fetch the profile and update the session's user.
    pub async fn refresh_profile(&self) -> ApiResult<UserProfile> {
        let data = self
            .client
            .fetch::<Value>(ApiRequest::get("/users/profile"))
            .await
            .map_err(|e| e.with_fallback("Failed to fetch profile"))?;
        let user = extract_user(data)?;
        self.client
            .session()
            .dispatch(SessionEvent::ProfileUpdated(user.clone()));
        Ok(user)
    }

    /// Save profile edits and merge the result into the session's user.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<UserProfile> {
        if let Some(phone) = update.phone.as_deref() {
            validate_phone_number(phone)?;
        }
        validate_email(update.email.as_deref())?;
        if matches!(update.full_name.as_deref(), Some(name) if name.trim().is_empty()) {
            return Err(ApiError::validation("Full name cannot be empty"));
        }

        let data = self
            .client
            .fetch::<Value>(ApiRequest::put("/users/profile").json(update)?)
            .await
            .map_err(|e| e.with_fallback("Failed to update profile"))?;
        let user = extract_user(data)?;

        self.client.invalidate("/users");
        self.client
            .session()
            .dispatch(SessionEvent::ProfileUpdated(user.clone()));
        Ok(user)
    }

    /// Ask the backend to send a reset code. Returns the server's message.
    pub async fn request_password_reset(&self, phone: &str) -> ApiResult<Option<String>> {
        validate_phone_number(phone)?;
        let request = ApiRequest::post("/auth/request-reset").json(&ResetRequest {
            phone: phone.trim(),
        })?;
        self.client
            .send::<Value>(request)
            .await
            .map(|r| r.message)
            .map_err(|e| e.with_fallback("Failed to request password reset"))
    }

    pub async fn reset_password(&self, token: &str, password: &str) -> ApiResult<Option<String>> {
        if token.trim().is_empty() {
            return Err(ApiError::validation("Reset token is required"));
        }
        validate_password(password)?;
        let request = ApiRequest::post("/auth/reset-password").json(&PasswordReset {
            token: token.trim(),
            password,
        })?;
        self.client
            .send::<Value>(request)
            .await
            .map(|r| r.message)
            .map_err(|e| e.with_fallback("Failed to reset password"))
    }
}

/// User endpoints answer either with the profile itself or `{user: {...}}`.
fn extract_user(mut data: Value) -> ApiResult<UserProfile> {
    let user = match data.get_mut("user") {
        Some(user) if user.is_object() => user.take(),
        _ => data,
    };
    serde_json::from_value(user).map_err(ApiError::decode)
}
