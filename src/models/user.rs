//! Users and authentication payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The logged-in user's profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(alias = "id")]
    pub user_id: u64,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    /// Fields this crate does not model, kept so profile merges are lossless.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    /// Overlay the fields of `update` onto this profile.
    pub fn merge(&mut self, update: UserProfile) {
        self.user_id = update.user_id;
        if update.phone.is_some() {
            self.phone = update.phone;
        }
        if update.full_name.is_some() {
            self.full_name = update.full_name;
        }
        if update.email.is_some() {
            self.email = update.email;
        }
        if update.role.is_some() {
            self.role = update.role;
        }
        self.extra.extend(update.extra);
    }
}

/// `POST /auth/login` request body.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
}

/// `POST /auth/login` response data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "accessToken", alias = "access_token")]
    pub access_token: String,
    pub user: UserProfile,
}

/// `POST /auth/register` request body.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Registration {
    pub full_name: String,
    pub phone: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// `PUT /users/profile` request body. Only set fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}
