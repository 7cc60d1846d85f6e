//! Response DTOs for the Web API.

use serde::Serialize;

use crate::db::User;

/// Generic success envelope. Shape matches the error envelope so every
/// response carries `{success, message, data}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Always true for successes.
    pub success: bool,
    /// Human-readable message.
    pub message: String,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new success response.
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}

/// Sanitized account view: secret fields (password hash, refresh token) are
/// structurally absent, not just skipped.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    /// Account ID.
    pub id: i64,
    /// User name.
    pub user_name: String,
    /// Email address.
    pub email: String,
    /// Full display name.
    pub full_name: String,
    /// Avatar media reference.
    pub avatar: String,
    /// Cover image media reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    /// Account creation timestamp.
    pub created_at: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            user_name: user.user_name.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            avatar: user.avatar.clone(),
            cover_image: user.cover_image.clone(),
            created_at: user.created_at.clone(),
        }
    }
}

/// Login and refresh response. Tokens are also delivered as httpOnly
/// cookies; the body copy serves local-storage and mobile clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    /// Sanitized account.
    pub user: UserInfo,
    /// Access token (JWT).
    pub access_token: String,
    /// Refresh token (JWT).
    pub refresh_token: String,
    /// Access token expiry in seconds.
    pub expires_in: u64,
}
