//! Request DTOs for the Web API.
//!
//! Every operation has a fully typed input; absence of a required field is
//! a validation failure before any business logic runs.

use serde::Deserialize;
use validator::Validate;

/// User registration request. Media files are uploaded out of band; the
/// request carries opaque references.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// User name (stored lowercase).
    #[validate(length(min = 3, max = 20, message = "must be 3-20 characters"))]
    pub user_name: String,
    /// Email address.
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    /// Full display name.
    #[validate(length(min = 1, message = "must not be empty"))]
    pub full_name: String,
    /// Password. Any non-empty value up to the storage bound is accepted.
    #[validate(length(min = 1, max = 128, message = "must be 1-128 characters"))]
    pub password: String,
    /// Avatar media reference (required).
    #[validate(length(min = 1, message = "is required"))]
    pub avatar: String,
    /// Cover image media reference (optional).
    #[serde(default)]
    pub cover_image: Option<String>,
}

/// Login request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// User name or email address.
    #[validate(length(min = 1, message = "is required"))]
    pub user_name_or_email: String,
    /// Password.
    pub password: String,
}

/// Token refresh request. The token may also arrive in the refresh cookie;
/// the body is the fallback for non-browser clients.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    /// Refresh token.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Password change request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    /// Current password.
    pub old_password: String,
    /// New password.
    #[validate(length(min = 1, max = 128, message = "must be 1-128 characters"))]
    pub new_password: String,
}

/// Account profile update request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    /// New full name.
    #[validate(length(min = 1, message = "must not be empty"))]
    pub full_name: String,
    /// New email address.
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
}

/// Avatar update request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAvatarRequest {
    /// New avatar media reference.
    #[validate(length(min = 1, message = "is required"))]
    pub avatar: String,
}

/// Cover image update request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCoverImageRequest {
    /// New cover image media reference.
    #[validate(length(min = 1, message = "is required"))]
    pub cover_image: String,
}
