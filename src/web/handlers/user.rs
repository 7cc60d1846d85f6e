//! Account profile handlers.
//!
//! The session gate has already loaded a live, sanitized account; these
//! handlers only touch the store when they mutate it.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::db::UserRepository;
use crate::web::dto::{
    ApiResponse, UpdateAccountRequest, UpdateAvatarRequest, UpdateCoverImageRequest, UserInfo,
    ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;

use super::AppState;

/// GET /api/users/current-user - Get the authenticated account.
pub async fn current_user(session: AuthUser) -> Json<ApiResponse<UserInfo>> {
    Json(ApiResponse::new(
        "Current user fetched successfully",
        session.user,
    ))
}

/// PATCH /api/users/update-account - Update full name and email.
pub async fn update_account(
    State(state): State<Arc<AppState>>,
    session: AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateAccountRequest>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    let user = UserRepository::from_db(state.auth.db())
        .update_account(session.user.id, &req.full_name, &req.email)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(ApiResponse::new(
        "Account details updated successfully",
        UserInfo::from(&user),
    )))
}

/// PATCH /api/users/avatar - Replace the avatar reference.
pub async fn update_avatar(
    State(state): State<Arc<AppState>>,
    session: AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateAvatarRequest>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    let user = UserRepository::from_db(state.auth.db())
        .update_avatar(session.user.id, &req.avatar)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(ApiResponse::new(
        "Avatar updated successfully",
        UserInfo::from(&user),
    )))
}

/// PATCH /api/users/cover-image - Replace the cover image reference.
pub async fn update_cover_image(
    State(state): State<Arc<AppState>>,
    session: AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateCoverImageRequest>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    let user = UserRepository::from_db(state.auth.db())
        .update_cover_image(session.user.id, &req.cover_image)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(ApiResponse::new(
        "Cover image updated successfully",
        UserInfo::from(&user),
    )))
}
