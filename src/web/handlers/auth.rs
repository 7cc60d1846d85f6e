//! Session handlers: register, login, logout, refresh, change password.
//!
//! Handlers translate between the wire (DTOs, cookies, status codes) and
//! the auth service; the service owns ordering and store semantics.

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;

use crate::auth::{AuthService, RegisterInput, TokenPair};
use crate::web::dto::{
    ApiResponse, ChangePasswordRequest, LoginRequest, RefreshRequest, RegisterRequest,
    SessionResponse, UserInfo, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::{AuthUser, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Auth service owning credential and token lifecycle logic.
    pub auth: AuthService,
    /// Whether session cookies carry the Secure flag.
    pub cookie_secure: bool,
}

impl AppState {
    /// Create a new application state.
    pub fn new(auth: AuthService, cookie_secure: bool) -> Self {
        Self {
            auth,
            cookie_secure,
        }
    }
}

fn session_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(name, value);
    cookie.set_http_only(true);
    cookie.set_secure(secure);
    cookie.set_path("/");
    cookie.set_same_site(SameSite::Strict);
    cookie
}

fn set_session_cookies(jar: CookieJar, tokens: &TokenPair, secure: bool) -> CookieJar {
    jar.add(session_cookie(
        ACCESS_TOKEN_COOKIE,
        tokens.access_token.clone(),
        secure,
    ))
    .add(session_cookie(
        REFRESH_TOKEN_COOKIE,
        tokens.refresh_token.clone(),
        secure,
    ))
}

fn clear_session_cookies(jar: CookieJar, secure: bool) -> CookieJar {
    // Removal cookies must match the attributes they were set with
    jar.remove(session_cookie(
        ACCESS_TOKEN_COOKIE,
        String::new(),
        secure,
    ))
    .remove(session_cookie(
        REFRESH_TOKEN_COOKIE,
        String::new(),
        secure,
    ))
}

/// POST /api/users/register - Create a new account.
///
/// Registration does not log the account in; the client follows up with a
/// login request.
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserInfo>>), ApiError> {
    let user = state
        .auth
        .register(RegisterInput {
            user_name: req.user_name,
            email: req.email,
            full_name: req.full_name,
            password: req.password,
            avatar: req.avatar,
            cover_image: req.cover_image,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            "User registered successfully",
            UserInfo::from(&user),
        )),
    ))
}

/// POST /api/users/login - Authenticate and open a session.
///
/// Tokens are delivered twice: as httpOnly cookies and in the body.
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<SessionResponse>>), ApiError> {
    let outcome = state
        .auth
        .login(&req.user_name_or_email, &req.password)
        .await?;

    let jar = set_session_cookies(jar, &outcome.tokens, state.cookie_secure);
    let response = SessionResponse {
        user: UserInfo::from(&outcome.user),
        access_token: outcome.tokens.access_token,
        refresh_token: outcome.tokens.refresh_token,
        expires_in: outcome.tokens.expires_in,
    };

    Ok((
        jar,
        Json(ApiResponse::new("User logged in successfully", response)),
    ))
}

/// POST /api/users/logout - Close the session.
///
/// Requires a valid access token; the stored refresh token is cleared and
/// both cookies are expired.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    session: AuthUser,
    jar: CookieJar,
) -> Result<(CookieJar, Json<ApiResponse<()>>), ApiError> {
    state.auth.logout(session.user.id).await?;

    let jar = clear_session_cookies(jar, state.cookie_secure);
    Ok((
        jar,
        Json(ApiResponse::new("User logged out successfully", ())),
    ))
}

/// POST /api/users/refresh-token - Rotate the refresh token.
///
/// The presented token comes from the refresh cookie or, for non-browser
/// clients, the request body. No access token is required; an expired one
/// is the normal reason to be here.
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    body: Option<Json<RefreshRequest>>,
) -> Result<(CookieJar, Json<ApiResponse<SessionResponse>>), ApiError> {
    let presented = jar
        .get(REFRESH_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .or_else(|| body.and_then(|Json(req)| req.refresh_token))
        .ok_or_else(|| ApiError::unauthorized("Unauthorized request"))?;

    let outcome = state.auth.refresh(&presented).await?;

    let jar = set_session_cookies(jar, &outcome.tokens, state.cookie_secure);
    let response = SessionResponse {
        user: UserInfo::from(&outcome.user),
        access_token: outcome.tokens.access_token,
        refresh_token: outcome.tokens.refresh_token,
        expires_in: outcome.tokens.expires_in,
    };

    Ok((
        jar,
        Json(ApiResponse::new("Access token refreshed", response)),
    ))
}

/// POST /api/users/change-password - Change the account password.
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    session: AuthUser,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .auth
        .change_password(session.user.id, &req.old_password, &req.new_password)
        .await?;

    Ok(Json(ApiResponse::new("Password changed successfully", ())))
}
