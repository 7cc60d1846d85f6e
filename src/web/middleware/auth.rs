//! Session verification middleware.
//!
//! Protected handlers opt in by taking the [`AuthUser`] extractor. The
//! access token arrives either in the `access-token` cookie (browser
//! clients) or as an `Authorization: Bearer` header (mobile and API
//! clients). After the pure JWT check the account is loaded from the store,
//! so a request for an account deleted since token issuance fails here and
//! handlers always see a live, sanitized account.

use axum::{
    body::Body,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, Request},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::auth::{AccessClaims, AuthService};
use crate::db::UserRepository;
use crate::web::dto::UserInfo;
use crate::web::error::ApiError;

/// Cookie carrying the access token.
pub const ACCESS_TOKEN_COOKIE: &str = "access-token";

/// Cookie carrying the refresh token.
pub const REFRESH_TOKEN_COOKIE: &str = "refresh-token";

/// Extractor for authenticated requests.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Verified access token claims.
    pub claims: AccessClaims,
    /// The sanitized account, freshly loaded from the store.
    pub user: UserInfo,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            // Cookie first, then the Authorization header
            let jar = CookieJar::from_headers(&parts.headers);
            let token = match jar.get(ACCESS_TOKEN_COOKIE) {
                Some(cookie) => cookie.value().to_string(),
                None => parts
                    .headers
                    .get(AUTHORIZATION)
                    .and_then(|value| value.to_str().ok())
                    .and_then(|header| header.strip_prefix("Bearer "))
                    .map(|t| t.to_string())
                    .ok_or_else(|| ApiError::unauthorized("Unauthorized request"))?,
            };

            // Get the auth service from extensions (set by middleware)
            let auth = parts
                .extensions
                .get::<Arc<AuthService>>()
                .ok_or_else(|| ApiError::internal("Auth service not configured"))?;

            let claims = auth.tokens().verify_access(&token).map_err(|e| {
                tracing::debug!("access token rejected: {}", e);
                ApiError::unauthorized("Invalid or expired access token")
            })?;

            // Account deleted since issuance is indistinguishable from a bad
            // token to the caller
            let user = UserRepository::from_db(auth.db())
                .find_by_id(claims.sub)
                .await
                .map_err(ApiError::from)?
                .ok_or_else(|| ApiError::unauthorized("Invalid or expired access token"))?;

            Ok(AuthUser {
                claims,
                user: UserInfo::from(&user),
            })
        })
    }
}

/// Middleware function to inject the auth service into request extensions.
pub async fn session_auth(
    auth: Arc<AuthService>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    request.extensions_mut().insert(auth);
    next.run(request).await
}
