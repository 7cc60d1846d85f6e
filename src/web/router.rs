//! Router configuration for the Web API.

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    change_password, current_user, login, logout, refresh, register, update_account,
    update_avatar, update_cover_image, AppState,
};
use super::middleware::{create_cors_layer, session_auth};

/// Create the main API router.
///
/// Public routes carry no session; protected routes enforce one through the
/// extractor, so there is no separate route-level guard to keep in sync.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let public_routes = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh-token", post(refresh));

    let protected_routes = Router::new()
        .route("/logout", post(logout))
        .route("/change-password", post(change_password))
        .route("/current-user", get(current_user))
        .route("/update-account", patch(update_account))
        .route("/avatar", patch(update_avatar))
        .route("/cover-image", patch(update_cover_image));

    let user_routes = Router::new().merge(public_routes).merge(protected_routes);

    let api_routes = Router::new().nest("/users", user_routes);

    let auth_for_middleware = Arc::new(app_state.auth.clone());

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(move |req, next| {
                    let auth = auth_for_middleware.clone();
                    session_auth(auth, req, next)
                })),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
