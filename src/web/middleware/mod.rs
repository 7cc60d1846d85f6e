//! Middleware for the Web API.

pub mod auth;
pub mod cors;

pub use auth::{session_auth, AuthUser, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
pub use cors::create_cors_layer;
