//! Request handlers for the Web API.

pub mod auth;
pub mod user;

pub use auth::{change_password, login, logout, refresh, register, AppState};
pub use user::{current_user, update_account, update_avatar, update_cover_image};
