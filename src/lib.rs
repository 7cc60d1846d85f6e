//! VIDHUB - Session Authentication Service
//!
//! Account, session, and token lifecycle backend for a video platform,
//! exposed as a JSON Web API.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod web;

pub use auth::{
    build_auth_service, hash_password, validate_password, verify_password, AuthService,
    LoginOutcome, PasswordError, RegisterInput, TokenError, TokenIssuer, TokenPair,
};
pub use config::Config;
pub use db::{Database, NewUser, User, UserRepository};
pub use error::{Result, VidhubError};
pub use web::WebServer;
