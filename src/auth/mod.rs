//! Authentication module for VIDHUB.
//!
//! Credential verification, dual-token issuance, refresh rotation with
//! reuse detection, and password management.

pub mod password;
pub mod service;
pub mod token;

pub use password::{
    hash_password, validate_password, verify_password, PasswordError, MAX_PASSWORD_LENGTH,
};
pub use service::{build_auth_service, AuthService, LoginOutcome, RegisterInput, TokenPair};
pub use token::{AccessClaims, AccessSubject, RefreshClaims, TokenError, TokenIssuer};
