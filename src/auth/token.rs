//! Dual-family JWT issuance and verification.
//!
//! Access and refresh tokens are signed against distinct secrets, each with
//! its own TTL. Verification is pure computation; it never consults the
//! store.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Token verification errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    /// Token expiry has elapsed.
    #[error("token expired")]
    Expired,

    /// Token is not a well-formed JWT or claims do not deserialize.
    #[error("malformed token")]
    Malformed,

    /// Signature does not match the key family.
    #[error("invalid token signature")]
    SignatureInvalid,

    /// Signing failed.
    #[error("token signing failed: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
            _ => TokenError::Malformed,
        }
    }
}

/// Access token claims.
///
/// Profile fields are denormalized into the token so protected requests skip
/// a store read. They go stale until the next login or refresh; that is a
/// deliberate tradeoff.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (account ID).
    pub sub: i64,
    /// Email address.
    pub email: String,
    /// User name.
    pub user_name: String,
    /// Full name.
    pub full_name: String,
    /// Issued at timestamp.
    pub iat: u64,
    /// Expiration timestamp.
    pub exp: u64,
    /// JWT ID (unique identifier).
    pub jti: String,
}

/// Refresh token claims. Subject only, no profile data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Subject (account ID).
    pub sub: i64,
    /// Issued at timestamp.
    pub iat: u64,
    /// Expiration timestamp.
    pub exp: u64,
    /// JWT ID; guarantees rotation always produces a distinct token.
    pub jti: String,
}

/// Profile fields carried in an access token.
#[derive(Debug, Clone)]
pub struct AccessSubject {
    /// Account ID.
    pub id: i64,
    /// Email address.
    pub email: String,
    /// User name.
    pub user_name: String,
    /// Full name.
    pub full_name: String,
}

/// Signs and verifies access and refresh tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    access_expiry_secs: u64,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    refresh_expiry_secs: u64,
    validation: Validation,
}

impl TokenIssuer {
    /// Create a token issuer from the two key families.
    ///
    /// Secrets and TTLs are configuration inputs, never hardcoded.
    pub fn new(
        access_secret: &str,
        access_expiry_secs: u64,
        refresh_secret: &str,
        refresh_expiry_days: u64,
    ) -> Self {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        Self {
            access_encoding: EncodingKey::from_secret(access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(access_secret.as_bytes()),
            access_expiry_secs,
            refresh_encoding: EncodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_expiry_secs: refresh_expiry_days * 24 * 60 * 60,
            validation,
        }
    }

    /// Access token TTL in seconds.
    pub fn access_expiry_secs(&self) -> u64 {
        self.access_expiry_secs
    }

    /// Issue an access token. Returns the token and its expiry timestamp.
    pub fn issue_access(&self, subject: &AccessSubject) -> Result<(String, u64), TokenError> {
        let now = chrono::Utc::now().timestamp() as u64;
        let exp = now + self.access_expiry_secs;
        let claims = AccessClaims {
            sub: subject.id,
            email: subject.email.clone(),
            user_name: subject.user_name.clone(),
            full_name: subject.full_name.clone(),
            iat: now,
            exp,
            jti: uuid::Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::default(), &claims, &self.access_encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;
        Ok((token, exp))
    }

    /// Issue a refresh token for an account. Returns the token and its expiry.
    pub fn issue_refresh(&self, subject_id: i64) -> Result<(String, u64), TokenError> {
        let now = chrono::Utc::now().timestamp() as u64;
        let exp = now + self.refresh_expiry_secs;
        let claims = RefreshClaims {
            sub: subject_id,
            iat: now,
            exp,
            jti: uuid::Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::default(), &claims, &self.refresh_encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;
        Ok((token, exp))
    }

    /// Verify an access token against the access key family.
    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let data = decode::<AccessClaims>(token, &self.access_decoding, &self.validation)?;
        Ok(data.claims)
    }

    /// Verify a refresh token against the refresh key family.
    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        let data = decode::<RefreshClaims>(token, &self.refresh_decoding, &self.validation)?;
        Ok(data.claims)
    }
}
