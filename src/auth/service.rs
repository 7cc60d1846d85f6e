//! Session orchestration: register, login, logout, refresh, change password.
//!
//! Ordering matters throughout: passwords are hashed explicitly before any
//! write, and token state is committed to the store before a success value
//! is returned (commit-then-respond). If the caller disconnects after the
//! commit, the new token state is still authoritative.

use tracing::{debug, warn};

use super::password::{hash_password, validate_password, verify_password, PasswordError};
use super::token::{AccessSubject, TokenIssuer};
use crate::db::{Database, NewUser, User, UserRepository};
use crate::{Result, VidhubError};

/// Input for account registration. All fields are required except the cover
/// image reference; absence is a validation failure before any business
/// logic runs.
#[derive(Debug, Clone)]
pub struct RegisterInput {
    /// Desired user name.
    pub user_name: String,
    /// Email address.
    pub email: String,
    /// Full display name.
    pub full_name: String,
    /// Plaintext password.
    pub password: String,
    /// Avatar media reference (required).
    pub avatar: String,
    /// Cover image media reference (optional).
    pub cover_image: Option<String>,
}

/// A freshly issued access/refresh pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    /// Short-lived access token.
    pub access_token: String,
    /// Longer-lived refresh token, persisted as the account's only live one.
    pub refresh_token: String,
    /// Access token expiry in seconds.
    pub expires_in: u64,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// The account record (callers must sanitize before serializing).
    pub user: User,
    /// The issued token pair.
    pub tokens: TokenPair,
}

/// Orchestrates credential verification and the token lifecycle.
#[derive(Clone)]
pub struct AuthService {
    db: Database,
    tokens: TokenIssuer,
}

impl AuthService {
    /// Create the service over an explicit store handle and token issuer.
    pub fn new(db: Database, tokens: TokenIssuer) -> Self {
        Self { db, tokens }
    }

    /// Token issuer, for the middleware's pure access verification.
    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// Store handle.
    pub fn db(&self) -> &Database {
        &self.db
    }

    fn repo(&self) -> UserRepository<'_> {
        UserRepository::from_db(&self.db)
    }

    /// Hash a password on the blocking pool; argon2 is CPU-bound and must
    /// not stall the event loop.
    async fn hash_on_worker(&self, password: String) -> Result<String> {
        let handle = tokio::task::spawn_blocking(move || hash_password(&password));
        match handle.await {
            Ok(Ok(hash)) => Ok(hash),
            Ok(Err(e @ PasswordError::TooLong)) => Err(VidhubError::Validation(e.to_string())),
            Ok(Err(e)) => Err(VidhubError::Internal(e.to_string())),
            Err(e) => Err(VidhubError::Internal(format!("hash task failed: {e}"))),
        }
    }

    /// Verify a password on the blocking pool.
    ///
    /// A corrupt stored hash is an internal failure, never "password
    /// incorrect".
    async fn verify_on_worker(&self, password: String, hash: String) -> Result<bool> {
        let handle = tokio::task::spawn_blocking(move || verify_password(&password, &hash));
        match handle.await {
            Ok(Ok(())) => Ok(true),
            Ok(Err(PasswordError::VerificationFailed)) => Ok(false),
            Ok(Err(e)) => {
                warn!("stored password hash unusable: {e}");
                Err(VidhubError::Internal("credential check failed".to_string()))
            }
            Err(e) => Err(VidhubError::Internal(format!("verify task failed: {e}"))),
        }
    }

    fn issue_pair(&self, user: &User) -> Result<TokenPair> {
        let subject = AccessSubject {
            id: user.id,
            email: user.email.clone(),
            user_name: user.user_name.clone(),
            full_name: user.full_name.clone(),
        };
        let (access_token, _) = self
            .tokens
            .issue_access(&subject)
            .map_err(|e| VidhubError::Internal(e.to_string()))?;
        let (refresh_token, _) = self
            .tokens
            .issue_refresh(user.id)
            .map_err(|e| VidhubError::Internal(e.to_string()))?;
        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: self.tokens.access_expiry_secs(),
        })
    }

    /// Register a new account.
    ///
    /// The password is hashed before the insert; uniqueness is enforced by
    /// the store and surfaces as Conflict. The created account starts with
    /// no session.
    pub async fn register(&self, input: RegisterInput) -> Result<User> {
        for (field, value) in [
            ("userName", &input.user_name),
            ("email", &input.email),
            ("fullName", &input.full_name),
            ("password", &input.password),
        ] {
            if value.trim().is_empty() {
                return Err(VidhubError::Validation(format!("{field} must not be empty")));
            }
        }
        if input.avatar.trim().is_empty() {
            return Err(VidhubError::Validation("avatar is required".to_string()));
        }
        let name_len = input.user_name.trim().chars().count();
        if !(3..=20).contains(&name_len) {
            return Err(VidhubError::Validation(
                "userName must be 3-20 characters".to_string(),
            ));
        }
        validate_password(&input.password)
            .map_err(|e| VidhubError::Validation(e.to_string()))?;

        let password_hash = self.hash_on_worker(input.password).await?;

        let mut new_user = NewUser::new(
            input.user_name.trim(),
            input.email.trim(),
            input.full_name.trim(),
            password_hash,
            input.avatar,
        );
        if let Some(cover) = input.cover_image {
            if !cover.trim().is_empty() {
                new_user = new_user.with_cover_image(cover);
            }
        }

        let user = self.repo().insert(&new_user).await?;
        debug!(user_id = user.id, "account registered");
        Ok(user)
    }

    /// Log in with a user name or email plus password.
    ///
    /// An unknown identifier is NotFound; a wrong password for a known
    /// account is an authentication failure. On success the refresh token is
    /// persisted with an unconditional set: a new login legitimately
    /// replaces any prior session.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<LoginOutcome> {
        if identifier.trim().is_empty() {
            return Err(VidhubError::Validation(
                "userName or email is required".to_string(),
            ));
        }

        let user = self
            .repo()
            .find_by_identifier(identifier)
            .await?
            .ok_or_else(|| VidhubError::NotFound("user".to_string()))?;

        let valid = self
            .verify_on_worker(password.to_string(), user.password.clone())
            .await?;
        if !valid {
            return Err(VidhubError::Auth("invalid credentials".to_string()));
        }

        let tokens = self.issue_pair(&user)?;
        // Commit before responding
        self.repo()
            .set_refresh_token(user.id, &tokens.refresh_token)
            .await?;

        debug!(user_id = user.id, "login succeeded");
        Ok(LoginOutcome { user, tokens })
    }

    /// Rotate a refresh token.
    ///
    /// The compare-and-set is the whole defense: if the presented token is
    /// no longer the account's current one, some other caller already
    /// rotated it (or it was logged out), and this attempt is rejected with
    /// a generic authentication failure. An attacker replaying an old token
    /// and a legitimate tab racing a rotation are deliberately
    /// indistinguishable to the caller.
    pub async fn refresh(&self, presented: &str) -> Result<LoginOutcome> {
        let claims = self
            .tokens
            .verify_refresh(presented)
            .map_err(|_| VidhubError::Auth("invalid refresh token".to_string()))?;

        let user = self
            .repo()
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| VidhubError::Auth("invalid refresh token".to_string()))?;

        let tokens = self.issue_pair(&user)?;
        let rotated = self
            .repo()
            .compare_and_set_refresh_token(user.id, presented, &tokens.refresh_token)
            .await?;
        if !rotated {
            warn!(user_id = user.id, "refresh token reuse detected");
            return Err(VidhubError::Auth("invalid refresh token".to_string()));
        }

        debug!(user_id = user.id, "refresh token rotated");
        Ok(LoginOutcome { user, tokens })
    }

    /// Log out an account. Idempotent; every previously issued refresh token
    /// becomes permanently unusable regardless of expiry.
    pub async fn logout(&self, user_id: i64) -> Result<()> {
        self.repo().clear_refresh_token(user_id).await?;
        debug!(user_id, "logged out");
        Ok(())
    }

    /// Change an account's password after verifying the old one.
    ///
    /// The refresh token is left untouched: existing sessions stay valid.
    /// That is a deliberate, documented choice, open to revisit.
    pub async fn change_password(
        &self,
        user_id: i64,
        old_password: &str,
        new_password: &str,
    ) -> Result<()> {
        let user = self
            .repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| VidhubError::NotFound("user".to_string()))?;

        let valid = self
            .verify_on_worker(old_password.to_string(), user.password.clone())
            .await?;
        if !valid {
            return Err(VidhubError::Auth("old password is incorrect".to_string()));
        }

        let new_hash = self.hash_on_worker(new_password.to_string()).await?;
        self.repo().update_password(user_id, &new_hash).await?;

        debug!(user_id, "password changed");
        Ok(())
    }
}

/// Build an `AuthService` from configuration, for the entry point and tests.
/// The database handle keeps whatever query bound it was opened with.
pub fn build_auth_service(db: Database, auth: &crate::config::AuthConfig) -> AuthService {
    let issuer = TokenIssuer::new(
        &auth.access_token_secret,
        auth.access_token_expiry_secs,
        &auth.refresh_token_secret,
        auth.refresh_token_expiry_days,
    );
    AuthService::new(db, issuer)
}
