//! User repository for VIDHUB.
//!
//! All refresh-token mutations go through either the unconditional set
//! (login starts a brand-new session) or the compare-and-set (rotation),
//! which is what makes rotation and reuse detection race-safe without any
//! per-account lock.

use std::future::Future;
use std::time::Duration;

use sqlx::SqlitePool;

use super::user::{NewUser, User};
use crate::{Result, VidhubError};

const USER_COLUMNS: &str = "id, user_name, email, full_name, password, avatar, cover_image,
             refresh_token, created_at, updated_at";

/// Repository for account operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
    timeout: Duration,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository borrowing the given pool.
    pub fn new(pool: &'a SqlitePool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    /// Create a repository from a database handle.
    pub fn from_db(db: &'a super::Database) -> Self {
        Self::new(db.pool(), db.query_timeout())
    }

    /// Run a store round-trip under the configured bound.
    ///
    /// A query that cannot complete in time fails instead of hanging its
    /// caller.
    async fn bounded<T>(&self, fut: impl Future<Output = sqlx::Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(VidhubError::DatabaseTimeout),
        }
    }

    /// Insert a new account.
    ///
    /// Uniqueness of user_name and email is enforced by the storage layer;
    /// a violation is translated into Conflict here rather than trusting a
    /// prior existence check.
    pub async fn insert(&self, new_user: &NewUser) -> Result<User> {
        let result = tokio::time::timeout(
            self.timeout,
            sqlx::query(
                "INSERT INTO users (user_name, email, full_name, password, avatar, cover_image)
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(&new_user.user_name)
            .bind(&new_user.email)
            .bind(&new_user.full_name)
            .bind(&new_user.password)
            .bind(&new_user.avatar)
            .bind(&new_user.cover_image)
            .execute(self.pool),
        )
        .await
        .map_err(|_| VidhubError::DatabaseTimeout)?;

        let result = match result {
            Ok(r) => r,
            Err(e) => {
                if e.as_database_error()
                    .is_some_and(|db_err| db_err.is_unique_violation())
                {
                    return Err(VidhubError::Conflict(
                        "user name or email already exists".to_string(),
                    ));
                }
                return Err(e.into());
            }
        };

        let id = result.last_insert_rowid();
        self.find_by_id(id)
            .await?
            .ok_or_else(|| VidhubError::NotFound("user".to_string()))
    }

    /// Get an account by ID.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        self.bounded(
            sqlx::query_as::<_, User>(&format!(
                "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
            ))
            .bind(id)
            .fetch_optional(self.pool),
        )
        .await
    }

    /// Get an account by user name or email.
    ///
    /// Identifiers are stored lowercase, so the lookup lowercases its input.
    pub async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>> {
        let identifier = identifier.to_lowercase();
        self.bounded(
            sqlx::query_as::<_, User>(&format!(
                "SELECT {USER_COLUMNS} FROM users WHERE user_name = ? OR email = ?"
            ))
            .bind(&identifier)
            .bind(&identifier)
            .fetch_optional(self.pool),
        )
        .await
    }

    /// Unconditionally set the refresh token for an account.
    ///
    /// Login uses this: a fresh session legitimately overwrites whatever was
    /// there (the single-session boundary).
    pub async fn set_refresh_token(&self, id: i64, token: &str) -> Result<()> {
        let result = self
            .bounded(
                sqlx::query(
                    "UPDATE users SET refresh_token = ?, updated_at = datetime('now')
                     WHERE id = ?",
                )
                .bind(token)
                .bind(id)
                .execute(self.pool),
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(VidhubError::NotFound("user".to_string()));
        }
        Ok(())
    }

    /// Replace the refresh token only if the stored value still equals
    /// `expected_current`.
    ///
    /// Returns false when the stored value has moved on, which signals a
    /// racing or stale caller. This is the single primitive behind rotation
    /// and reuse detection; unrelated accounts never contend.
    pub async fn compare_and_set_refresh_token(
        &self,
        id: i64,
        expected_current: &str,
        new_value: &str,
    ) -> Result<bool> {
        let result = self
            .bounded(
                sqlx::query(
                    "UPDATE users SET refresh_token = ?, updated_at = datetime('now')
                     WHERE id = ? AND refresh_token = ?",
                )
                .bind(new_value)
                .bind(id)
                .bind(expected_current)
                .execute(self.pool),
            )
            .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Clear the refresh token for an account. Idempotent.
    pub async fn clear_refresh_token(&self, id: i64) -> Result<()> {
        self.bounded(
            sqlx::query(
                "UPDATE users SET refresh_token = NULL, updated_at = datetime('now')
                 WHERE id = ?",
            )
            .bind(id)
            .execute(self.pool),
        )
        .await?;
        Ok(())
    }

    /// Replace the password hash. Does not touch the refresh token.
    pub async fn update_password(&self, id: i64, password_hash: &str) -> Result<()> {
        let result = self
            .bounded(
                sqlx::query(
                    "UPDATE users SET password = ?, updated_at = datetime('now') WHERE id = ?",
                )
                .bind(password_hash)
                .bind(id)
                .execute(self.pool),
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(VidhubError::NotFound("user".to_string()));
        }
        Ok(())
    }

    /// Update full name and email. Returns the updated account.
    ///
    /// Email uniqueness is enforced by the storage layer, same as insert.
    pub async fn update_account(
        &self,
        id: i64,
        full_name: &str,
        email: &str,
    ) -> Result<Option<User>> {
        let result = tokio::time::timeout(
            self.timeout,
            sqlx::query(
                "UPDATE users SET full_name = ?, email = ?, updated_at = datetime('now')
                 WHERE id = ?",
            )
            .bind(full_name)
            .bind(email.to_lowercase())
            .bind(id)
            .execute(self.pool),
        )
        .await
        .map_err(|_| VidhubError::DatabaseTimeout)?;

        let result = match result {
            Ok(r) => r,
            Err(e) => {
                if e.as_database_error()
                    .is_some_and(|db_err| db_err.is_unique_violation())
                {
                    return Err(VidhubError::Conflict("email already exists".to_string()));
                }
                return Err(e.into());
            }
        };

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    /// Update the avatar reference. Returns the updated account.
    pub async fn update_avatar(&self, id: i64, avatar: &str) -> Result<Option<User>> {
        let result = self
            .bounded(
                sqlx::query(
                    "UPDATE users SET avatar = ?, updated_at = datetime('now') WHERE id = ?",
                )
                .bind(avatar)
                .bind(id)
                .execute(self.pool),
            )
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    /// Update the cover image reference. Returns the updated account.
    pub async fn update_cover_image(&self, id: i64, cover_image: &str) -> Result<Option<User>> {
        let result = self
            .bounded(
                sqlx::query(
                    "UPDATE users SET cover_image = ?, updated_at = datetime('now') WHERE id = ?",
                )
                .bind(cover_image)
                .bind(id)
                .execute(self.pool),
            )
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    fn sample_user(name: &str) -> NewUser {
        NewUser::new(
            name,
            format!("{name}@example.com"),
            "Test User",
            "$argon2id$fakehash",
            "avatar-ref",
        )
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let db = setup_db().await;
        let repo = UserRepository::from_db(&db);

        let user = repo.insert(&sample_user("neo")).await.unwrap();
        assert_eq!(user.user_name, "neo");
        assert_eq!(user.email, "neo@example.com");
        assert!(user.refresh_token.is_none());

        let by_id = repo.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(by_id.id, user.id);

        let by_name = repo.find_by_identifier("neo").await.unwrap().unwrap();
        assert_eq!(by_name.id, user.id);

        let by_email = repo
            .find_by_identifier("neo@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, user.id);

        let missing = repo.find_by_identifier("trinity").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_find_by_identifier_case_insensitive() {
        let db = setup_db().await;
        let repo = UserRepository::from_db(&db);

        repo.insert(&sample_user("neo")).await.unwrap();

        let found = repo.find_by_identifier("NEO").await.unwrap();
        assert!(found.is_some());

        let found = repo.find_by_identifier("Neo@Example.com").await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn test_insert_duplicate_user_name_is_conflict() {
        let db = setup_db().await;
        let repo = UserRepository::from_db(&db);

        repo.insert(&sample_user("neo")).await.unwrap();

        let mut dupe = sample_user("neo");
        dupe.email = "different@example.com".to_string();
        let err = repo.insert(&dupe).await.unwrap_err();
        assert!(matches!(err, VidhubError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_insert_duplicate_email_is_conflict() {
        let db = setup_db().await;
        let repo = UserRepository::from_db(&db);

        repo.insert(&sample_user("neo")).await.unwrap();

        let mut dupe = sample_user("morpheus");
        dupe.email = "neo@example.com".to_string();
        let err = repo.insert(&dupe).await.unwrap_err();
        assert!(matches!(err, VidhubError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_set_and_clear_refresh_token() {
        let db = setup_db().await;
        let repo = UserRepository::from_db(&db);
        let user = repo.insert(&sample_user("neo")).await.unwrap();

        repo.set_refresh_token(user.id, "token-1").await.unwrap();
        let user = repo.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(user.refresh_token.as_deref(), Some("token-1"));

        repo.clear_refresh_token(user.id).await.unwrap();
        let user = repo.find_by_id(user.id).await.unwrap().unwrap();
        assert!(user.refresh_token.is_none());

        // Clearing again is idempotent
        repo.clear_refresh_token(user.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_compare_and_set_success_and_failure() {
        let db = setup_db().await;
        let repo = UserRepository::from_db(&db);
        let user = repo.insert(&sample_user("neo")).await.unwrap();

        repo.set_refresh_token(user.id, "token-1").await.unwrap();

        // Matching expectation wins
        let swapped = repo
            .compare_and_set_refresh_token(user.id, "token-1", "token-2")
            .await
            .unwrap();
        assert!(swapped);

        // Stale expectation loses, state unchanged
        let swapped = repo
            .compare_and_set_refresh_token(user.id, "token-1", "token-3")
            .await
            .unwrap();
        assert!(!swapped);

        let user = repo.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(user.refresh_token.as_deref(), Some("token-2"));
    }

    #[tokio::test]
    async fn test_compare_and_set_after_clear_fails() {
        let db = setup_db().await;
        let repo = UserRepository::from_db(&db);
        let user = repo.insert(&sample_user("neo")).await.unwrap();

        repo.set_refresh_token(user.id, "token-1").await.unwrap();
        repo.clear_refresh_token(user.id).await.unwrap();

        // NULL never equals the expected value
        let swapped = repo
            .compare_and_set_refresh_token(user.id, "token-1", "token-2")
            .await
            .unwrap();
        assert!(!swapped);
    }

    #[tokio::test]
    async fn test_update_password() {
        let db = setup_db().await;
        let repo = UserRepository::from_db(&db);
        let user = repo.insert(&sample_user("neo")).await.unwrap();

        repo.update_password(user.id, "$argon2id$newhash")
            .await
            .unwrap();
        let user = repo.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(user.password, "$argon2id$newhash");

        let err = repo.update_password(9999, "x").await.unwrap_err();
        assert!(matches!(err, VidhubError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_account_fields() {
        let db = setup_db().await;
        let repo = UserRepository::from_db(&db);
        let user = repo.insert(&sample_user("neo")).await.unwrap();

        let updated = repo
            .update_account(user.id, "Thomas Anderson", "Anderson@Zion.org")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.full_name, "Thomas Anderson");
        assert_eq!(updated.email, "anderson@zion.org");

        let missing = repo
            .update_account(9999, "Nobody", "nobody@x.com")
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_update_account_duplicate_email_is_conflict() {
        let db = setup_db().await;
        let repo = UserRepository::from_db(&db);

        repo.insert(&sample_user("neo")).await.unwrap();
        let other = repo.insert(&sample_user("morpheus")).await.unwrap();

        let err = repo
            .update_account(other.id, "Morpheus", "Neo@Example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, VidhubError::Conflict(_)));

        // The losing update leaves the row untouched
        let unchanged = repo.find_by_id(other.id).await.unwrap().unwrap();
        assert_eq!(unchanged.email, "morpheus@example.com");
    }

    #[tokio::test]
    async fn test_update_media_references() {
        let db = setup_db().await;
        let repo = UserRepository::from_db(&db);
        let user = repo.insert(&sample_user("neo")).await.unwrap();

        let updated = repo
            .update_avatar(user.id, "new-avatar-ref")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.avatar, "new-avatar-ref");

        let updated = repo
            .update_cover_image(user.id, "new-cover-ref")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.cover_image.as_deref(), Some("new-cover-ref"));
    }
}
