//! Database module for VIDHUB.
//!
//! This module provides SQLite database connectivity and migration management.

mod repository;
mod schema;
mod user;

pub use repository::UserRepository;
pub use schema::MIGRATIONS;
pub use user::{NewUser, User};

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::Result;

/// Database connection pool type.
pub type DbPool = SqlitePool;

/// Database wrapper for managing the SQLite pool and migrations.
///
/// Constructed once at process start and passed into the services that need
/// it; there is no global handle.
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    query_timeout: Duration,
}

impl Database {
    /// Open a database at the specified path.
    ///
    /// If the database file doesn't exist, it will be created.
    /// Migrations are automatically applied.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening database at {:?}", path);

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", path.display()))
            .map_err(|e| crate::VidhubError::Database(e.to_string()))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await?;

        let db = Self {
            pool,
            query_timeout: Duration::from_millis(5000),
        };
        db.migrate().await?;

        Ok(db)
    }

    /// Open an in-memory database for testing.
    pub async fn open_in_memory() -> Result<Self> {
        debug!("Opening in-memory database");

        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| crate::VidhubError::Database(e.to_string()))?
            .foreign_keys(true);

        // A single connection keeps every query on the same in-memory database
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await?;

        let db = Self {
            pool,
            query_timeout: Duration::from_millis(5000),
        };
        db.migrate().await?;

        Ok(db)
    }

    /// Set the bound on a single store round-trip.
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Get a reference to the underlying pool.
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Bound on a single store round-trip.
    pub fn query_timeout(&self) -> Duration {
        self.query_timeout
    }

    /// Close the pool. Called by the entry point on shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Get the current schema version.
    pub async fn schema_version(&self) -> Result<i64> {
        let table_exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        )
        .fetch_one(&self.pool)
        .await?;

        if !table_exists.0 {
            return Ok(0);
        }

        let version: (i64,) =
            sqlx::query_as("SELECT COALESCE(MAX(version), 0) FROM schema_version")
                .fetch_one(&self.pool)
                .await?;

        Ok(version.0)
    }

    /// Apply pending migrations.
    pub async fn migrate(&self) -> Result<()> {
        let current_version = self.schema_version().await?;
        let migrations = MIGRATIONS;

        if current_version as usize >= migrations.len() {
            debug!("Database is up to date (version {})", current_version);
            return Ok(());
        }

        info!(
            "Migrating database from version {} to {}",
            current_version,
            migrations.len()
        );

        // Ensure schema_version table exists
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS schema_version (
                version     INTEGER PRIMARY KEY,
                applied_at  TEXT NOT NULL DEFAULT (datetime('now'))
            )",
        )
        .execute(&self.pool)
        .await?;

        // Apply each pending migration in a transaction
        for (i, migration) in migrations.iter().enumerate().skip(current_version as usize) {
            let version = (i + 1) as i64;
            info!("Applying migration v{}", version);

            let mut tx = self.pool.begin().await?;

            sqlx::raw_sql(migration).execute(&mut *tx).await?;

            sqlx::query("INSERT INTO schema_version (version) VALUES (?)")
                .bind(version)
                .execute(&mut *tx)
                .await?;

            tx.commit().await?;
            debug!("Migration v{} applied successfully", version);
        }

        info!(
            "Database migration complete (now at version {})",
            migrations.len()
        );
        Ok(())
    }

    /// Check if a table exists.
    pub async fn table_exists(&self, table_name: &str) -> Result<bool> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name=?)",
        )
        .bind(table_name)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists.0)
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_in_memory() {
        let db = Database::open_in_memory().await.unwrap();
        assert!(db.schema_version().await.unwrap() > 0);
    }

    #[tokio::test]
    async fn test_migrations_applied() {
        let db = Database::open_in_memory().await.unwrap();

        let version = db.schema_version().await.unwrap();
        assert_eq!(version as usize, MIGRATIONS.len());
    }

    #[tokio::test]
    async fn test_users_table_exists() {
        let db = Database::open_in_memory().await.unwrap();

        assert!(db.table_exists("users").await.unwrap());
        assert!(!db.table_exists("videos").await.unwrap());
    }

    #[tokio::test]
    async fn test_insert_and_query_user() {
        let db = Database::open_in_memory().await.unwrap();

        sqlx::query(
            "INSERT INTO users (user_name, email, full_name, password, avatar)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind("testuser")
        .bind("test@example.com")
        .bind("Test User")
        .bind("hashedpassword")
        .bind("avatar-ref")
        .execute(db.pool())
        .await
        .unwrap();

        let (id, user_name, email): (i64, String, String) =
            sqlx::query_as("SELECT id, user_name, email FROM users WHERE user_name = ?")
                .bind("testuser")
                .fetch_one(db.pool())
                .await
                .unwrap();

        assert_eq!(id, 1);
        assert_eq!(user_name, "testuser");
        assert_eq!(email, "test@example.com");
    }

    #[tokio::test]
    async fn test_unique_constraints() {
        let db = Database::open_in_memory().await.unwrap();

        sqlx::query(
            "INSERT INTO users (user_name, email, full_name, password, avatar)
             VALUES ('dupe', 'dupe@x.com', 'Dupe', 'hash', 'a')",
        )
        .execute(db.pool())
        .await
        .unwrap();

        // Same user_name
        let err = sqlx::query(
            "INSERT INTO users (user_name, email, full_name, password, avatar)
             VALUES ('dupe', 'other@x.com', 'Other', 'hash', 'a')",
        )
        .execute(db.pool())
        .await
        .unwrap_err();
        assert!(err
            .as_database_error()
            .is_some_and(|db_err| db_err.is_unique_violation()));

        // Same email
        let err = sqlx::query(
            "INSERT INTO users (user_name, email, full_name, password, avatar)
             VALUES ('other', 'dupe@x.com', 'Other', 'hash', 'a')",
        )
        .execute(db.pool())
        .await
        .unwrap_err();
        assert!(err
            .as_database_error()
            .is_some_and(|db_err| db_err.is_unique_violation()));
    }

    #[tokio::test]
    async fn test_open_file_database() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");

        // Open and close database
        {
            let db = Database::open(&db_path).await.unwrap();
            assert!(db.table_exists("users").await.unwrap());
            db.close().await;
        }

        // Reopen database; migrations should not be reapplied
        {
            let db = Database::open(&db_path).await.unwrap();
            assert_eq!(db.schema_version().await.unwrap() as usize, MIGRATIONS.len());
            db.close().await;
        }
    }
}
