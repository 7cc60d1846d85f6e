//! Database schema and migrations for VIDHUB.
//!
//! This module contains all database migrations that will be applied
//! sequentially when the database is first opened or upgraded.

/// Database migrations.
///
/// Each migration is a SQL script that will be executed in order.
/// The schema_version table tracks which migrations have been applied.
pub const MIGRATIONS: &[&str] = &[
    // v1: Initial schema - users table
    r#"
-- Accounts table for authentication and profile data
CREATE TABLE users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    user_name     TEXT NOT NULL UNIQUE,    -- lowercase, 3-20 chars
    email         TEXT NOT NULL UNIQUE,    -- lowercase
    full_name     TEXT NOT NULL,
    password      TEXT NOT NULL,           -- Argon2 hash
    avatar        TEXT NOT NULL,           -- opaque media reference
    cover_image   TEXT,                    -- optional media reference
    refresh_token TEXT,                    -- at most one live session per account
    created_at    TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at    TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_users_user_name ON users(user_name);
CREATE INDEX idx_users_email ON users(email);
"#,
];
