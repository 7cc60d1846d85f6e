//! User account model for VIDHUB.

/// User account entity as stored.
///
/// Carries the password hash and current refresh token; must never be
/// serialized to a client as-is. The web layer converts to a sanitized
/// view before responding.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique account ID.
    pub id: i64,
    /// User name (unique, lowercase).
    pub user_name: String,
    /// Email address (unique, lowercase).
    pub email: String,
    /// Full display name.
    pub full_name: String,
    /// Password hash (Argon2). Never the plaintext.
    pub password: String,
    /// Avatar media reference.
    pub avatar: String,
    /// Cover image media reference (optional).
    pub cover_image: Option<String>,
    /// The only refresh token currently accepted for this account, if any.
    pub refresh_token: Option<String>,
    /// Account creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

/// Data for creating a new account.
///
/// `password` must already be hashed; hashing is an explicit step in
/// `AuthService`, never a hidden side effect of a write.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// User name (will be stored lowercase).
    pub user_name: String,
    /// Email address (will be stored lowercase).
    pub email: String,
    /// Full display name.
    pub full_name: String,
    /// Password hash.
    pub password: String,
    /// Avatar media reference.
    pub avatar: String,
    /// Cover image media reference (optional).
    pub cover_image: Option<String>,
}

impl NewUser {
    /// Create a new account record with the required fields.
    pub fn new(
        user_name: impl Into<String>,
        email: impl Into<String>,
        full_name: impl Into<String>,
        password: impl Into<String>,
        avatar: impl Into<String>,
    ) -> Self {
        Self {
            user_name: user_name.into().to_lowercase(),
            email: email.into().to_lowercase(),
            full_name: full_name.into(),
            password: password.into(),
            avatar: avatar.into(),
            cover_image: None,
        }
    }

    /// Set the cover image reference.
    pub fn with_cover_image(mut self, cover_image: impl Into<String>) -> Self {
        self.cover_image = Some(cover_image.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_lowercases_identifiers() {
        let user = NewUser::new("Neo", "Neo@X.com", "Neo", "hash", "avatar-ref");
        assert_eq!(user.user_name, "neo");
        assert_eq!(user.email, "neo@x.com");
        assert_eq!(user.full_name, "Neo");
        assert!(user.cover_image.is_none());
    }

    #[test]
    fn test_new_user_with_cover_image() {
        let user = NewUser::new("neo", "neo@x.com", "Neo", "hash", "avatar-ref")
            .with_cover_image("cover-ref");
        assert_eq!(user.cover_image.as_deref(), Some("cover-ref"));
    }
}
