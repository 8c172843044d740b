//! User repository for database operations.

use chrono::Utc;
use sqlx::SqlitePool;

use apex_core::{Email, Role, UserId};

use super::{RepositoryError, conflict_on_unique};
use crate::models::user::User;

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: UserId,
    name: String,
    email: String,
    role: Role,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            name: row.name,
            email,
            role: row.role,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserWithHashRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a user with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        name: &str,
        email: &Email,
        password_hash: &str,
        role: Role,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO users (name, email, password_hash, role, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, name, email, role
            ",
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "email"))?;

        row.try_into()
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        sqlx::query_as::<_, UserRow>("SELECT id, name, email, role FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    /// Get a user and their password hash by email, for login.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserWithHashRow>(
            "SELECT id, name, email, role, password_hash FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some((User::try_from(r.user)?, r.password_hash))),
            None => Ok(None),
        }
    }

    /// List every user, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        sqlx::query_as::<_, UserRow>("SELECT id, name, email, role FROM users ORDER BY id")
            .fetch_all(self.pool)
            .await?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    /// Count users holding the admin role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_admins(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = ?")
            .bind(Role::Admin)
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;

    fn email(s: &str) -> Email {
        Email::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_fetch() {
        let pool = create_memory_pool().await.unwrap();
        let repo = UserRepository::new(&pool);

        let user = repo
            .create("Linh", &email("linh@apex.com"), "hash", Role::User)
            .await
            .unwrap();
        assert_eq!(user.role, Role::User);

        let by_id = repo.get_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(by_id, user);

        let (by_email, hash) = repo
            .get_with_password_hash(&email("LINH@apex.com"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, user.id);
        assert_eq!(hash, "hash");
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let pool = create_memory_pool().await.unwrap();
        let repo = UserRepository::new(&pool);

        repo.create("A", &email("a@x.com"), "h1", Role::User)
            .await
            .unwrap();
        let err = repo
            .create("B", &email("a@x.com"), "h2", Role::User)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_list_and_count_admins() {
        let pool = create_memory_pool().await.unwrap();
        let repo = UserRepository::new(&pool);
        assert_eq!(repo.count_admins().await.unwrap(), 0);

        repo.create("Admin", &email("admin@apex.com"), "h", Role::Admin)
            .await
            .unwrap();
        repo.create("User", &email("user@apex.com"), "h", Role::User)
            .await
            .unwrap();

        assert_eq!(repo.count_admins().await.unwrap(), 1);
        let users = repo.list().await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users.first().map(|u| u.role), Some(Role::Admin));
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let pool = create_memory_pool().await.unwrap();
        let repo = UserRepository::new(&pool);
        assert!(repo.get_by_id(UserId::new(99)).await.unwrap().is_none());
        assert!(
            repo.get_with_password_hash(&email("ghost@apex.com"))
                .await
                .unwrap()
                .is_none()
        );
    }
}
