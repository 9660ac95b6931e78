//! User directory: lookups, inserts, and partial updates over the `users`
//! table. The trait exists so the auth service can be tested with mocks.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::user::{NewUser, User, UserUpdate};

const USER_COLUMNS: &str =
    "user_no, email, password, user_name, role, created_at, deleted_at, last_login_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Looks a user up by number; soft-deleted rows are invisible.
    async fn find(&self, user_no: i32) -> Result<Option<User>, AppError>;

    /// Looks a user up by email; soft-deleted rows are invisible.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Inserts a new user row and returns its assigned number.
    async fn insert(&self, user: NewUser) -> Result<i32, AppError>;

    /// Applies a partial update. Returns the number of affected rows;
    /// an empty update touches nothing and returns 0.
    async fn update(&self, user_no: i32, update: UserUpdate) -> Result<u64, AppError>;
}

pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find(&self, user_no: i32) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE user_no = $1 AND deleted_at IS NULL",
            USER_COLUMNS
        ))
        .bind(user_no)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1 AND deleted_at IS NULL",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn insert(&self, user: NewUser) -> Result<i32, AppError> {
        let (user_no,): (i32,) = sqlx::query_as(
            "INSERT INTO users (email, password, user_name, role, created_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING user_no",
        )
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.user_name)
        .bind(user.role)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(user_no)
    }

    async fn update(&self, user_no: i32, update: UserUpdate) -> Result<u64, AppError> {
        if update.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            "UPDATE users SET \
                 email = COALESCE($2, email), \
                 password = COALESCE($3, password), \
                 user_name = COALESCE($4, user_name), \
                 role = COALESCE($5, role), \
                 deleted_at = COALESCE($6, deleted_at), \
                 last_login_at = COALESCE($7, last_login_at) \
             WHERE user_no = $1",
        )
        .bind(user_no)
        .bind(&update.email)
        .bind(&update.password)
        .bind(&update.user_name)
        .bind(update.role)
        .bind(update.deleted_at)
        .bind(update.last_login_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_user_directory_satisfies_trait_bounds() {
        fn check_send_sync<T: Send + Sync>() {}
        check_send_sync::<MockUserDirectory>();
    }
}
