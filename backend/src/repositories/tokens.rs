//! Refresh-token store over the `tokens` table.
//!
//! "Active" here means "not yet deleted" — expiry is never filtered at this
//! layer, callers compare against the current time themselves.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::token::{NewRefreshToken, RefreshTokenRecord};

const TOKEN_COLUMNS: &str = "token_no, user_no, refresh_token, client_os, \
     access_token_expires_at, refresh_token_expires_at, created_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn find_by_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<Option<RefreshTokenRecord>, AppError>;

    /// All stored sessions of a user, newest first.
    async fn list_by_user_no(&self, user_no: i32) -> Result<Vec<RefreshTokenRecord>, AppError>;

    /// Persists a new session record, returning its number.
    async fn insert(&self, token: NewRefreshToken) -> Result<i32, AppError>;

    /// Advances the access-token expiry of one record. Returns affected rows;
    /// 0 means the record is already gone and the caller must treat the
    /// renewal as failed.
    async fn update_access_expires_at(
        &self,
        token_no: i32,
        expires_at: DateTime<Utc>,
    ) -> Result<u64, AppError>;

    /// Deletes by token value. Returns affected rows (0 when nothing matched).
    async fn delete_by_refresh_token(&self, refresh_token: &str) -> Result<u64, AppError>;
}

pub struct PgTokenStore {
    pool: PgPool,
}

impl PgTokenStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenStore for PgTokenStore {
    async fn find_by_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<Option<RefreshTokenRecord>, AppError> {
        let record = sqlx::query_as::<_, RefreshTokenRecord>(&format!(
            "SELECT {} FROM tokens WHERE refresh_token = $1",
            TOKEN_COLUMNS
        ))
        .bind(refresh_token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list_by_user_no(&self, user_no: i32) -> Result<Vec<RefreshTokenRecord>, AppError> {
        let records = sqlx::query_as::<_, RefreshTokenRecord>(&format!(
            "SELECT {} FROM tokens WHERE user_no = $1 ORDER BY created_at DESC",
            TOKEN_COLUMNS
        ))
        .bind(user_no)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn insert(&self, token: NewRefreshToken) -> Result<i32, AppError> {
        let (token_no,): (i32,) = sqlx::query_as(
            "INSERT INTO tokens (user_no, refresh_token, client_os, \
                 access_token_expires_at, refresh_token_expires_at, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING token_no",
        )
        .bind(token.user_no)
        .bind(&token.refresh_token)
        .bind(&token.client_os)
        .bind(token.access_token_expires_at)
        .bind(token.refresh_token_expires_at)
        .bind(token.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(token_no)
    }

    async fn update_access_expires_at(
        &self,
        token_no: i32,
        expires_at: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        let result =
            sqlx::query("UPDATE tokens SET access_token_expires_at = $2 WHERE token_no = $1")
                .bind(token_no)
                .bind(expires_at)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected())
    }

    async fn delete_by_refresh_token(&self, refresh_token: &str) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM tokens WHERE refresh_token = $1")
            .bind(refresh_token)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_token_store_satisfies_trait_bounds() {
        fn check_send_sync<T: Send + Sync>() {}
        check_send_sync::<MockTokenStore>();
    }
}
