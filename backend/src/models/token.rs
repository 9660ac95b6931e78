//! Models for persisted refresh-token sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
/// One login session: an opaque refresh token plus its timing window.
pub struct RefreshTokenRecord {
    pub token_no: i32,
    /// Owning user.
    pub user_no: i32,
    /// Opaque UUIDv7 value; identifier and secret at once.
    pub refresh_token: String,
    /// Free-text client label (detected OS) shown in the session list.
    pub client_os: String,
    /// Advanced on every successful access-token renewal.
    pub access_token_expires_at: DateTime<Utc>,
    /// Fixed at login; the session dies here.
    pub refresh_token_expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Fields required to persist a new refresh-token record at login.
#[derive(Debug, Clone)]
pub struct NewRefreshToken {
    pub user_no: i32,
    pub refresh_token: String,
    pub client_os: String,
    pub access_token_expires_at: DateTime<Utc>,
    pub refresh_token_expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
/// Session entry returned by the token-listing endpoint.
pub struct RefreshTokenDetailResponse {
    pub refresh_token: String,
    pub client_os: String,
    pub created_at: DateTime<Utc>,
}

impl From<RefreshTokenRecord> for RefreshTokenDetailResponse {
    fn from(record: RefreshTokenRecord) -> Self {
        RefreshTokenDetailResponse {
            refresh_token: record.refresh_token,
            client_os: record.client_os,
            created_at: record.created_at,
        }
    }
}
