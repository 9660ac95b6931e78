//! Models for user accounts and the authentication payloads that act on them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::FromRow;
use validator::Validate;

use crate::validation::rules;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
/// Database representation of a user account.
pub struct User {
    /// Stable numeric identifier assigned at creation.
    pub user_no: i32,
    /// Unique email used for login.
    pub email: String,
    /// Argon2 PHC-format hash of the user's password.
    pub password: String,
    /// Display name.
    pub user_name: String,
    /// Role describing the user's privileges.
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    /// Soft-delete marker; rows with a value are treated as gone.
    pub deleted_at: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Default)]
#[sqlx(type_name = "varchar", rename_all = "UPPERCASE")]
/// Supported user roles stored in the database.
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    /// Returns the canonical uppercase representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "USER",
            UserRole::Admin => "ADMIN",
        }
    }
}

impl Serialize for UserRole {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "USER" => Ok(UserRole::User),
            "ADMIN" => Ok(UserRole::Admin),
            other => Err(serde::de::Error::unknown_variant(other, &["USER", "ADMIN"])),
        }
    }
}

/// Fields required to insert a new user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub user_name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

/// Partial update for a user row. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub password: Option<String>,
    pub user_name: Option<String>,
    pub role: Option<UserRole>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.password.is_none()
            && self.user_name.is_none()
            && self.role.is_none()
            && self.deleted_at.is_none()
            && self.last_login_at.is_none()
    }
}

#[derive(Debug, Deserialize, Validate)]
/// Payload carrying a bare email (existence check, code sends).
pub struct EmailRequest {
    #[validate(email(message = "invalid email"), length(max = 300))]
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct EmailExistResponse {
    pub exists: bool,
}

#[derive(Debug, Deserialize, Validate)]
/// Credentials submitted by a user attempting to authenticate.
pub struct LoginRequest {
    #[validate(email(message = "invalid email"), length(max = 300))]
    pub email: String,
    #[validate(length(min = 1, max = 72))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
/// Payload carrying an email and the 6-digit code sent to it.
pub struct CodeVerifyRequest {
    #[validate(email(message = "invalid email"), length(max = 300))]
    pub email: String,
    #[validate(custom(function = "rules::validate_verification_code"))]
    pub code: String,
}

#[derive(Debug, Deserialize, Validate)]
/// Payload for completing signup with a verified email.
pub struct SignupRequest {
    #[validate(email(message = "invalid email"), length(max = 300))]
    pub email: String,
    #[validate(custom(function = "rules::validate_password"))]
    pub password: String,
    #[validate(length(min = 2, max = 30))]
    pub user_name: String,
    #[validate(custom(function = "rules::validate_verification_code"))]
    pub code: String,
}

#[derive(Debug, Deserialize, Validate)]
/// Payload for setting a new password with a verified reset code.
pub struct ResetPasswordRequest {
    #[validate(email(message = "invalid email"), length(max = 300))]
    pub email: String,
    #[validate(custom(function = "rules::validate_password"))]
    pub password: String,
    #[validate(custom(function = "rules::validate_verification_code"))]
    pub code: String,
}

#[derive(Debug, Serialize)]
/// Tokens returned by login (both) and refresh (access only).
pub struct AccessTokenResponse {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Serialize)]
/// Public-facing profile of the current user.
pub struct UserDetailResponse {
    pub email: String,
    pub user_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserDetailResponse {
    fn from(user: &User) -> Self {
        UserDetailResponse {
            email: user.email.clone(),
            user_name: user.user_name.clone(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UserPatchRequest {
    #[validate(length(min = 2, max = 30))]
    pub user_name: String,
}

#[derive(Debug, Deserialize, Validate)]
/// Payload submitted when a user changes their own password.
pub struct UserChangePasswordRequest {
    /// Existing password, verified before the change is applied.
    #[validate(length(min = 1, max = 72))]
    pub password: String,
    #[validate(custom(function = "rules::validate_password"))]
    pub new_password: String,
}
