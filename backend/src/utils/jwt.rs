use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Email of the authenticated user.
    pub sub: String,
    #[serde(rename = "userNo")]
    pub user_no: i32,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_no: i32, email: String, role: String, expiration_minutes: i64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::minutes(expiration_minutes);

        Self {
            sub: email,
            user_no,
            role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }
}

pub fn create_access_token(
    user_no: i32,
    email: &str,
    role: &str,
    secret: &str,
    expiration_minutes: i64,
) -> anyhow::Result<String> {
    let claims = Claims::new(user_no, email.to_string(), role.to_string(), expiration_minutes);
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?;

    Ok(token)
}

pub fn verify_access_token(token: &str, secret: &str) -> anyhow::Result<Claims> {
    let validation = Validation::default();
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &validation,
    )?;

    Ok(token_data.claims)
}

/// Mints a fresh opaque refresh-token value.
///
/// UUIDv7 gives 128 bits with a time-sortable prefix; uniqueness against
/// stored tokens is enforced by the UNIQUE column on `tokens.refresh_token`.
pub fn generate_refresh_token() -> String {
    Uuid::now_v7().to_string()
}
