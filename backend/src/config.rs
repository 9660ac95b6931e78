use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub redis_pool_size: u32,
    pub redis_connect_timeout: u64,
    pub jwt_secret: String,
    /// Access-token lifetime in minutes.
    pub access_token_minutes: i64,
    /// Refresh-token lifetime in minutes (30 days by default).
    pub refresh_token_minutes: i64,
    /// Window before access-token expiry during which a refresh is allowed.
    pub reissue_threshold_minutes: i64,
    pub refresh_cookie_name: String,
    pub signup_code_ttl_seconds: u64,
    pub reset_password_code_ttl_seconds: u64,
    pub rate_limit_max_requests: i64,
    pub rate_limit_window_seconds: i64,
    pub cors_allow_origins: Vec<String>,
    pub port: u16,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/taskbook".to_string());

        let redis_url =
            env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());

        let jwt_secret = env::var("JWT_SECRET")
            .unwrap_or_else(|_| "your-secret-key-change-this-in-production".to_string());

        let cors_allow_origins = env::var("CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:8000".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Config {
            database_url,
            redis_url,
            redis_pool_size: parse_env("REDIS_POOL_SIZE", 10),
            redis_connect_timeout: parse_env("REDIS_CONNECT_TIMEOUT", 5),
            jwt_secret,
            access_token_minutes: parse_env("JWT_ACCESS_EXPIRATION_MINUTES", 30),
            refresh_token_minutes: parse_env("JWT_REFRESH_EXPIRATION_MINUTES", 43_200),
            reissue_threshold_minutes: parse_env("JWT_ACCESS_REISSUE_THRESHOLD_MINUTES", 5),
            refresh_cookie_name: env::var("REFRESH_TOKEN_COOKIE_NAME")
                .unwrap_or_else(|_| "refresh_token".to_string()),
            signup_code_ttl_seconds: parse_env("REDIS_TTL_SIGNUP", 300),
            reset_password_code_ttl_seconds: parse_env("REDIS_TTL_RESET_PASSWORD", 300),
            rate_limit_max_requests: parse_env("RATE_LIMIT_MAX_REQUESTS", 5),
            rate_limit_window_seconds: parse_env("RATE_LIMIT_WINDOW_SECONDS", 10),
            cors_allow_origins,
            port: parse_env("PORT", 3000),
        })
    }
}

fn parse_env<T: std::str::FromStr + Copy>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_env_falls_back_on_missing_or_invalid() {
        env::remove_var("TASKBOOK_TEST_MISSING");
        assert_eq!(parse_env("TASKBOOK_TEST_MISSING", 42i64), 42);

        env::set_var("TASKBOOK_TEST_INVALID", "not-a-number");
        assert_eq!(parse_env("TASKBOOK_TEST_INVALID", 7u32), 7);
        env::remove_var("TASKBOOK_TEST_INVALID");
    }

    #[test]
    fn parse_env_reads_valid_values() {
        env::set_var("TASKBOOK_TEST_VALID", "120");
        assert_eq!(parse_env("TASKBOOK_TEST_VALID", 0i64), 120);
        env::remove_var("TASKBOOK_TEST_VALID");
    }
}
