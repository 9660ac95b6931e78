#![allow(dead_code)]
//! Router-level test harness.
//!
//! Builds the full application over lazily-connecting pools: Postgres uses
//! `connect_lazy` and Redis points at a closed port, so any test that
//! reaches a real query fails loudly instead of hanging. The tests here only
//! exercise paths that terminate before touching either backend (validation,
//! authentication, cookie parsing); the rate limiter fails open.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use bb8_redis::RedisConnectionManager;
use sqlx::postgres::PgPoolOptions;

use taskbook_backend::{
    build_router,
    config::Config,
    repositories::{PgTokenStore, PgUserDirectory, UserDirectory},
    services::{AuthConfig, AuthService, RedisCodeStore},
    state::AppState,
    utils::email::SmtpMailer,
};

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/taskbook_test".to_string(),
        redis_url: "redis://127.0.0.1:1".to_string(),
        redis_pool_size: 1,
        redis_connect_timeout: 1,
        jwt_secret: "a_secure_token_that_is_long_enough_123".to_string(),
        access_token_minutes: 30,
        refresh_token_minutes: 43_200,
        reissue_threshold_minutes: 5,
        refresh_cookie_name: "refresh_token".to_string(),
        signup_code_ttl_seconds: 300,
        reset_password_code_ttl_seconds: 300,
        rate_limit_max_requests: 1000,
        rate_limit_window_seconds: 10,
        cors_allow_origins: vec!["http://localhost:8000".to_string()],
        port: 3000,
    }
}

pub fn test_state() -> AppState {
    let config = test_config();

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_lazy(&config.database_url)
        .expect("create lazy pool");

    let manager =
        RedisConnectionManager::new(config.redis_url.clone()).expect("create redis manager");
    let redis = bb8::Pool::builder()
        .connection_timeout(Duration::from_millis(200))
        .build_unchecked(manager);

    let users: Arc<dyn UserDirectory> = Arc::new(PgUserDirectory::new(pool.clone()));
    let tokens = Arc::new(PgTokenStore::new(pool.clone()));
    let codes = Arc::new(RedisCodeStore::new(
        redis.clone(),
        config.signup_code_ttl_seconds,
        config.reset_password_code_ttl_seconds,
    ));
    let mailer = Arc::new(SmtpMailer::new().expect("build mailer"));

    let auth = AuthService::new(
        users.clone(),
        tokens,
        codes,
        mailer,
        AuthConfig {
            jwt_secret: config.jwt_secret.clone(),
            access_token_minutes: config.access_token_minutes,
            refresh_token_minutes: config.refresh_token_minutes,
            reissue_threshold_minutes: config.reissue_threshold_minutes,
            signup_code_ttl_seconds: config.signup_code_ttl_seconds,
            reset_password_code_ttl_seconds: config.reset_password_code_ttl_seconds,
        },
    );

    AppState::new(pool, redis, users, auth, config)
}

pub fn app() -> Router {
    build_router(test_state())
}
