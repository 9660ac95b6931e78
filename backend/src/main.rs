use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskbook_backend::{
    build_router,
    config::Config,
    db::{connection::create_pool, redis::create_redis_pool},
    repositories::{PgTokenStore, PgUserDirectory, UserDirectory},
    services::{AuthConfig, AuthService, RedisCodeStore},
    state::AppState,
    utils::email::SmtpMailer,
};

fn mask_secret(s: &str) -> String {
    if s.is_empty() {
        return "<empty>".into();
    }
    let prefix = s.chars().take(4).collect::<String>();
    format!("{}*** (len={})", prefix, s.len())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskbook_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    tracing::info!(
        database_url = %config.database_url,
        redis_url = %config.redis_url,
        jwt_secret = %mask_secret(&config.jwt_secret),
        access_token_minutes = config.access_token_minutes,
        refresh_token_minutes = config.refresh_token_minutes,
        reissue_threshold_minutes = config.reissue_threshold_minutes,
        "Loaded configuration from environment/.env"
    );

    let pool = create_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let redis = create_redis_pool(&config).await?;

    let users: Arc<dyn UserDirectory> = Arc::new(PgUserDirectory::new(pool.clone()));
    let tokens = Arc::new(PgTokenStore::new(pool.clone()));
    let codes = Arc::new(RedisCodeStore::new(
        redis.clone(),
        config.signup_code_ttl_seconds,
        config.reset_password_code_ttl_seconds,
    ));
    let mailer = Arc::new(SmtpMailer::new()?);

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

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = AppState::new(pool, redis, users, auth, config);
    let app = build_router(state);

    tracing::info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
