use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    config::Config, db::redis::RedisPool, repositories::UserDirectory, services::AuthService,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub redis: RedisPool,
    pub users: Arc<dyn UserDirectory>,
    pub auth: AuthService,
    pub config: Config,
}

impl AppState {
    pub fn new(
        pool: PgPool,
        redis: RedisPool,
        users: Arc<dyn UserDirectory>,
        auth: AuthService,
        config: Config,
    ) -> Self {
        Self {
            pool,
            redis,
            users,
            auth,
            config,
        }
    }
}
