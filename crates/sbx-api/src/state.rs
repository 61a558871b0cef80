use sqlx::SqlitePool;

use crate::{ApiConfig, config::Environment};

#[derive(Clone, Debug)]
pub struct ApiState {
    pub pool: SqlitePool,
    pub environment: Environment,
}

impl ApiState {
    pub fn new(config: &ApiConfig, pool: SqlitePool) -> Self {
        Self {
            pool,
            environment: config.env,
        }
    }
}
