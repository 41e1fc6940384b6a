use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::info;

use super::StoreError;
use crate::config::DatabaseConfig;

/// Open a pool against `DATABASE_URL` with the path swapped for `DB_NAME`.
pub async fn connect_pool(config: &DatabaseConfig) -> Result<PgPool, StoreError> {
    let connection_string = config.connection_string()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout))
        .connect(&connection_string)
        .await?;

    info!("Created database pool for: {}", config.name);
    Ok(pool)
}
