use crate::core::config::DatabaseConfig;
use sqlx::{postgres::PgPoolOptions, Connection, PgConnection, PgPool};
use std::time::Duration;

/// Connection pool used by the HTTP server
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .connect(&config.url)
        .await
}

/// Single dedicated connection used by the region import.
///
/// The import is strictly sequential, so it holds exactly one connection for
/// its whole run and closes it explicitly when done.
pub async fn connect(config: &DatabaseConfig) -> Result<PgConnection, sqlx::Error> {
    let timeout = Duration::from_secs(config.acquire_timeout_secs);
    match tokio::time::timeout(timeout, PgConnection::connect(&config.url)).await {
        Ok(result) => result,
        Err(_) => Err(sqlx::Error::Io(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            format!("connection not established within {:?}", timeout),
        ))),
    }
}
