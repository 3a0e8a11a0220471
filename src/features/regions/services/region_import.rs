use sqlx::{Connection, PgConnection};

use crate::core::config::{DatabaseConfig, LoaderConfig};
use crate::core::database;
use crate::core::error::LoadError;
use crate::features::regions::services::batch_loader::{BatchLoader, LoadSummary};
use crate::features::regions::services::csv_source::{open_region_csv, region_rows};
use crate::features::regions::services::region_store::PgRegionStore;

/// Import a region CSV into PostgreSQL.
///
/// Opens one dedicated connection, applies pending migrations, streams the
/// file through a [`BatchLoader`] and closes the connection again, whether
/// the import succeeded or not.
pub async fn import_regions(
    database: &DatabaseConfig,
    loader: &LoaderConfig,
) -> Result<LoadSummary, LoadError> {
    let mut conn = database::connect(database)
        .await
        .map_err(LoadError::Connection)?;
    tracing::info!("Connected to database");

    let result = run_import(&mut conn, loader).await;

    if let Err(e) = conn.close().await {
        tracing::warn!("Failed to close database connection cleanly: {:?}", e);
    } else {
        tracing::info!("Database connection closed");
    }

    result
}

async fn run_import(
    conn: &mut PgConnection,
    loader: &LoaderConfig,
) -> Result<LoadSummary, LoadError> {
    sqlx::migrate!("./migrations").run(&mut *conn).await?;

    let reader = open_region_csv(&loader.source_path)
        .map_err(|source| LoadError::Source {
            committed: 0,
            source,
        })?;
    tracing::info!(
        "Reading regions from {} (batch size {})",
        loader.source_path.display(),
        loader.batch_size
    );

    let mut store = PgRegionStore::new(conn);
    BatchLoader::new(loader.batch_size)
        .load(&mut store, region_rows(reader))
        .await
}
