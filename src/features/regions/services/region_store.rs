use async_trait::async_trait;
use sqlx::{Connection, PgConnection, Postgres, QueryBuilder};

use crate::core::error::{AppError, Result};
use crate::features::regions::models::{LevelCount, Region};

/// Persistent destination of a region import.
///
/// Every `insert_batch` call is its own unit of work: it is either fully
/// committed or fully rolled back. Rows whose `code` already exists are left
/// untouched.
#[async_trait]
pub trait RegionStore: Send {
    /// Insert a batch with conflict-skip on `code`, returning the number of
    /// rows actually written.
    async fn insert_batch(&mut self, regions: &[Region]) -> Result<u64>;

    /// Number of stored regions per level, ordered by level
    async fn count_by_level(&mut self) -> Result<Vec<LevelCount>>;
}

/// [`RegionStore`] backed by a single PostgreSQL connection.
///
/// The connection is borrowed; whoever opened it is responsible for closing it.
pub struct PgRegionStore<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> PgRegionStore<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }
}

/// Multi-row INSERT for a batch of regions, skipping codes already stored
fn insert_regions_query(regions: &[Region]) -> QueryBuilder<'static, Postgres> {
    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
        r#"
        INSERT INTO regions (
            id, code, name, level,
            province_code, province_name, regency_code, regency_name,
            district_code, district_name, village_code, village_name,
            has_weather_data, is_active, created_at, updated_at
        )
        "#,
    );
    builder.push_values(regions, |mut row, region| {
        row.push_bind(region.id)
            .push_bind(region.code.clone())
            .push_bind(region.name.clone())
            .push_bind(region.level)
            .push_bind(region.province_code.clone())
            .push_bind(region.province_name.clone())
            .push_bind(region.regency_code.clone())
            .push_bind(region.regency_name.clone())
            .push_bind(region.district_code.clone())
            .push_bind(region.district_name.clone())
            .push_bind(region.village_code.clone())
            .push_bind(region.village_name.clone())
            .push_bind(region.has_weather_data)
            .push_bind(region.is_active)
            .push_bind(region.created_at)
            .push_bind(region.updated_at);
    });
    builder.push(" ON CONFLICT (code) DO NOTHING");
    builder
}

#[async_trait]
impl RegionStore for PgRegionStore<'_> {
    async fn insert_batch(&mut self, regions: &[Region]) -> Result<u64> {
        if regions.is_empty() {
            return Ok(0);
        }

        let mut tx = self.conn.begin().await.map_err(|e| {
            tracing::error!("Failed to begin region batch transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let mut builder = insert_regions_query(regions);

        match builder.build().execute(&mut *tx).await {
            Ok(result) => {
                tx.commit().await.map_err(|e| {
                    tracing::error!("Failed to commit region batch: {:?}", e);
                    AppError::Database(e)
                })?;
                Ok(result.rows_affected())
            }
            Err(e) => {
                tracing::error!(
                    "Failed to insert batch of {} regions: {:?}",
                    regions.len(),
                    e
                );
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!("Rollback of failed region batch failed: {:?}", rollback_err);
                }
                Err(AppError::Database(e))
            }
        }
    }

    async fn count_by_level(&mut self) -> Result<Vec<LevelCount>> {
        sqlx::query_as::<_, LevelCount>(
            r#"
            SELECT level, COUNT(*) AS count
            FROM regions
            GROUP BY level
            ORDER BY level
            "#,
        )
        .fetch_all(&mut *self.conn)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count regions by level: {:?}", e);
            AppError::Database(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::regions::services::parse_region_code;

    const MIGRATION: &str =
        include_str!("../../../../migrations/20250101000000_create_regions.sql");

    fn normalized(sql: &str) -> String {
        sql.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Column names declared in the `regions` CREATE TABLE, in order
    fn migration_columns() -> Vec<String> {
        let body_start = MIGRATION.find("CREATE TABLE").unwrap();
        MIGRATION[body_start..]
            .lines()
            .skip(1)
            .map(str::trim)
            .take_while(|line| !line.starts_with(')'))
            .filter(|line| !line.starts_with("CONSTRAINT"))
            .filter_map(|line| line.split_whitespace().next())
            .map(str::to_string)
            .collect()
    }

    /// Column names listed in the INSERT statement, in order
    fn insert_columns(sql: &str) -> Vec<String> {
        let open = sql.find('(').unwrap();
        let close = sql.find(')').unwrap();
        sql[open + 1..close]
            .split(',')
            .map(|c| c.trim().to_string())
            .collect()
    }

    fn two_regions() -> Vec<Region> {
        vec![
            parse_region_code("11", "Aceh").unwrap(),
            parse_region_code("11.01", "Kab. Aceh Selatan").unwrap(),
        ]
    }

    #[test]
    fn test_insert_columns_match_migration() {
        let builder = insert_regions_query(&two_regions());
        let columns = insert_columns(builder.sql());

        assert_eq!(columns.len(), 16);
        assert_eq!(columns, migration_columns());
    }

    #[test]
    fn test_insert_skips_existing_codes() {
        let builder = insert_regions_query(&two_regions());
        let sql = normalized(builder.sql());

        assert!(sql.starts_with("INSERT INTO regions ("));
        assert!(sql.ends_with("ON CONFLICT (code) DO NOTHING"));
        assert!(!sql.contains("DO UPDATE"));
    }

    #[test]
    fn test_insert_binds_sixteen_values_per_row() {
        let builder = insert_regions_query(&two_regions());
        let sql = normalized(builder.sql());

        let first_row: Vec<String> = (1..=16).map(|i| format!("${}", i)).collect();
        let second_row: Vec<String> = (17..=32).map(|i| format!("${}", i)).collect();
        assert!(sql.contains(&format!("VALUES ({})", first_row.join(", "))));
        assert!(sql.contains(&format!(", ({})", second_row.join(", "))));
        assert!(!sql.contains("$33"));
    }
}
