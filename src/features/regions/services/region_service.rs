use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::regions::models::Region;
use crate::shared::constants::{LEVEL_PROVINCE, LEVEL_REGENCY, LEVEL_VILLAGE};
use crate::shared::types::PaginationQuery;

const REGION_COLUMNS: &str = r#"
    id, code, name, level,
    province_code, province_name, regency_code, regency_name,
    district_code, district_name, village_code, village_name,
    has_weather_data, is_active, created_at, updated_at
"#;

/// Read access to the flat `regions` table
pub struct RegionService {
    pool: PgPool,
}

impl RegionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all active provinces ordered by name
    pub async fn list_provinces(&self) -> Result<Vec<Region>> {
        let query = format!(
            r#"
            SELECT {}
            FROM regions
            WHERE level = $1 AND is_active = TRUE
            ORDER BY name ASC
            "#,
            REGION_COLUMNS
        );

        sqlx::query_as::<_, Region>(&query)
            .bind(LEVEL_PROVINCE)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch provinces: {:?}", e);
                AppError::Database(e)
            })
    }

    /// List the regencies/cities of a province ordered by name
    pub async fn list_regencies_by_province(&self, province_code: &str) -> Result<Vec<Region>> {
        let query = format!(
            r#"
            SELECT {}
            FROM regions
            WHERE level = $1 AND province_code = $2 AND is_active = TRUE
            ORDER BY name ASC
            "#,
            REGION_COLUMNS
        );

        sqlx::query_as::<_, Region>(&query)
            .bind(LEVEL_REGENCY)
            .bind(province_code)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to fetch regencies for province {}: {:?}",
                    province_code,
                    e
                );
                AppError::Database(e)
            })
    }

    /// Page through the villages with weather data in a regency
    pub async fn list_villages_by_regency(
        &self,
        regency_code: &str,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<Region>, i64)> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM regions
            WHERE level = $1 AND regency_code = $2
              AND has_weather_data = TRUE AND is_active = TRUE
            "#,
        )
        .bind(LEVEL_VILLAGE)
        .bind(regency_code)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(
                "Failed to count villages for regency {}: {:?}",
                regency_code,
                e
            );
            AppError::Database(e)
        })?;

        let query = format!(
            r#"
            SELECT {}
            FROM regions
            WHERE level = $1 AND regency_code = $2
              AND has_weather_data = TRUE AND is_active = TRUE
            ORDER BY name ASC
            LIMIT $3 OFFSET $4
            "#,
            REGION_COLUMNS
        );

        let villages = sqlx::query_as::<_, Region>(&query)
            .bind(LEVEL_VILLAGE)
            .bind(regency_code)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to fetch villages for regency {}: {:?}",
                    regency_code,
                    e
                );
                AppError::Database(e)
            })?;

        Ok((villages, total))
    }

    /// Case-insensitive name search across all levels, or one level when given.
    ///
    /// Regions with weather data come first, then deeper levels, then by name.
    pub async fn search(&self, term: &str, level: Option<i32>, limit: i64) -> Result<Vec<Region>> {
        let search_pattern = format!("%{}%", term.trim().to_lowercase());
        let query = format!(
            r#"
            SELECT {}
            FROM regions
            WHERE is_active = TRUE
              AND LOWER(name) LIKE $1
              AND ($2::INTEGER IS NULL OR level = $2)
            ORDER BY has_weather_data DESC, level DESC, name ASC
            LIMIT $3
            "#,
            REGION_COLUMNS
        );

        sqlx::query_as::<_, Region>(&query)
            .bind(search_pattern)
            .bind(level)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to search regions: {:?}", e);
                AppError::Database(e)
            })
    }

    /// Get an active region by its code
    pub async fn get_by_code(&self, code: &str) -> Result<Region> {
        let query = format!(
            r#"
            SELECT {}
            FROM regions
            WHERE code = $1 AND is_active = TRUE
            "#,
            REGION_COLUMNS
        );

        sqlx::query_as::<_, Region>(&query)
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch region by code {}: {:?}", code, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Region with code '{}' not found", code)))
    }
}
