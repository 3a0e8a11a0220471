use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::regions::dtos::{
    RegionResponseDto, RegionSearchQuery, RegionSearchResultDto,
};
use crate::features::regions::services::RegionService;
use crate::shared::constants::{LEVEL_PROVINCE, LEVEL_REGENCY};
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};
use crate::shared::validation::REGION_CODE_REGEX;

/// Reject malformed codes, and codes of the wrong level when one is expected
fn validate_code(code: &str, expected_level: Option<i32>) -> Result<()> {
    if !REGION_CODE_REGEX.is_match(code) {
        return Err(AppError::Validation(format!(
            "Invalid region code '{}'",
            code
        )));
    }

    if let Some(level) = expected_level {
        let segments = code.split('.').count() as i32;
        if segments != level {
            return Err(AppError::Validation(format!(
                "Region code '{}' is not a level {} code",
                code, level
            )));
        }
    }

    Ok(())
}

/// List all provinces
#[utoipa::path(
    get,
    path = "/api/regions/provinces",
    responses(
        (status = 200, description = "List of provinces", body = ApiResponse<Vec<RegionResponseDto>>)
    ),
    tag = "regions"
)]
pub async fn list_provinces(
    State(service): State<Arc<RegionService>>,
) -> Result<Json<ApiResponse<Vec<RegionResponseDto>>>> {
    let provinces = service.list_provinces().await?;
    let total = provinces.len() as i64;
    let dtos: Vec<RegionResponseDto> = provinces.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta::total(total)),
    )))
}

/// List regencies/cities in a province
#[utoipa::path(
    get,
    path = "/api/regions/provinces/{code}/regencies",
    params(
        ("code" = String, Path, description = "Province code (format: XX)")
    ),
    responses(
        (status = 200, description = "List of regencies in the province", body = ApiResponse<Vec<RegionResponseDto>>),
        (status = 400, description = "Invalid province code")
    ),
    tag = "regions"
)]
pub async fn list_regencies_by_province(
    State(service): State<Arc<RegionService>>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<Vec<RegionResponseDto>>>> {
    validate_code(&code, Some(LEVEL_PROVINCE))?;

    let regencies = service.list_regencies_by_province(&code).await?;
    let total = regencies.len() as i64;
    let dtos: Vec<RegionResponseDto> = regencies.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta::total(total)),
    )))
}

/// List villages with weather data in a regency (paginated)
#[utoipa::path(
    get,
    path = "/api/regions/regencies/{code}/villages",
    params(
        ("code" = String, Path, description = "Regency code (format: XX.XX)"),
        PaginationQuery
    ),
    responses(
        (status = 200, description = "Page of villages in the regency", body = ApiResponse<Vec<RegionResponseDto>>),
        (status = 400, description = "Invalid regency code or pagination")
    ),
    tag = "regions"
)]
pub async fn list_villages_by_regency(
    State(service): State<Arc<RegionService>>,
    Path(code): Path<String>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<RegionResponseDto>>>> {
    validate_code(&code, Some(LEVEL_REGENCY))?;
    pagination
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let (villages, total) = service.list_villages_by_regency(&code, &pagination).await?;
    let dtos: Vec<RegionResponseDto> = villages.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta::paginated(total, &pagination)),
    )))
}

/// Search regions by name
#[utoipa::path(
    get,
    path = "/api/regions/search",
    params(RegionSearchQuery),
    responses(
        (status = 200, description = "Regions matching the search", body = ApiResponse<Vec<RegionSearchResultDto>>),
        (status = 400, description = "Missing or invalid search parameters")
    ),
    tag = "regions"
)]
pub async fn search_regions(
    State(service): State<Arc<RegionService>>,
    Query(query): Query<RegionSearchQuery>,
) -> Result<Json<ApiResponse<Vec<RegionSearchResultDto>>>> {
    let term = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("Query parameter 'q' is required".to_string()))?;
    query
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let regions = service.search(term, query.level, query.limit()).await?;
    let total = regions.len() as i64;
    let dtos: Vec<RegionSearchResultDto> = regions.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta::total(total)),
    )))
}

/// Get a region by code
#[utoipa::path(
    get,
    path = "/api/regions/{code}",
    params(
        ("code" = String, Path, description = "Dotted region code, e.g. 11.01.02.2003")
    ),
    responses(
        (status = 200, description = "Region details", body = ApiResponse<RegionResponseDto>),
        (status = 400, description = "Invalid region code"),
        (status = 404, description = "Region not found")
    ),
    tag = "regions"
)]
pub async fn get_region(
    State(service): State<Arc<RegionService>>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<RegionResponseDto>>> {
    validate_code(&code, None)?;

    let region = service.get_by_code(&code).await?;
    Ok(Json(ApiResponse::success(Some(region.into()), None, None)))
}
