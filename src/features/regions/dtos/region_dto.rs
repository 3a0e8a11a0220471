use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::regions::models::Region;
use crate::shared::constants::{
    DEFAULT_PAGE_SIZE, LEVEL_DISTRICT, LEVEL_PROVINCE, LEVEL_REGENCY, LEVEL_VILLAGE,
};

/// Query parameters for searching regions by name
#[derive(Debug, Clone, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct RegionSearchQuery {
    /// Search by name (case-insensitive, partial match)
    #[param(example = "malang")]
    #[validate(length(
        min = 1,
        max = 100,
        message = "Query parameter 'q' must be between 1 and 100 characters"
    ))]
    pub q: Option<String>,

    /// Restrict results to one level (1 = province ... 4 = village)
    #[param(minimum = 1, maximum = 4)]
    #[validate(range(min = 1, max = 4, message = "Level must be between 1 and 4"))]
    pub level: Option<i32>,

    /// Maximum number of results (default: 20, max: 50)
    #[param(minimum = 1, maximum = 50)]
    #[validate(range(min = 1, max = 50, message = "Limit must be between 1 and 50"))]
    pub limit: Option<i64>,
}

impl RegionSearchQuery {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE)
    }
}

/// Response DTO for a region
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegionResponseDto {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub level: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regency_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub village_code: Option<String>,
    pub has_weather_data: bool,
}

impl From<Region> for RegionResponseDto {
    fn from(region: Region) -> Self {
        Self {
            id: region.id,
            code: region.code,
            name: region.name,
            level: region.level,
            province_code: region.province_code,
            regency_code: region.regency_code,
            district_code: region.district_code,
            village_code: region.village_code,
            has_weather_data: region.has_weather_data,
        }
    }
}

/// Search result with a human-readable location string
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegionSearchResultDto {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub level: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regency_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub village_name: Option<String>,
    /// Full hierarchical name, e.g. "Sukaluyu, Kec. Cianjur, Kab. Cianjur, Jawa Barat"
    pub display_name: String,
    pub has_weather_data: bool,
}

impl From<Region> for RegionSearchResultDto {
    fn from(region: Region) -> Self {
        let display_name = display_name(&region);
        Self {
            id: region.id,
            code: region.code,
            name: region.name,
            level: region.level,
            province_name: region.province_name,
            regency_name: region.regency_name,
            district_name: region.district_name,
            village_name: region.village_name,
            display_name,
            has_weather_data: region.has_weather_data,
        }
    }
}

/// Build the hierarchical display name of a region.
///
/// Ancestor names are appended when known; a missing ancestor drops that
/// part (and, for districts and villages, the finer parts before it).
pub fn display_name(region: &Region) -> String {
    let name = region.name.as_str();
    let province = region.province_name.as_deref();
    let regency = region.regency_name.as_deref();
    let district = region.district_name.as_deref();

    match region.level {
        LEVEL_PROVINCE => name.to_string(),
        LEVEL_REGENCY => match province {
            Some(p) => format!("{}, {}", name, p),
            None => name.to_string(),
        },
        LEVEL_DISTRICT => match (regency, province) {
            (Some(r), Some(p)) => format!("{}, {}, {}", name, r, p),
            (_, Some(p)) => format!("{}, {}", name, p),
            _ => name.to_string(),
        },
        LEVEL_VILLAGE => match (district, regency, province) {
            (Some(d), Some(r), Some(p)) => format!("{}, Kec. {}, {}, {}", name, d, r, p),
            (_, Some(r), Some(p)) => format!("{}, {}, {}", name, r, p),
            (_, _, Some(p)) => format!("{}, {}", name, p),
            _ => name.to_string(),
        },
        _ => name.to_string(),
    }
}
