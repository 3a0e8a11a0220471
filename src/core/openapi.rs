use utoipa::{Modify, OpenApi};

use crate::features::regions::{dtos as regions_dtos, handlers as regions_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        regions_handlers::list_provinces,
        regions_handlers::list_regencies_by_province,
        regions_handlers::list_villages_by_regency,
        regions_handlers::search_regions,
        regions_handlers::get_region,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Regions
            regions_dtos::RegionResponseDto,
            regions_dtos::RegionSearchResultDto,
            ApiResponse<regions_dtos::RegionResponseDto>,
            ApiResponse<Vec<regions_dtos::RegionResponseDto>>,
            ApiResponse<Vec<regions_dtos::RegionSearchResultDto>>,
        )
    ),
    tags(
        (name = "regions", description = "Indonesian administrative regions (provinces, regencies, districts, villages)"),
    ),
    info(
        title = "Wilayah API",
        version = "0.1.0",
        description = "Indonesian administrative regions API",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
