use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::regions::handlers;
use crate::features::regions::services::RegionService;

/// Create routes for the regions feature
pub fn routes(service: Arc<RegionService>) -> Router {
    Router::new()
        .route("/api/regions/provinces", get(handlers::list_provinces))
        .route(
            "/api/regions/provinces/{code}/regencies",
            get(handlers::list_regencies_by_province),
        )
        .route(
            "/api/regions/regencies/{code}/villages",
            get(handlers::list_villages_by_regency),
        )
        // Static segments take priority over the {code} catch
        .route("/api/regions/search", get(handlers::search_regions))
        .route("/api/regions/{code}", get(handlers::get_region))
        .with_state(service)
}
