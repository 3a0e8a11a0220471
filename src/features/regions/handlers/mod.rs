pub mod region_handler;

pub use region_handler::{
    __path_get_region, __path_list_provinces, __path_list_regencies_by_province,
    __path_list_villages_by_regency, __path_search_regions, get_region, list_provinces,
    list_regencies_by_province, list_villages_by_regency, search_regions,
};
