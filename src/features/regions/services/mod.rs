mod batch_loader;
mod code_parser;
mod csv_source;
mod region_import;
mod region_service;
mod region_store;

pub use region_import::import_regions;
pub use region_service::RegionService;

#[cfg(test)]
pub use code_parser::parse_region_code;
#[cfg(test)]
pub use region_store::RegionStore;
