pub mod region_dto;

pub use region_dto::{RegionResponseDto, RegionSearchQuery, RegionSearchResultDto};
