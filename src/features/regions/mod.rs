//! Indonesian administrative regions (wilayah) feature.
//!
//! Regions of all four levels live in one flat `regions` table keyed by a
//! dotted code:
//!
//! - Level 1: Provinces (Provinsi), e.g. `11`
//! - Level 2: Regencies/Cities (Kabupaten/Kota), e.g. `11.01`
//! - Level 3: Districts (Kecamatan), e.g. `11.01.02`
//! - Level 4: Villages (Kelurahan/Desa), e.g. `11.01.02.2003`
//!
//! The table is filled from a `code,name` CSV by [`services::import_regions`]
//! and read through the endpoints below.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/regions/provinces` | List all provinces |
//! | GET | `/api/regions/provinces/{code}/regencies` | List regencies in a province |
//! | GET | `/api/regions/regencies/{code}/villages` | Page through villages in a regency |
//! | GET | `/api/regions/search` | Search regions by name |
//! | GET | `/api/regions/{code}` | Get region by code |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::RegionService;
