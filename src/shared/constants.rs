/// Default page size for paginated region listings
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum page size allowed for region listings and search
pub const MAX_PAGE_SIZE: i64 = 50;

// =============================================================================
// IMPORT CONSTANTS
// =============================================================================

/// Records per INSERT statement when no batch size is configured
pub const DEFAULT_IMPORT_BATCH_SIZE: usize = 1000;

/// Upper bound for the import batch size.
///
/// Each region row binds 16 parameters and PostgreSQL caps a single statement
/// at 65 535 bind parameters.
pub const MAX_IMPORT_BATCH_SIZE: usize = 4000;

// =============================================================================
// HIERARCHY LEVELS
// =============================================================================

/// Province (provinsi)
pub const LEVEL_PROVINCE: i32 = 1;

/// Regency or city (kabupaten/kota)
pub const LEVEL_REGENCY: i32 = 2;

/// District (kecamatan)
pub const LEVEL_DISTRICT: i32 = 3;

/// Village (kelurahan/desa)
pub const LEVEL_VILLAGE: i32 = 4;
