use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::shared::constants::{LEVEL_DISTRICT, LEVEL_PROVINCE, LEVEL_REGENCY, LEVEL_VILLAGE};

/// One administrative unit (province, regency/city, district or village)
/// stored flat in the `regions` table.
///
/// Ancestor codes are filled in from the dotted code, but only the name of
/// the record's own level is known at import time; ancestor name columns
/// stay NULL.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Region {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub level: i32,
    pub province_code: Option<String>,
    pub province_name: Option<String>,
    pub regency_code: Option<String>,
    pub regency_name: Option<String>,
    pub district_code: Option<String>,
    pub district_name: Option<String>,
    pub village_code: Option<String>,
    pub village_name: Option<String>,
    pub has_weather_data: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row count for one hierarchy level
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct LevelCount {
    pub level: i32,
    pub count: i64,
}

/// Human-readable plural label for a hierarchy level
pub fn level_label(level: i32) -> String {
    match level {
        LEVEL_PROVINCE => "Provinces".to_string(),
        LEVEL_REGENCY => "Regencies/Cities".to_string(),
        LEVEL_DISTRICT => "Districts".to_string(),
        LEVEL_VILLAGE => "Villages".to_string(),
        other => format!("Level {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_labels() {
        assert_eq!(level_label(1), "Provinces");
        assert_eq!(level_label(2), "Regencies/Cities");
        assert_eq!(level_label(3), "Districts");
        assert_eq!(level_label(4), "Villages");
        assert_eq!(level_label(5), "Level 5");
    }
}
