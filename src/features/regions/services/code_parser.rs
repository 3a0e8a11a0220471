use chrono::Utc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::regions::models::Region;
use crate::shared::constants::{LEVEL_DISTRICT, LEVEL_PROVINCE, LEVEL_REGENCY, LEVEL_VILLAGE};

/// Build a [`Region`] from a dotted code and the name of that unit.
///
/// The level is the number of `.`-separated segments. Ancestor codes are the
/// leading segments re-joined with `.`, so `"11.01.02.2003"` yields province
/// `11`, regency `11.01`, district `11.01.02` and village `11.01.02.2003`.
///
/// Only the name column of the record's own level is populated. Ancestor
/// names are not looked up and stay `None`.
///
/// Codes deeper than four segments are still accepted: the three ancestor
/// codes are filled in but no name column or village code is set.
pub fn parse_region_code(code: &str, name: &str) -> Result<Region> {
    if code.is_empty() {
        return Err(AppError::Validation(
            "Region code must not be empty".to_string(),
        ));
    }

    let segments: Vec<&str> = code.split('.').collect();
    let level = segments.len() as i32;
    let prefix = |n: usize| Some(segments[..n].join("."));

    let now = Utc::now();
    let mut region = Region {
        id: Uuid::new_v4(),
        code: code.to_string(),
        name: name.to_string(),
        level,
        province_code: None,
        province_name: None,
        regency_code: None,
        regency_name: None,
        district_code: None,
        district_name: None,
        village_code: None,
        village_name: None,
        has_weather_data: level == LEVEL_VILLAGE,
        is_active: true,
        created_at: now,
        updated_at: now,
    };

    match level {
        LEVEL_PROVINCE => {
            region.province_code = Some(code.to_string());
            region.province_name = Some(name.to_string());
        }
        LEVEL_REGENCY => {
            region.province_code = prefix(1);
            region.regency_code = Some(code.to_string());
            region.regency_name = Some(name.to_string());
        }
        LEVEL_DISTRICT => {
            region.province_code = prefix(1);
            region.regency_code = prefix(2);
            region.district_code = Some(code.to_string());
            region.district_name = Some(name.to_string());
        }
        LEVEL_VILLAGE => {
            region.province_code = prefix(1);
            region.regency_code = prefix(2);
            region.district_code = prefix(3);
            region.village_code = Some(code.to_string());
            region.village_name = Some(name.to_string());
        }
        _ => {
            tracing::warn!(
                "Region code {} has {} segments; only ancestor codes are recorded",
                code,
                level
            );
            region.province_code = prefix(1);
            region.regency_code = prefix(2);
            region.district_code = prefix(3);
        }
    }

    Ok(region)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::address::en::CityName;
    use fake::Fake;

    #[test]
    fn test_parse_village_code() {
        let region = parse_region_code("11.01.02.2003", "Kelurahan Foo").unwrap();

        assert_eq!(region.level, 4);
        assert_eq!(region.code, "11.01.02.2003");
        assert_eq!(region.name, "Kelurahan Foo");
        assert_eq!(region.province_code.as_deref(), Some("11"));
        assert_eq!(region.regency_code.as_deref(), Some("11.01"));
        assert_eq!(region.district_code.as_deref(), Some("11.01.02"));
        assert_eq!(region.village_code.as_deref(), Some("11.01.02.2003"));
        assert_eq!(region.village_name.as_deref(), Some("Kelurahan Foo"));
        assert!(region.has_weather_data);
        assert!(region.is_active);
    }

    #[test]
    fn test_parse_province_code() {
        let region = parse_region_code("11", "Aceh").unwrap();

        assert_eq!(region.level, 1);
        assert_eq!(region.province_code.as_deref(), Some("11"));
        assert_eq!(region.province_name.as_deref(), Some("Aceh"));
        assert_eq!(region.regency_code, None);
        assert_eq!(region.district_code, None);
        assert_eq!(region.village_code, None);
        assert!(!region.has_weather_data);
    }

    #[test]
    fn test_parse_regency_code() {
        let region = parse_region_code("11.01", "Kab. Aceh Selatan").unwrap();

        assert_eq!(region.level, 2);
        assert_eq!(region.province_code.as_deref(), Some("11"));
        assert_eq!(region.regency_code.as_deref(), Some("11.01"));
        assert_eq!(region.regency_name.as_deref(), Some("Kab. Aceh Selatan"));
        assert_eq!(region.district_code, None);
        assert!(!region.has_weather_data);
    }

    #[test]
    fn test_parse_district_code() {
        let region = parse_region_code("11.01.02", "Kluet Utara").unwrap();

        assert_eq!(region.level, 3);
        assert_eq!(region.province_code.as_deref(), Some("11"));
        assert_eq!(region.regency_code.as_deref(), Some("11.01"));
        assert_eq!(region.district_code.as_deref(), Some("11.01.02"));
        assert_eq!(region.district_name.as_deref(), Some("Kluet Utara"));
        assert_eq!(region.village_code, None);
        assert_eq!(region.village_name, None);
    }

    #[test]
    fn test_ancestor_names_are_not_populated() {
        let region = parse_region_code("11.01.02.2003", "Kelurahan Foo").unwrap();

        assert_eq!(region.province_name, None);
        assert_eq!(region.regency_name, None);
        assert_eq!(region.district_name, None);
    }

    #[test]
    fn test_level_and_weather_flag_follow_segment_count() {
        let codes = ["32", "32.73", "32.73.01", "32.73.01.1001"];

        for (i, code) in codes.iter().enumerate() {
            let name: String = CityName().fake();
            let region = parse_region_code(code, &name).unwrap();
            let expected_level = (i + 1) as i32;

            assert_eq!(region.level, expected_level, "code {}", code);
            assert_eq!(region.has_weather_data, expected_level == 4, "code {}", code);
            assert_eq!(region.name, name);
        }
    }

    #[test]
    fn test_ancestor_codes_are_prefixes() {
        let region = parse_region_code("32.73.01.1001", "Sukaluyu").unwrap();

        for ancestor in [
            region.province_code.as_deref(),
            region.regency_code.as_deref(),
            region.district_code.as_deref(),
        ] {
            let ancestor = ancestor.unwrap();
            assert!(region.code.starts_with(ancestor));
        }
    }

    #[test]
    fn test_parse_empty_code_fails() {
        let err = parse_region_code("", "Empty").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_parse_deeper_than_village() {
        let region = parse_region_code("11.01.02.2003.5", "Dusun").unwrap();

        assert_eq!(region.level, 5);
        assert_eq!(region.province_code.as_deref(), Some("11"));
        assert_eq!(region.regency_code.as_deref(), Some("11.01"));
        assert_eq!(region.district_code.as_deref(), Some("11.01.02"));
        assert_eq!(region.village_code, None);
        assert_eq!(region.village_name, None);
        assert!(!region.has_weather_data);
    }

    #[test]
    fn test_each_parse_gets_a_fresh_id() {
        let a = parse_region_code("11", "Aceh").unwrap();
        let b = parse_region_code("11", "Aceh").unwrap();
        assert_ne!(a.id, b.id);
    }
}
