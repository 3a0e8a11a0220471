use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for dotted region codes used in API paths
    /// - Valid: "11", "11.01", "11.01.02", "11.01.02.2003"
    /// - Invalid: "", ".11", "11.", "11..01", "aceh", "11-01"
    pub static ref REGION_CODE_REGEX: Regex = Regex::new(r"^\d+(?:\.\d+)*$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_code_regex_valid() {
        assert!(REGION_CODE_REGEX.is_match("11"));
        assert!(REGION_CODE_REGEX.is_match("11.01"));
        assert!(REGION_CODE_REGEX.is_match("11.01.02"));
        assert!(REGION_CODE_REGEX.is_match("11.01.02.2003"));
    }

    #[test]
    fn test_region_code_regex_invalid() {
        assert!(!REGION_CODE_REGEX.is_match("")); // empty
        assert!(!REGION_CODE_REGEX.is_match(".11")); // leading dot
        assert!(!REGION_CODE_REGEX.is_match("11.")); // trailing dot
        assert!(!REGION_CODE_REGEX.is_match("11..01")); // empty segment
        assert!(!REGION_CODE_REGEX.is_match("aceh")); // letters
        assert!(!REGION_CODE_REGEX.is_match("11-01")); // wrong separator
        assert!(!REGION_CODE_REGEX.is_match("11 01")); // space
    }
}
