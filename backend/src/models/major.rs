//! Academic program codes accepted as course filters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Academic program (major) a course belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Major {
    Csye,
    Info,
    Damg,
}

/// Every accepted major, in the order they are listed in error messages.
pub const VALID_MAJORS: [Major; 3] = [Major::Csye, Major::Info, Major::Damg];

impl Major {
    /// Upper-case program code as stored in the catalog.
    pub fn as_str(&self) -> &'static str {
        match self {
            Major::Csye => "CSYE",
            Major::Info => "INFO",
            Major::Damg => "DAMG",
        }
    }

    /// Comma separated list of accepted codes, e.g. `"CSYE, INFO, DAMG"`.
    pub fn allowed_list() -> String {
        VALID_MAJORS
            .iter()
            .map(Major::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Whether a stored major string belongs to this program.
    pub fn matches(&self, value: &str) -> bool {
        value.trim().eq_ignore_ascii_case(self.as_str())
    }
}

impl fmt::Display for Major {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of [`VALID_MAJORS`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid major. Must be one of: {}", Major::allowed_list())]
pub struct InvalidMajor(pub String);

impl FromStr for Major {
    type Err = InvalidMajor;

    /// Parse a major code, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CSYE" => Ok(Major::Csye),
            "INFO" => Ok(Major::Info),
            "DAMG" => Ok(Major::Damg),
            _ => Err(InvalidMajor(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("csye".parse::<Major>().unwrap(), Major::Csye);
        assert_eq!("CSYE".parse::<Major>().unwrap(), Major::Csye);
        assert_eq!(" Info ".parse::<Major>().unwrap(), Major::Info);
        assert_eq!("damg".parse::<Major>().unwrap(), Major::Damg);
    }

    #[test]
    fn test_invalid_major_lists_allowed_values() {
        let err = "xyz".parse::<Major>().unwrap_err();
        assert_eq!(err.0, "xyz");
        assert_eq!(
            err.to_string(),
            "Invalid major. Must be one of: CSYE, INFO, DAMG"
        );
    }

    #[test]
    fn test_serializes_upper_case() {
        assert_eq!(serde_json::to_string(&Major::Damg).unwrap(), "\"DAMG\"");
        let parsed: Major = serde_json::from_str("\"INFO\"").unwrap();
        assert_eq!(parsed, Major::Info);
    }

    #[test]
    fn test_matches_stored_value() {
        assert!(Major::Csye.matches("csye"));
        assert!(!Major::Csye.matches("INFO"));
    }
}
