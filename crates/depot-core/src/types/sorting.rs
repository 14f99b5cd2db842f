//! Sort keys accepted by the file listing endpoint.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Sort keys for the owned-files listing.
///
/// The wire format is the lowercase `field_direction` form used by the
/// `sort=` query parameter; an unknown key is a validation error rather
/// than a silent fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileSortKey {
    /// Filename A→Z.
    NameAsc,
    /// Filename Z→A.
    NameDesc,
    /// Oldest upload first.
    DateAsc,
    /// Newest upload first.
    DateDesc,
    /// Smallest current version first.
    SizeAsc,
    /// Largest current version first.
    SizeDesc,
}

impl FileSortKey {
    /// Return the key as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NameAsc => "name_asc",
            Self::NameDesc => "name_desc",
            Self::DateAsc => "date_asc",
            Self::DateDesc => "date_desc",
            Self::SizeAsc => "size_asc",
            Self::SizeDesc => "size_desc",
        }
    }

    /// Return the SQL `ORDER BY` clause for this key.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::NameAsc => "filename ASC",
            Self::NameDesc => "filename DESC",
            Self::DateAsc => "created_at ASC",
            Self::DateDesc => "created_at DESC",
            Self::SizeAsc => "size_bytes ASC",
            Self::SizeDesc => "size_bytes DESC",
        }
    }
}

impl Default for FileSortKey {
    fn default() -> Self {
        Self::DateDesc
    }
}

impl fmt::Display for FileSortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FileSortKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name_asc" => Ok(Self::NameAsc),
            "name_desc" => Ok(Self::NameDesc),
            "date_asc" => Ok(Self::DateAsc),
            "date_desc" => Ok(Self::DateDesc),
            "size_asc" => Ok(Self::SizeAsc),
            "size_desc" => Ok(Self::SizeDesc),
            _ => Err(AppError::validation(format!(
                "Unknown sort key: '{s}'. Expected one of: name_asc, name_desc, date_asc, date_desc, size_asc, size_desc"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        for key in [
            FileSortKey::NameAsc,
            FileSortKey::NameDesc,
            FileSortKey::DateAsc,
            FileSortKey::DateDesc,
            FileSortKey::SizeAsc,
            FileSortKey::SizeDesc,
        ] {
            assert_eq!(key.as_str().parse::<FileSortKey>().unwrap(), key);
        }
    }

    #[test]
    fn test_unknown_key_is_validation_error() {
        let err = "uploaded_desc".parse::<FileSortKey>().unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Validation);
    }
}
