//! Metadata descriptors (`<value>.csv.yml`).
//!
//! A descriptor looks like:
//!
//! ```yaml
//! name: Consumer Price Index
//! description: Annual average CPI-U
//! columns:
//!   year:
//!     type: Text
//!   cpi:
//!     type: Number
//! ```
//!
//! Column types are kept as raw strings here and translated through
//! [`RemoteType`] only when a key is checked, so a descriptor with an
//! unfamiliar or missing value-column type still parses. Only key columns
//! must carry a `type`.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{LookupError, LookupResult};
use crate::types::RemoteType;

/// Parsed metadata descriptor for one lookup table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LookupMetadata {
    /// Human-readable table name.
    #[serde(default)]
    pub name: Option<String>,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Where the data came from, in whatever shape the archive wrote it.
    #[serde(default)]
    pub sources: Option<serde_yaml::Value>,
    /// Per-column descriptors, keyed by column name.
    #[serde(default)]
    pub columns: BTreeMap<String, ColumnMetadata>,
}

/// Descriptor of a single column.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ColumnMetadata {
    /// Raw type name from the archive vocabulary.
    #[serde(default, rename = "type")]
    pub type_name: Option<String>,
    /// Optional column description.
    #[serde(default)]
    pub description: Option<String>,
}

impl LookupMetadata {
    /// Parses a descriptor from YAML text.
    ///
    /// # Errors
    ///
    /// Returns the parser's message when the text is empty, is not a
    /// mapping, or does not match the descriptor shape.
    pub fn from_yaml(text: &str) -> Result<Self, String> {
        if text.trim().is_empty() {
            return Err("empty document".to_string());
        }
        serde_yaml::from_str(text).map_err(|e| e.to_string())
    }

    /// Translated type of key column `key`.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::MissingKeyMetadata`] if the descriptor has no
    /// entry for `key` or the entry has no `type`, and
    /// [`LookupError::UnknownRemoteType`] if the type is outside the
    /// archive vocabulary.
    pub fn key_type(&self, key: &str) -> LookupResult<RemoteType> {
        self.columns
            .get(key)
            .and_then(|c| c.type_name.as_deref())
            .ok_or_else(|| LookupError::MissingKeyMetadata(key.to_string()))?
            .parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CPI: &str = "\
name: Consumer Price Index
description: Annual average CPI-U
sources:
  - name: Bureau of Labor Statistics
    url: http://www.bls.gov/cpi/
columns:
  year:
    type: Text
  cpi:
    type: Number
    description: Index value
";

    #[test]
    fn test_parse_descriptor() {
        let meta = LookupMetadata::from_yaml(CPI).unwrap();
        assert_eq!(meta.name.as_deref(), Some("Consumer Price Index"));
        assert!(matches!(meta.sources, Some(serde_yaml::Value::Sequence(ref s)) if s.len() == 1));
        assert_eq!(meta.columns.len(), 2);
        assert_eq!(meta.key_type("year").unwrap(), RemoteType::Text);
        assert_eq!(meta.key_type("cpi").unwrap(), RemoteType::Number);
    }

    #[test]
    fn test_columns_only() {
        let meta = LookupMetadata::from_yaml("columns:\n  fips:\n    type: Text\n").unwrap();
        assert!(meta.name.is_none());
        assert_eq!(meta.key_type("fips").unwrap(), RemoteType::Text);
    }

    #[test]
    fn test_missing_key() {
        let meta = LookupMetadata::from_yaml(CPI).unwrap();
        let err = meta.key_type("month").unwrap_err();
        assert!(matches!(err, LookupError::MissingKeyMetadata(ref k) if k == "month"));
    }

    #[test]
    fn test_unknown_type_parses_but_fails_on_check() {
        let meta = LookupMetadata::from_yaml("columns:\n  day:\n    type: Date\n").unwrap();
        assert!(matches!(
            meta.key_type("day"),
            Err(LookupError::UnknownRemoteType(_))
        ));
    }

    #[test]
    fn test_value_column_without_type() {
        let meta = LookupMetadata::from_yaml(
            "columns:\n  year:\n    type: Text\n  cpi:\n    description: x\n",
        )
        .unwrap();
        assert_eq!(meta.key_type("year").unwrap(), RemoteType::Text);
        assert!(meta.columns["cpi"].type_name.is_none());
        // An untyped column cannot serve as a key.
        assert!(matches!(
            meta.key_type("cpi"),
            Err(LookupError::MissingKeyMetadata(ref k)) if k == "cpi"
        ));
    }

    #[test]
    fn test_sources_as_plain_string() {
        let meta =
            LookupMetadata::from_yaml("sources: BLS\ncolumns:\n  year:\n    type: Text\n").unwrap();
        assert_eq!(meta.sources, Some(serde_yaml::Value::String("BLS".to_string())));
        assert_eq!(meta.key_type("year").unwrap(), RemoteType::Text);
    }

    #[test]
    fn test_rejects_empty_and_non_mapping() {
        assert!(LookupMetadata::from_yaml("").is_err());
        assert!(LookupMetadata::from_yaml("   \n").is_err());
        assert!(LookupMetadata::from_yaml("- a\n- b\n").is_err());
        assert!(LookupMetadata::from_yaml("<html>404 Not Found</html>").is_err());
    }
}
