//! Join parameters and input column descriptors.
//!
//! Both arrive from the host pipeline, usually as JSON, and are
//! deserialized with `serde`. A `null` in any parameter field reads as
//! the empty value. `keys` may also arrive as a list of names.

use std::collections::HashMap;

use lookup_source::ColumnType;
use serde::{Deserialize, Deserializer};

/// Declared name and semantic type of one input column.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name.
    pub name: String,
    /// Declared semantic type.
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl ColumnDescriptor {
    /// Creates a descriptor.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// Input column descriptors, keyed by column name.
pub type InputColumns = HashMap<String, ColumnDescriptor>;

/// Parameters of one lookup join.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct JoinParams {
    /// Input columns to join on, in order.
    #[serde(deserialize_with = "null_as_default")]
    pub columns: Vec<String>,
    /// Comma-separated remote key names. Empty means the column names
    /// are the key names.
    ///
    /// Each name is trimmed after splitting, so `"year, month"` and
    /// `"year,month"` name the same keys and the same remote path.
    #[serde(deserialize_with = "key_names")]
    pub keys: String,
    /// Name of the lookup table's value.
    #[serde(deserialize_with = "null_as_default")]
    pub value: String,
    /// Optional edition of the lookup table.
    #[serde(deserialize_with = "null_as_default")]
    pub version: String,
}

impl JoinParams {
    /// Parameters joining `columns` against `value`, with keys equal to
    /// the column names and no version.
    pub fn new<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            value: value.into(),
            ..Self::default()
        }
    }

    /// Sets the comma-separated remote key names.
    #[must_use]
    pub fn with_keys(mut self, keys: impl Into<String>) -> Self {
        self.keys = keys.into();
        self
    }

    /// Sets the version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// The version, or `None` when empty.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        Some(self.version.as_str()).filter(|v| !v.is_empty())
    }

    /// Whether there is nothing to join.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.columns.is_empty() || self.value.is_empty()
    }

    /// Remote key names, one per join column.
    ///
    /// Returns `None` when explicit keys are given and their count does
    /// not match the number of columns.
    #[must_use]
    pub fn resolve_keys(&self) -> Option<Vec<String>> {
        if self.keys.is_empty() {
            return Some(self.columns.clone());
        }
        let keys: Vec<String> = self.keys.split(',').map(|k| k.trim().to_string()).collect();
        (keys.len() == self.columns.len()).then_some(keys)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum KeyNames {
    Joined(String),
    List(Vec<String>),
}

fn key_names<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<KeyNames>::deserialize(deserializer)? {
        None => String::new(),
        Some(KeyNames::Joined(keys)) => keys,
        Some(KeyNames::List(keys)) => keys.join(","),
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_default_to_columns() {
        let params = JoinParams::new(["year", "month"], "cpi");
        assert_eq!(params.resolve_keys().unwrap(), ["year", "month"]);
        assert!(params.version().is_none());
    }

    #[test]
    fn test_explicit_keys() {
        let params = JoinParams::new(["foo", "month"], "cpi").with_keys("year, month");
        assert_eq!(params.resolve_keys().unwrap(), ["year", "month"]);
    }

    #[test]
    fn test_key_count_mismatch() {
        let params = JoinParams::new(["foo", "month"], "cpi").with_keys("year");
        assert!(params.resolve_keys().is_none());
        let params = JoinParams::new(["year"], "cpi").with_keys("year,month");
        assert!(params.resolve_keys().is_none());
    }

    #[test]
    fn test_noop() {
        assert!(JoinParams::default().is_noop());
        assert!(JoinParams::new(["year"], "").is_noop());
        assert!(JoinParams::new(Vec::<String>::new(), "cpi").is_noop());
        assert!(!JoinParams::new(["year"], "cpi").is_noop());
    }

    #[test]
    fn test_deserialize_with_nulls() {
        let params: JoinParams = serde_json::from_str(
            r#"{"columns": ["year"], "keys": null, "value": "cpi", "version": null}"#,
        )
        .unwrap();
        assert_eq!(params, JoinParams::new(["year"], "cpi"));

        let empty: JoinParams =
            serde_json::from_str(r#"{"columns": null, "value": null}"#).unwrap();
        assert!(empty.is_noop());
    }

    #[test]
    fn test_deserialize_keys_as_list() {
        let empty: JoinParams =
            serde_json::from_str(r#"{"columns": ["year"], "keys": [], "value": "cpi"}"#).unwrap();
        assert_eq!(empty, JoinParams::new(["year"], "cpi"));
        assert_eq!(empty.resolve_keys().unwrap(), ["year"]);

        let listed: JoinParams = serde_json::from_str(
            r#"{"columns": ["foo", "month"], "keys": ["year", "month"], "value": "cpi"}"#,
        )
        .unwrap();
        assert_eq!(listed.resolve_keys().unwrap(), ["year", "month"]);

        assert!(serde_json::from_str::<JoinParams>(r#"{"keys": 3}"#).is_err());
    }

    #[test]
    fn test_deserialize_version() {
        let params: JoinParams = serde_json::from_str(
            r#"{"columns": ["year", "month"], "value": "cpi", "version": "sa"}"#,
        )
        .unwrap();
        assert_eq!(params.version(), Some("sa"));
    }

    #[test]
    fn test_deserialize_descriptor() {
        let column: ColumnDescriptor =
            serde_json::from_str(r#"{"name": "year", "type": "text"}"#).unwrap();
        assert_eq!(column, ColumnDescriptor::new("year", ColumnType::Text));
        assert!(serde_json::from_str::<ColumnDescriptor>(r#"{"name": "x", "type": "blob"}"#).is_err());
    }
}
