//! Type vocabularies.
//!
//! Three closed vocabularies meet at a lookup join:
//!
//! - [`RemoteType`]: what the archive's metadata declares (`Text`, `Number`)
//! - [`ColumnType`]: the semantic type a host declares for its columns
//! - [`StorageType`]: the Arrow type a key column is decoded into
//!
//! Translation is `Text → text → Utf8` and `Number → integer → Int64`.
//! Anything else fails loudly.

use std::fmt;
use std::str::FromStr;

use arrow_schema::DataType;
use serde::Deserialize;

use crate::error::LookupError;

/// Column type as declared in an archive metadata descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteType {
    /// `Text`
    Text,
    /// `Number`
    Number,
}

impl RemoteType {
    /// The semantic type a host column must have to join on this key.
    #[must_use]
    pub const fn column_type(self) -> ColumnType {
        match self {
            Self::Text => ColumnType::Text,
            Self::Number => ColumnType::Integer,
        }
    }

    /// The storage type a key column of this type is decoded into.
    #[must_use]
    pub const fn storage_type(self) -> StorageType {
        match self {
            Self::Text => StorageType::Utf8,
            Self::Number => StorageType::Int64,
        }
    }
}

impl FromStr for RemoteType {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Text" => Ok(Self::Text),
            "Number" => Ok(Self::Number),
            other => Err(LookupError::UnknownRemoteType(other.to_string())),
        }
    }
}

/// Semantic type of a host table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// `text`
    Text,
    /// `integer`
    Integer,
    /// `number`
    Number,
    /// `datetime`
    Datetime,
}

impl ColumnType {
    /// Lower-case name used in host-facing messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Datetime => "datetime",
        }
    }

    /// Storage type for a key column of this semantic type.
    ///
    /// Only `text` and `integer` can key a lookup table.
    #[must_use]
    pub const fn storage_type(self) -> Option<StorageType> {
        match self {
            Self::Text => Some(StorageType::Utf8),
            Self::Integer => Some(StorageType::Int64),
            Self::Number | Self::Datetime => None,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "integer" => Ok(Self::Integer),
            "number" => Ok(Self::Number),
            "datetime" => Ok(Self::Datetime),
            other => Err(format!("unknown column type '{other}'")),
        }
    }
}

/// Physical type a key column is decoded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageType {
    /// UTF-8 string.
    Utf8,
    /// 64-bit signed integer.
    Int64,
}

impl StorageType {
    /// The Arrow data type for this storage type.
    #[must_use]
    pub const fn data_type(self) -> DataType {
        match self {
            Self::Utf8 => DataType::Utf8,
            Self::Int64 => DataType::Int64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_type_translation() {
        let text: RemoteType = "Text".parse().unwrap();
        let number: RemoteType = "Number".parse().unwrap();
        assert_eq!(text.column_type(), ColumnType::Text);
        assert_eq!(number.column_type(), ColumnType::Integer);
        assert_eq!(
            text.column_type().storage_type().map(StorageType::data_type),
            Some(DataType::Utf8)
        );
        assert_eq!(
            number.column_type().storage_type().map(StorageType::data_type),
            Some(DataType::Int64)
        );
        assert_eq!(text.storage_type(), StorageType::Utf8);
        assert_eq!(number.storage_type(), StorageType::Int64);
    }

    #[test]
    fn test_unknown_remote_type_fails() {
        let err = "Date".parse::<RemoteType>().unwrap_err();
        assert!(matches!(err, LookupError::UnknownRemoteType(ref t) if t == "Date"));
        // Case matters: the archive writes capitalized names.
        assert!("text".parse::<RemoteType>().is_err());
    }

    #[test]
    fn test_column_type_names() {
        for name in ["text", "integer", "number", "datetime"] {
            let ty: ColumnType = name.parse().unwrap();
            assert_eq!(ty.to_string(), name);
        }
        assert!("float".parse::<ColumnType>().is_err());
    }

    #[test]
    fn test_non_key_types_have_no_storage() {
        assert!(ColumnType::Number.storage_type().is_none());
        assert!(ColumnType::Datetime.storage_type().is_none());
    }
}
