//! Keyed lookup table.
//!
//! A [`LookupTable`] is a decoded CSV table re-indexed by its key
//! columns. The key columns leave the value set; every remaining column
//! is a value column, in file order.
//!
//! Duplicate keys are kept. [`LookupTable::rows`] returns every row for a
//! key and [`LookupTable::get`] resolves to the last of them, so later
//! rows shadow earlier ones.

use std::collections::HashMap;
use std::fmt;

use arrow_array::{Array, Int64Array, RecordBatch, StringArray};
use arrow_schema::DataType;

use crate::error::{LookupError, LookupResult};
use crate::types::StorageType;

/// One component of a lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyValue {
    /// Text key.
    Text(String),
    /// Integer key.
    Integer(i64),
}

/// A borrowed, typed view over one key column.
#[derive(Debug, Clone, Copy)]
pub enum KeyColumn<'a> {
    /// `Utf8` column.
    Utf8(&'a StringArray),
    /// `Int64` column.
    Int64(&'a Int64Array),
}

impl<'a> KeyColumn<'a> {
    /// Wraps `array` if it has a key storage type.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Decode`] for any type other than `Utf8` or
    /// `Int64`.
    pub fn try_new(name: &str, array: &'a dyn Array) -> LookupResult<Self> {
        let column = match array.data_type() {
            DataType::Utf8 => array
                .as_any()
                .downcast_ref::<StringArray>()
                .map(KeyColumn::Utf8),
            DataType::Int64 => array
                .as_any()
                .downcast_ref::<Int64Array>()
                .map(KeyColumn::Int64),
            _ => None,
        };
        column.ok_or_else(|| {
            LookupError::Decode(format!(
                "key column '{name}' has unsupported type {}",
                array.data_type()
            ))
        })
    }

    /// Storage type of the column.
    #[must_use]
    pub const fn storage_type(&self) -> StorageType {
        match self {
            Self::Utf8(_) => StorageType::Utf8,
            Self::Int64(_) => StorageType::Int64,
        }
    }

    /// Key value at `row`, or `None` if it is null.
    #[must_use]
    pub fn value_at(&self, row: usize) -> Option<KeyValue> {
        match self {
            Self::Utf8(a) if a.is_valid(row) => Some(KeyValue::Text(a.value(row).to_string())),
            Self::Int64(a) if a.is_valid(row) => Some(KeyValue::Integer(a.value(row))),
            _ => None,
        }
    }
}

/// Composite key at `row` across `columns`, or `None` if any part is null.
#[must_use]
pub fn key_at(columns: &[KeyColumn<'_>], row: usize) -> Option<Vec<KeyValue>> {
    columns.iter().map(|c| c.value_at(row)).collect()
}

/// A lookup table indexed by its key columns.
pub struct LookupTable {
    keys: Vec<String>,
    key_types: Vec<StorageType>,
    values: RecordBatch,
    index: HashMap<Vec<KeyValue>, Vec<usize>>,
}

impl fmt::Debug for LookupTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupTable")
            .field("keys", &self.keys)
            .field("key_types", &self.key_types)
            .field("values", &self.values.schema())
            .field("rows", &self.values.num_rows())
            .field("distinct_keys", &self.index.len())
            .finish()
    }
}

impl LookupTable {
    /// Indexes `batch` by the columns named in `keys`.
    ///
    /// Rows with a null key component are kept in the value set but are
    /// not reachable through the index.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::MissingColumn`] if a key column is absent and
    /// [`LookupError::Decode`] if a key column is not `Utf8` or `Int64`.
    pub fn from_batch<S: AsRef<str>>(batch: &RecordBatch, keys: &[S]) -> LookupResult<Self> {
        let schema = batch.schema();
        let key_indices = keys
            .iter()
            .map(|k| {
                schema
                    .index_of(k.as_ref())
                    .map_err(|_| LookupError::MissingColumn(k.as_ref().to_string()))
            })
            .collect::<LookupResult<Vec<_>>>()?;

        let key_columns = key_indices
            .iter()
            .zip(keys)
            .map(|(&idx, name)| KeyColumn::try_new(name.as_ref(), batch.column(idx).as_ref()))
            .collect::<LookupResult<Vec<_>>>()?;

        let mut index: HashMap<Vec<KeyValue>, Vec<usize>> =
            HashMap::with_capacity(batch.num_rows());
        for row in 0..batch.num_rows() {
            if let Some(key) = key_at(&key_columns, row) {
                index.entry(key).or_default().push(row);
            }
        }

        let value_indices: Vec<usize> = (0..batch.num_columns())
            .filter(|i| !key_indices.contains(i))
            .collect();
        let values = batch.project(&value_indices)?;

        Ok(Self {
            keys: keys.iter().map(|k| k.as_ref().to_string()).collect(),
            key_types: key_columns.iter().map(KeyColumn::storage_type).collect(),
            values,
            index,
        })
    }

    /// Key column names, in index order.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Storage type of each key column.
    #[must_use]
    pub fn key_types(&self) -> &[StorageType] {
        &self.key_types
    }

    /// The value columns (everything except the keys).
    #[must_use]
    pub fn values(&self) -> &RecordBatch {
        &self.values
    }

    /// All rows stored under `key`, in file order.
    #[must_use]
    pub fn rows(&self, key: &[KeyValue]) -> &[usize] {
        self.index.get(key).map_or(&[][..], Vec::as_slice)
    }

    /// The row `key` resolves to: the last one stored under it.
    #[must_use]
    pub fn get(&self, key: &[KeyValue]) -> Option<usize> {
        self.rows(key).last().copied()
    }

    /// Number of rows in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.num_rows()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow_array::Float64Array;
    use arrow_schema::{Field, Schema};

    use super::*;

    fn cpi_batch() -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new("year", DataType::Utf8, true),
            Field::new("month", DataType::Int64, true),
            Field::new("cpi", DataType::Float64, true),
        ]));
        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec![Some("2006"), Some("2008"), Some("2008"), None])),
                Arc::new(Int64Array::from(vec![1, 3, 3, 5])),
                Arc::new(Float64Array::from(vec![198.3, 213.528, 999.0, 1.0])),
            ],
        )
        .unwrap()
    }

    fn key(year: &str, month: i64) -> Vec<KeyValue> {
        vec![KeyValue::Text(year.into()), KeyValue::Integer(month)]
    }

    #[test]
    fn test_index_by_composite_key() {
        let table = LookupTable::from_batch(&cpi_batch(), &["year", "month"]).unwrap();
        assert_eq!(table.keys(), ["year", "month"]);
        assert_eq!(table.key_types(), [StorageType::Utf8, StorageType::Int64]);
        assert_eq!(table.len(), 4);
        assert_eq!(table.values().num_columns(), 1);
        assert_eq!(table.values().schema().field(0).name(), "cpi");

        assert_eq!(table.get(&key("2006", 1)), Some(0));
        assert_eq!(table.get(&key("2006", 3)), None);
    }

    #[test]
    fn test_duplicate_keys_last_row_wins() {
        let table = LookupTable::from_batch(&cpi_batch(), &["year", "month"]).unwrap();
        assert_eq!(table.rows(&key("2008", 3)), [1, 2]);
        assert_eq!(table.get(&key("2008", 3)), Some(2));
    }

    #[test]
    fn test_null_keys_not_indexed() {
        let table = LookupTable::from_batch(&cpi_batch(), &["year"]).unwrap();
        assert_eq!(table.len(), 4);
        let indexed: usize = ["2006", "2008"]
            .iter()
            .map(|y| table.rows(&[KeyValue::Text((*y).into())]).len())
            .sum();
        assert_eq!(indexed, 3);
    }

    #[test]
    fn test_missing_key_column() {
        let err = LookupTable::from_batch(&cpi_batch(), &["day"]).unwrap_err();
        assert!(matches!(err, LookupError::MissingColumn(ref c) if c == "day"));
    }

    #[test]
    fn test_float_key_rejected() {
        let err = LookupTable::from_batch(&cpi_batch(), &["cpi"]).unwrap_err();
        assert!(matches!(err, LookupError::Decode(_)));
    }

    #[test]
    fn test_key_at_with_null() {
        let batch = cpi_batch();
        let columns = vec![
            KeyColumn::try_new("year", batch.column(0).as_ref()).unwrap(),
            KeyColumn::try_new("month", batch.column(1).as_ref()).unwrap(),
        ];
        assert_eq!(key_at(&columns, 0), Some(key("2006", 1)));
        assert_eq!(key_at(&columns, 3), None);
    }
}
