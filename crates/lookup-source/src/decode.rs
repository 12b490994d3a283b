//! CSV table decoding.
//!
//! Converts the text of a lookup table into an Arrow `RecordBatch`.
//! The first row is the header. Columns with a requested [`StorageType`]
//! are coerced strictly: a field that does not parse is an error, not a
//! silent null. All other columns get a type inferred from every row
//! (`Boolean`, `Int64`, `Float64`, falling back to `Utf8`).
//!
//! Empty fields decode as null in every column. Field text is kept as
//! written, surrounding whitespace included; whitespace is only ignored
//! when a field is parsed as a number or boolean. Header names are
//! trimmed.

use std::collections::HashMap;
use std::sync::Arc;

use arrow_array::{
    Array, ArrayRef, BooleanArray, Float64Array, Int64Array, RecordBatch, StringArray,
};
use arrow_schema::{DataType, Field, Schema};

use crate::error::{LookupError, LookupResult};
use crate::types::StorageType;

/// Decodes CSV `text` into a single `RecordBatch`.
///
/// `column_types` maps column names to the storage type they must be
/// decoded into. Names not present in the header are ignored here; the
/// caller checks for required columns.
///
/// # Errors
///
/// Returns [`LookupError::Csv`] for malformed CSV (including rows with
/// the wrong number of fields) and [`LookupError::Decode`] when a
/// coerced field cannot be parsed.
pub fn decode_csv(
    text: &str,
    column_types: &HashMap<String, StorageType>,
) -> LookupResult<RecordBatch> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| LookupError::Csv(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(LookupError::Csv("missing header row".to_string()));
    }

    let mut rows: Vec<csv::StringRecord> = Vec::new();
    for record in reader.records() {
        rows.push(record.map_err(|e| LookupError::Csv(e.to_string()))?);
    }

    let mut fields = Vec::with_capacity(headers.len());
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(headers.len());

    for (idx, name) in headers.iter().enumerate() {
        let values: Vec<Option<&str>> = rows
            .iter()
            .map(|row| row.get(idx).filter(|v| !v.is_empty()))
            .collect();

        let array = match column_types.get(name) {
            Some(StorageType::Utf8) => utf8_column(&values),
            Some(StorageType::Int64) => int64_column(name, &values)?,
            None => inferred_column(&values),
        };
        fields.push(Field::new(name, array.data_type().clone(), true));
        columns.push(array);
    }

    let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?;
    tracing::debug!(
        rows = batch.num_rows(),
        columns = batch.num_columns(),
        "Decoded lookup CSV"
    );
    Ok(batch)
}

fn utf8_column(values: &[Option<&str>]) -> ArrayRef {
    Arc::new(StringArray::from(values.to_vec()))
}

fn int64_column(name: &str, values: &[Option<&str>]) -> LookupResult<ArrayRef> {
    let parsed = values
        .iter()
        .enumerate()
        .map(|(row, v)| {
            v.map(|s| {
                s.trim().parse::<i64>().map_err(|_| {
                    // Header is line 1.
                    let line = row + 2;
                    LookupError::Decode(format!(
                        "column '{name}' line {line}: cannot parse '{s}' as integer"
                    ))
                })
            })
            .transpose()
        })
        .collect::<LookupResult<Vec<Option<i64>>>>()?;
    Ok(Arc::new(Int64Array::from(parsed)))
}

/// Narrowest type that every non-null value parses as.
fn infer_type(values: &[Option<&str>]) -> DataType {
    let present: Vec<&str> = values.iter().flatten().map(|v| v.trim()).collect();
    if present.is_empty() {
        return DataType::Utf8;
    }

    if present
        .iter()
        .all(|v| v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("false"))
    {
        DataType::Boolean
    } else if present.iter().all(|v| v.parse::<i64>().is_ok()) {
        DataType::Int64
    } else if present.iter().all(|v| v.parse::<f64>().is_ok()) {
        DataType::Float64
    } else {
        DataType::Utf8
    }
}

fn inferred_column(values: &[Option<&str>]) -> ArrayRef {
    // Every branch below only sees values that already parsed in `infer_type`.
    match infer_type(values) {
        DataType::Boolean => Arc::new(BooleanArray::from(
            values
                .iter()
                .map(|v| v.map(|s| s.trim().eq_ignore_ascii_case("true")))
                .collect::<Vec<_>>(),
        )),
        DataType::Int64 => Arc::new(Int64Array::from(
            values
                .iter()
                .map(|v| v.and_then(|s| s.trim().parse::<i64>().ok()))
                .collect::<Vec<_>>(),
        )),
        DataType::Float64 => Arc::new(Float64Array::from(
            values
                .iter()
                .map(|v| v.and_then(|s| s.trim().parse::<f64>().ok()))
                .collect::<Vec<_>>(),
        )),
        _ => utf8_column(values),
    }
}
