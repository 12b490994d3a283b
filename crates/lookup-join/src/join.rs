//! Left join of an input `RecordBatch` against a [`LookupTable`].
//!
//! Every input row probes the lookup table's key index with the values of
//! its join columns. The input side drives the output: row count and
//! order are unchanged, all input columns are kept as-is, and the lookup
//! table's value columns are appended. Rows without a match, or with a
//! null in any join column, get nulls in the appended columns.

use std::collections::HashSet;
use std::sync::Arc;

use arrow_array::{new_null_array, Array, ArrayRef, RecordBatch, UInt32Array};
use arrow_schema::{Field, Schema, SchemaRef};
use lookup_source::{key_at, KeyColumn, LookupTable};

use crate::error::{JoinError, JoinResult};

/// Joins `input` to `table`, matching `columns` (input side) against the
/// table's keys position by position.
///
/// Each join column is cast to the storage type of its key before
/// probing, so any integer width matches an `Int64` key.
///
/// # Errors
///
/// Returns [`JoinError::UnknownColumn`] if a join column is missing from
/// `input`, [`JoinError::ColumnConflict`] if a value column name is
/// already used by `input`, and [`JoinError::Arrow`] if a cast fails.
pub fn left_join(
    input: &RecordBatch,
    columns: &[String],
    table: &LookupTable,
) -> JoinResult<RecordBatch> {
    let output_schema = build_output_schema(&input.schema(), &table.values().schema())?;

    let probe_arrays = columns
        .iter()
        .zip(table.key_types())
        .map(|(name, storage)| -> JoinResult<ArrayRef> {
            let idx = input
                .schema()
                .index_of(name)
                .map_err(|_| JoinError::UnknownColumn(name.clone()))?;
            Ok(arrow_cast::cast(input.column(idx), &storage.data_type())?)
        })
        .collect::<JoinResult<Vec<_>>>()?;

    let probe = probe_arrays
        .iter()
        .zip(columns)
        .map(|(array, name)| KeyColumn::try_new(name, array.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    let matches: Vec<Option<usize>> = (0..input.num_rows())
        .map(|row| key_at(&probe, row).and_then(|key| table.get(&key)))
        .collect();

    tracing::debug!(
        rows = input.num_rows(),
        matched = matches.iter().filter(|m| m.is_some()).count(),
        "Lookup join complete"
    );

    let mut output_columns: Vec<ArrayRef> = input.columns().to_vec();
    for array in table.values().columns() {
        output_columns.push(take_with_nulls(array.as_ref(), &matches)?);
    }

    Ok(RecordBatch::try_new(output_schema, output_columns)?)
}

fn build_output_schema(input: &SchemaRef, values: &SchemaRef) -> JoinResult<SchemaRef> {
    let input_names: HashSet<&str> = input.fields().iter().map(|f| f.name().as_str()).collect();

    let mut fields: Vec<Field> = input.fields().iter().map(|f| f.as_ref().clone()).collect();
    for field in values.fields() {
        if input_names.contains(field.name().as_str()) {
            return Err(JoinError::ColumnConflict(field.name().clone()));
        }
        // Unmatched rows are null on the lookup side.
        fields.push(field.as_ref().clone().with_nullable(true));
    }

    Ok(Arc::new(Schema::new_with_metadata(
        fields,
        input.metadata().clone(),
    )))
}

fn take_with_nulls(array: &dyn Array, indices: &[Option<usize>]) -> JoinResult<ArrayRef> {
    if array.is_empty() {
        return Ok(new_null_array(array.data_type(), indices.len()));
    }

    #[allow(clippy::cast_possible_truncation)]
    let index_array = UInt32Array::from(
        indices
            .iter()
            .map(|opt| opt.map(|i| i as u32))
            .collect::<Vec<Option<u32>>>(),
    );

    Ok(arrow_select::take::take(array, &index_array, None)?)
}
