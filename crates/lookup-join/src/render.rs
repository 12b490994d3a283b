//! The lookup join step.
//!
//! ## Flow
//!
//! 1. Nothing to join (no columns or no value) → input returned as-is
//! 2. Resolve key names; a count mismatch is reported
//! 3. Fetch the metadata descriptor; if unavailable, report it
//! 4. Check each join column's declared type against its key's type
//! 5. Fetch the lookup table
//! 6. Left join
//!
//! Steps 2-4 report problems as a [`RenderOutput::Message`] for the host
//! to display. A failure in step 5 is an `Err`: table fetches are not
//! expected to fail once the descriptor was found.

use std::collections::HashMap;

use arrow_array::RecordBatch;
use lookup_source::{LookupSource, StorageType};

use crate::error::{JoinError, JoinResult};
use crate::join::left_join;
use crate::params::{InputColumns, JoinParams};

/// Message returned when explicit keys and columns differ in count.
pub const KEY_COUNT_MESSAGE: &str =
    "The number of keys must match the number of columns. (Use commas to separate keys.)";

/// Result of a lookup join step: a table, or an explanation for the user.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutput {
    /// The joined table (or the untouched input for a no-op join).
    Table(RecordBatch),
    /// A human-readable reason the join was not performed.
    Message(String),
}

impl RenderOutput {
    /// The table, if this is [`RenderOutput::Table`].
    #[must_use]
    pub fn table(&self) -> Option<&RecordBatch> {
        match self {
            Self::Table(batch) => Some(batch),
            Self::Message(_) => None,
        }
    }

    /// The message, if this is [`RenderOutput::Message`].
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Table(_) => None,
            Self::Message(msg) => Some(msg),
        }
    }
}

/// What steps 1-2 decided.
enum Plan {
    Passthrough,
    Reject(String),
    Lookup(Vec<String>),
}

fn plan(params: &JoinParams) -> Plan {
    if params.is_noop() {
        return Plan::Passthrough;
    }
    match params.resolve_keys() {
        Some(keys) => Plan::Lookup(keys),
        None => Plan::Reject(KEY_COUNT_MESSAGE.to_string()),
    }
}

/// Joins `table` with a lookup table from the public default archive.
///
/// # Errors
///
/// See [`render_with_source`].
pub fn render(
    table: &RecordBatch,
    params: &JoinParams,
    input_columns: &InputColumns,
) -> JoinResult<RenderOutput> {
    match plan(params) {
        Plan::Passthrough => Ok(RenderOutput::Table(table.clone())),
        Plan::Reject(msg) => Ok(reject(msg)),
        Plan::Lookup(keys) => {
            let source = LookupSource::from_default_root()?;
            lookup(&source, table, params, input_columns, &keys)
        }
    }
}

/// Joins `table` with a lookup table from `source`.
///
/// # Errors
///
/// Returns [`JoinError::Lookup`] if the lookup table cannot be fetched or
/// decoded, or if the metadata has no valid entry for a key;
/// [`JoinError::UnknownColumn`] if a join column has no descriptor or is
/// not in `table`; [`JoinError::ColumnConflict`] if a value column name is
/// already taken.
pub fn render_with_source(
    source: &LookupSource,
    table: &RecordBatch,
    params: &JoinParams,
    input_columns: &InputColumns,
) -> JoinResult<RenderOutput> {
    match plan(params) {
        Plan::Passthrough => Ok(RenderOutput::Table(table.clone())),
        Plan::Reject(msg) => Ok(reject(msg)),
        Plan::Lookup(keys) => lookup(source, table, params, input_columns, &keys),
    }
}

fn lookup(
    source: &LookupSource,
    table: &RecordBatch,
    params: &JoinParams,
    input_columns: &InputColumns,
    keys: &[String],
) -> JoinResult<RenderOutput> {
    let value = params.value.as_str();
    let version = params.version();
    tracing::debug!(
        columns = ?params.columns,
        keys = ?keys,
        value,
        version,
        "Rendering lookup join"
    );

    let metadata = match source.get_metadata(keys, value, version) {
        Ok(metadata) => metadata,
        Err(e) if e.is_metadata_unavailable() => {
            return Ok(reject(format!(
                "Unable to find lookup table for keys `{}`, value `{value}`, and version `{}`",
                format_keys(keys),
                version.unwrap_or("None"),
            )));
        }
        Err(e) => return Err(e.into()),
    };

    let mut column_types: HashMap<String, StorageType> = HashMap::with_capacity(keys.len());
    for (column, key) in params.columns.iter().zip(keys) {
        let column_type = input_columns
            .get(column)
            .ok_or_else(|| JoinError::UnknownColumn(column.clone()))?
            .column_type;
        let remote_type = metadata.key_type(key)?;
        let key_type = remote_type.column_type();

        if column_type != key_type {
            return Ok(reject(format!(
                "Column `{column}` has type `{column_type}`. Key `{key}` requires type `{key_type}`."
            )));
        }
        column_types.insert(key.clone(), remote_type.storage_type());
    }

    let lookup_table = source.get_table(keys, value, version, &column_types)?;
    let joined = left_join(table, &params.columns, &lookup_table)?;
    Ok(RenderOutput::Table(joined))
}

fn reject(msg: String) -> RenderOutput {
    tracing::warn!(reason = %msg, "Lookup join not performed");
    RenderOutput::Message(msg)
}

/// Renders key names the way hosts display lists: `['year', 'month']`.
fn format_keys(keys: &[String]) -> String {
    let quoted: Vec<String> = keys.iter().map(|k| format!("'{k}'")).collect();
    format!("[{}]", quoted.join(", "))
}
