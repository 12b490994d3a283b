//! Error types for the lookup join step.
//!
//! These are the faults `render` does not recover from. Recoverable
//! problems (bad parameters, missing metadata, type mismatches) are
//! returned as [`RenderOutput::Message`](crate::RenderOutput::Message)
//! instead.

use lookup_source::LookupError;

/// Unrecovered lookup join failures.
#[derive(Debug, thiserror::Error)]
pub enum JoinError {
    /// Fetching or decoding the lookup table failed, or the metadata
    /// does not describe a requested key.
    #[error("lookup error: {0}")]
    Lookup(#[from] LookupError),

    /// A join column has no descriptor or is absent from the input table.
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    /// A lookup value column has the same name as an input column.
    #[error("column '{0}' already exists in the input table")]
    ColumnConflict(String),

    /// Arrow error while assembling the joined table.
    #[error("arrow error: {0}")]
    Arrow(#[from] arrow_schema::ArrowError),
}

/// Result alias for lookup join operations.
pub type JoinResult<T> = Result<T, JoinError>;
