//! # Lookup Join
//!
//! A table transformation step that enriches an Arrow `RecordBatch` with
//! values from a keyed lookup archive.
//!
//! ```rust,no_run
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! use arrow_array::{RecordBatch, StringArray};
//! use arrow_schema::{DataType, Field, Schema};
//! use lookup_join::{render, ColumnDescriptor, JoinParams, RenderOutput};
//! use lookup_source::ColumnType;
//!
//! let schema = Arc::new(Schema::new(vec![Field::new("year", DataType::Utf8, false)]));
//! let table = RecordBatch::try_new(
//!     schema,
//!     vec![Arc::new(StringArray::from(vec!["2006", "2008"]))],
//! )
//! .unwrap();
//! let inputs = HashMap::from([(
//!     "year".to_string(),
//!     ColumnDescriptor::new("year", ColumnType::Text),
//! )]);
//!
//! match render(&table, &JoinParams::new(["year"], "cpi"), &inputs).unwrap() {
//!     RenderOutput::Table(joined) => println!("{} columns", joined.num_columns()),
//!     RenderOutput::Message(msg) => eprintln!("{msg}"),
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`params`]: `JoinParams` and input `ColumnDescriptor`s
//! - [`mod@render`]: the join step entry points
//! - [`join`]: left join kernel

#![deny(missing_docs)]

/// Error types.
pub mod error;
pub mod join;
pub mod params;
pub mod render;

pub use error::{JoinError, JoinResult};
pub use params::{ColumnDescriptor, InputColumns, JoinParams};
pub use render::{render, render_with_source, RenderOutput, KEY_COUNT_MESSAGE};
