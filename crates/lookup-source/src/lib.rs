//! # Lookup Source
//!
//! Access to archives of keyed lookup tables.
//!
//! An archive stores each table as a CSV file next to a small YAML
//! descriptor, under a path built from the table's key names, its value
//! name and an optional version:
//!
//! ```text
//! <root>/year/month/cpi.sa.csv
//! <root>/year/month/cpi.sa.csv.yml
//! ```
//!
//! ## Module Overview
//!
//! - [`path`]: archive path layout
//! - [`types`]: remote, semantic and storage type vocabularies
//! - [`metadata`]: YAML descriptor model
//! - [`decode`]: CSV → Arrow `RecordBatch`
//! - [`table`]: `LookupTable` indexed by key columns
//! - [`source`]: `LookupSource`, the fetch-and-parse entry point

#![deny(missing_docs)]

/// Source configuration.
pub mod config;
pub mod decode;
/// Error types.
pub mod error;
pub mod metadata;
pub mod path;
pub mod source;
pub mod table;
pub mod transport;
pub mod types;

pub use config::{LookupSourceConfig, DEFAULT_ROOT};
pub use error::{LookupError, LookupResult};
pub use metadata::{ColumnMetadata, LookupMetadata};
pub use path::{build_metadata_path, build_table_path};
pub use source::LookupSource;
pub use table::{key_at, KeyColumn, KeyValue, LookupTable};
pub use types::{ColumnType, RemoteType, StorageType};
