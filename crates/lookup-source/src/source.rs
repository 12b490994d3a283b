//! Lookup archive source.
//!
//! [`LookupSource`] resolves archive paths against a root location and
//! turns the fetched documents into a [`LookupMetadata`] or a
//! [`LookupTable`].
//!
//! ## Error handling
//!
//! The two fetches fail differently. Any problem reading a metadata
//! descriptor becomes [`LookupError::MetadataUnavailable`], so callers
//! cannot tell a missing descriptor from a malformed one. Table fetches
//! report the transport or decode error itself.

use std::collections::HashMap;

use crate::config::LookupSourceConfig;
use crate::decode::decode_csv;
use crate::error::{LookupError, LookupResult};
use crate::metadata::LookupMetadata;
use crate::path::{build_metadata_path, build_table_path};
use crate::table::LookupTable;
use crate::transport::Transport;
use crate::types::StorageType;

/// A reference to an archive of lookup tables.
#[derive(Debug)]
pub struct LookupSource {
    config: LookupSourceConfig,
    transport: Transport,
}

impl LookupSource {
    /// Creates a source for the archive at `root` with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Fetch`] if the HTTP client cannot be built.
    pub fn new(root: impl Into<String>) -> LookupResult<Self> {
        Self::with_config(LookupSourceConfig {
            root: root.into(),
            ..LookupSourceConfig::default()
        })
    }

    /// Creates a source from a full configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Fetch`] if the HTTP client cannot be built.
    pub fn with_config(mut config: LookupSourceConfig) -> LookupResult<Self> {
        let trimmed_len = config.root.trim_end_matches('/').len();
        config.root.truncate(trimmed_len);
        let transport = Transport::for_root(&config.root, &config.user_agent)?;
        Ok(Self { config, transport })
    }

    /// Creates a source for the public default archive.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Fetch`] if the HTTP client cannot be built.
    pub fn from_default_root() -> LookupResult<Self> {
        Self::with_config(LookupSourceConfig::default())
    }

    /// The archive root, without a trailing `/`.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.config.root
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{path}", self.config.root)
    }

    /// Fetches the metadata descriptor of a lookup table.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::MetadataUnavailable`] if the descriptor
    /// cannot be fetched or parsed, whatever the cause.
    pub fn get_metadata<S: AsRef<str>>(
        &self,
        keys: &[S],
        value: &str,
        version: Option<&str>,
    ) -> LookupResult<LookupMetadata> {
        let url = self.url_for(&build_metadata_path(keys, value, version));

        let parsed = self
            .transport
            .fetch_text(&url)
            .map_err(|e| e.to_string())
            .and_then(|text| LookupMetadata::from_yaml(&text));

        parsed.map_err(|reason| {
            tracing::warn!(url = %url, reason = %reason, "Lookup metadata unavailable");
            LookupError::metadata_unavailable(&url, reason)
        })
    }

    /// Fetches a lookup table and indexes it by `keys`.
    ///
    /// Columns named in `column_types` are decoded into the given storage
    /// type; the rest are inferred.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the fetch fails, [`LookupError::Csv`]
    /// or [`LookupError::Decode`] if the table cannot be decoded, and
    /// [`LookupError::MissingColumn`] if a key column is absent.
    pub fn get_table<S: AsRef<str>>(
        &self,
        keys: &[S],
        value: &str,
        version: Option<&str>,
        column_types: &HashMap<String, StorageType>,
    ) -> LookupResult<LookupTable> {
        let url = self.url_for(&build_table_path(keys, value, version));
        let text = self.transport.fetch_text(&url)?;
        let batch = decode_csv(&text, column_types)?;
        let table = LookupTable::from_batch(&batch, keys)?;
        tracing::debug!(
            url = %url,
            rows = table.len(),
            value_columns = table.values().num_columns(),
            "Loaded lookup table"
        );
        Ok(table)
    }
}
