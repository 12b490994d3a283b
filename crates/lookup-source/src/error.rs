//! Error types for lookup archive access.
//!
//! [`LookupError::MetadataUnavailable`] is the only variant produced by
//! [`LookupSource::get_metadata`](crate::LookupSource::get_metadata): a
//! missing descriptor and a malformed one are reported the same way.
//! Table fetches surface the underlying transport or decode failure.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias for lookup archive operations.
pub type LookupResult<T> = Result<T, LookupError>;

/// Errors from lookup archive operations.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The metadata descriptor could not be fetched or parsed.
    #[error("metadata unavailable at {url}: {reason}")]
    MetadataUnavailable {
        /// URL of the descriptor.
        url: String,
        /// Underlying cause, for diagnostics only.
        reason: String,
    },

    /// The HTTP request could not be completed.
    #[error("fetch failed for {url}: {message}")]
    Fetch {
        /// Requested URL.
        url: String,
        /// Transport error message.
        message: String,
    },

    /// The server answered with a non-success status.
    #[error("fetch failed for {url}: HTTP {status}")]
    HttpStatus {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// A local archive file could not be read.
    #[error("read {}: {source}", .path.display())]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The CSV text is malformed.
    #[error("CSV parse error: {0}")]
    Csv(String),

    /// A CSV field could not be coerced to its column type.
    #[error("decode error: {0}")]
    Decode(String),

    /// A key column named in the request is absent from the table.
    #[error("column not found: {0}")]
    MissingColumn(String),

    /// The metadata declares a type outside the archive vocabulary.
    #[error("unknown remote type: {0}")]
    UnknownRemoteType(String),

    /// The metadata has no entry for a requested key.
    #[error("metadata has no column '{0}'")]
    MissingKeyMetadata(String),

    /// An Arrow error while assembling the table.
    #[error("arrow error: {0}")]
    Arrow(#[from] arrow_schema::ArrowError),
}

impl LookupError {
    /// Returns `true` if this is [`LookupError::MetadataUnavailable`].
    #[must_use]
    pub const fn is_metadata_unavailable(&self) -> bool {
        matches!(self, Self::MetadataUnavailable { .. })
    }

    pub(crate) fn metadata_unavailable(url: &str, reason: impl ToString) -> Self {
        Self::MetadataUnavailable {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}
