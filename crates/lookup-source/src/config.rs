//! Configuration for a [`LookupSource`](crate::LookupSource).

/// Root of the public lookup archive.
pub const DEFAULT_ROOT: &str = "http://wireservice.github.io/lookup";

/// Configuration for a lookup source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupSourceConfig {
    /// Archive root: an `http(s)://` URL, a `file://` URL or a local path.
    /// Default: [`DEFAULT_ROOT`].
    pub root: String,
    /// `User-Agent` header sent on HTTP fetches.
    pub user_agent: String,
}

impl Default for LookupSourceConfig {
    fn default() -> Self {
        Self {
            root: DEFAULT_ROOT.to_string(),
            user_agent: concat!("lookup-source/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
