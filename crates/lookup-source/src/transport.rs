//! Fetching raw archive text.
//!
//! The transport is picked from the archive root's scheme:
//! `http://` and `https://` roots are read with a blocking HTTP GET,
//! `file://` roots and bare paths are read from the local filesystem.

use std::fmt;
use std::path::PathBuf;

use url::Url;

use crate::error::{LookupError, LookupResult};

/// How archive documents are retrieved.
pub enum Transport {
    /// Blocking HTTP client.
    Http(reqwest::blocking::Client),
    /// Local directory mirror of an archive.
    File,
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(_) => f.write_str("Transport::Http"),
            Self::File => f.write_str("Transport::File"),
        }
    }
}

impl Transport {
    /// Chooses a transport for `root`.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Fetch`] if the HTTP client cannot be built.
    pub fn for_root(root: &str, user_agent: &str) -> LookupResult<Self> {
        if is_http(root) {
            let client = reqwest::blocking::Client::builder()
                .user_agent(user_agent)
                .build()
                .map_err(|e| LookupError::Fetch {
                    url: root.to_string(),
                    message: format!("failed to create HTTP client: {e}"),
                })?;
            Ok(Self::Http(client))
        } else {
            Ok(Self::File)
        }
    }

    /// Fetches the document at `location` as text.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Fetch`] or [`LookupError::HttpStatus`] for
    /// HTTP failures and [`LookupError::Io`] for unreadable local files.
    pub fn fetch_text(&self, location: &str) -> LookupResult<String> {
        tracing::debug!(url = %location, "Fetching lookup document");
        match self {
            Self::Http(client) => {
                let response = client.get(location).send().map_err(|e| LookupError::Fetch {
                    url: location.to_string(),
                    message: e.to_string(),
                })?;
                let status = response.status();
                if !status.is_success() {
                    return Err(LookupError::HttpStatus {
                        url: location.to_string(),
                        status: status.as_u16(),
                    });
                }
                response.text().map_err(|e| LookupError::Fetch {
                    url: location.to_string(),
                    message: format!("read body: {e}"),
                })
            }
            Self::File => {
                let path = local_path(location);
                std::fs::read_to_string(&path).map_err(|source| LookupError::Io { path, source })
            }
        }
    }
}

fn is_http(root: &str) -> bool {
    let lower = root.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Resolves a `file://` URL or bare path to a filesystem path.
fn local_path(location: &str) -> PathBuf {
    if location.starts_with("file:") {
        if let Some(path) = Url::parse(location).ok().and_then(|u| u.to_file_path().ok()) {
            return path;
        }
    }
    PathBuf::from(location)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_selection() {
        let http = Transport::for_root("http://wireservice.github.io/lookup", "test").unwrap();
        assert!(matches!(http, Transport::Http(_)));
        let https = Transport::for_root("HTTPS://example.org/lookup", "test").unwrap();
        assert!(matches!(https, Transport::Http(_)));
        let file = Transport::for_root("/srv/lookup", "test").unwrap();
        assert!(matches!(file, Transport::File));
    }

    #[test]
    fn test_local_path_resolution() {
        assert_eq!(local_path("/srv/lookup/a.csv"), PathBuf::from("/srv/lookup/a.csv"));
        assert_eq!(
            local_path("file:///srv/lookup/a.csv"),
            PathBuf::from("/srv/lookup/a.csv")
        );
        assert_eq!(local_path("relative/a.csv"), PathBuf::from("relative/a.csv"));
    }

    #[test]
    fn test_file_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        std::fs::write(&path, "hello").unwrap();

        let transport = Transport::File;
        assert_eq!(transport.fetch_text(path.to_str().unwrap()).unwrap(), "hello");

        let missing = dir.path().join("missing.txt");
        let err = transport.fetch_text(missing.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, LookupError::Io { .. }));
    }
}
