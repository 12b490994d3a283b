//! Archive path layout.
//!
//! A lookup archive stores every table under its key names:
//!
//! ```text
//! <root>/<key1>/.../<keyN>/<value>[.<version>].csv      data
//! <root>/<key1>/.../<keyN>/<value>[.<version>].csv.yml  metadata
//! ```
//!
//! A single key passed as a one-element slice is used verbatim, so a
//! pre-joined key path such as `"city/year"` resolves the same way.

/// Relative path of the CSV data table for `keys`, `value` and `version`.
///
/// An empty `version` is treated as absent.
pub fn build_table_path<S: AsRef<str>>(keys: &[S], value: &str, version: Option<&str>) -> String {
    let mut path = base_path(keys, value, version);
    path.push_str(".csv");
    path
}

/// Relative path of the YAML metadata descriptor for `keys`, `value` and
/// `version`.
pub fn build_metadata_path<S: AsRef<str>>(
    keys: &[S],
    value: &str,
    version: Option<&str>,
) -> String {
    let mut path = base_path(keys, value, version);
    path.push_str(".csv.yml");
    path
}

fn base_path<S: AsRef<str>>(keys: &[S], value: &str, version: Option<&str>) -> String {
    let joined = keys.iter().map(AsRef::as_ref).collect::<Vec<_>>().join("/");
    let mut path = format!("{joined}/{value}");
    if let Some(version) = version.filter(|v| !v.is_empty()) {
        path.push('.');
        path.push_str(version);
    }
    path
}
