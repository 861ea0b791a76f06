//! Resource path conventions of the server.
//!
//! Paths are either version-rooted (`/v1/file/...`) or application-rooted
//! (`/<app>/v1/file/...`). Metadata for a resource lives under the
//! `properties` segment placed right after the version.

use crate::error::{Error, Result};

const SUPPORTED_VERSIONS: &[&str] = &["v1"];

fn segments(path: &str) -> Result<Vec<&str>> {
    if !path.starts_with('/') {
        return Err(Error::InvalidPath(path.to_string()));
    }
    let segs: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segs.is_empty() {
        return Err(Error::InvalidPath(path.to_string()));
    }
    Ok(segs)
}

/// Map a resource path to the path of its metadata record.
///
/// ```
/// use freight_transfer::core::properties_path;
///
/// assert_eq!(properties_path("/v1/file/a.txt").unwrap(), "/v1/properties/file/a.txt");
/// assert_eq!(
///     properties_path("/notes/v1/file/a.txt").unwrap(),
///     "/notes/v1/properties/file/a.txt"
/// );
/// ```
pub fn properties_path(path: &str) -> Result<String> {
    let segs = segments(path)?;

    // version-rooted paths insert after the first segment, app-rooted after the second
    let split = if SUPPORTED_VERSIONS.contains(&segs[0]) { 1 } else { 2 };
    if segs.len() < split {
        return Err(Error::InvalidPath(path.to_string()));
    }

    let mut out = String::with_capacity(path.len() + 12);
    for seg in &segs[..split] {
        out.push('/');
        out.push_str(seg);
    }
    out.push_str("/properties");
    for seg in &segs[split..] {
        out.push('/');
        out.push_str(seg);
    }
    Ok(out)
}

/// Containing directory of a resource path, without a trailing slash.
pub fn parent_path(path: &str) -> Result<String> {
    let segs = segments(path)?;
    let parent = &segs[..segs.len() - 1];
    if parent.is_empty() {
        return Ok("/".to_string());
    }
    Ok(parent.iter().fold(String::new(), |mut acc, s| {
        acc.push('/');
        acc.push_str(s);
        acc
    }))
}

/// Path of `name` inside directory `dir`.
///
/// `name` ends up in a part header, so line breaks are rejected along with
/// separators and dot segments.
pub fn join_path(dir: &str, name: &str) -> Result<String> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\r', '\n'])
    {
        return Err(Error::InvalidName(name.to_string()));
    }
    segments(dir)?;
    Ok(format!("{}/{}", dir.trim_end_matches('/'), name))
}
