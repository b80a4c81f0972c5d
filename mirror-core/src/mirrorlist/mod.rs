//! Mirror-list catalog.
//!
//! A mirror-list document is a pacman-style text file: a block of `##`
//! comment lines, one blank line, then per-region blocks of a `## Region`
//! heading followed by `#Server = <url>` lines. [`MirrorCatalog`] is the
//! parsed, read-only view of such a document.

mod parser;
mod writer;

pub use writer::{render_single, SINGLE_ENTRY_HEADER};

use crate::errors::LoadError;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// One server entry of a region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorServer {
    /// Host part of the URL, for compact display.
    pub display_url: String,
    /// URL exactly as written in the document.
    pub canonical_url: String,
}

impl MirrorServer {
    pub fn from_canonical(canonical_url: impl Into<String>) -> Self {
        let canonical_url = canonical_url.into();
        Self {
            display_url: shorten_url(&canonical_url),
            canonical_url,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorCatalog {
    region_names: Vec<String>,
    servers_by_region: HashMap<String, Vec<MirrorServer>>,
}

impl MirrorCatalog {
    /// Reads and parses the document at `path`.
    ///
    /// Only a failure to read the file is an error; unrecognised content
    /// yields a smaller (possibly empty) catalog.
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let bytes = fs::read(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&String::from_utf8_lossy(&bytes)))
    }

    pub fn parse(content: &str) -> Self {
        parser::parse(content)
    }

    /// Region names in document order. A region repeated in the document
    /// appears once per heading.
    pub fn region_names(&self) -> &[String] {
        &self.region_names
    }

    pub fn contains_region(&self, region: &str) -> bool {
        self.servers_by_region.contains_key(region)
    }

    pub fn servers(&self, region: &str) -> &[MirrorServer] {
        self.servers_by_region
            .get(region)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn server(&self, region: &str, index: usize) -> Option<&MirrorServer> {
        self.servers(region).get(index)
    }

    pub fn first_region(&self) -> Option<&str> {
        self.region_names.first().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.region_names.is_empty()
    }

    pub fn server_count(&self) -> usize {
        self.servers_by_region.values().map(Vec::len).sum()
    }

    pub(crate) fn open_region(&mut self, region: &str) {
        self.region_names.push(region.to_string());
        self.servers_by_region
            .entry(region.to_string())
            .or_default();
    }

    pub(crate) fn push_server(&mut self, region: &str, server: MirrorServer) {
        if let Some(servers) = self.servers_by_region.get_mut(region) {
            servers.push(server);
        }
    }
}

/// Strips an `https://` or `http://` scheme and everything from the first `/`
/// after it.
pub fn shorten_url(url: &str) -> String {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    match rest.find('/') {
        Some(pos) => rest[..pos].to_string(),
        None => rest.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;
    use tempfile::tempdir;

    #[test]
    fn shorten_url_strips_scheme_and_path() {
        assert_eq!(
            shorten_url("https://mirror.example.org/archlinux/$repo/os/$arch"),
            "mirror.example.org"
        );
        assert_eq!(
            shorten_url("http://ftp.example.de/pub/arch/$repo/os/$arch"),
            "ftp.example.de"
        );
    }

    #[test]
    fn shorten_url_keeps_unknown_scheme() {
        assert_eq!(
            shorten_url("rsync://mirror.example.org/arch"),
            "rsync:"
        );
        assert_eq!(shorten_url("mirror.example.org"), "mirror.example.org");
    }

    #[test]
    fn unknown_region_has_no_servers() {
        let catalog = MirrorCatalog::default();
        assert!(catalog.servers("Nowhere").is_empty());
        assert!(catalog.server("Nowhere", 0).is_none());
        assert!(catalog.first_region().is_none());
    }

    #[test]
    fn from_path_reports_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing-mirrorlist");
        let err = MirrorCatalog::from_path(&path).unwrap_err();
        let LoadError::Read { path: failed, source } = err;
        assert_eq!(failed, path);
        assert_eq!(source.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn from_path_tolerates_invalid_utf8() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mirrorlist");
        let mut bytes = b"## header\n\n## Caf".to_vec();
        bytes.push(0xe9);
        bytes.extend_from_slice(b"\n#Server = https://m.example.org/$repo\n");
        fs::write(&path, bytes).unwrap();

        let catalog = MirrorCatalog::from_path(&path).unwrap();
        assert_eq!(catalog.region_names().len(), 1);
        assert_eq!(catalog.server_count(), 1);
    }
}
