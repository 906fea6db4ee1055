//! Fragment sources
//!
//! Text extraction from PDFs happens outside this crate. A source turns the
//! output of that step into a `FragmentDocument` that the extractor reads
//! from memory.
//!
//! ```text
//! PDF → [external text extractor] → JSON / positioned XHTML
//!     → [FragmentSource] → FragmentDocument → TableExtractor
//! ```

pub mod json;
pub mod xhtml;

pub use json::JsonFragmentSource;
pub use xhtml::XhtmlFragmentSource;

use crate::types::FragmentDocument;
use anyhow::{anyhow, Result};
use std::path::Path;

/// Converts a serialized fragment dump into a `FragmentDocument`
pub trait FragmentSource {
    fn read_document(&self, bytes: &[u8]) -> Result<FragmentDocument>;

    fn read_file(&self, path: &Path) -> Result<FragmentDocument> {
        let bytes = std::fs::read(path)
            .map_err(|e| anyhow!("Failed to read {}: {}", path.display(), e))?;
        self.read_document(&bytes)
    }

    /// Source name for logging
    fn name(&self) -> &str;

    fn supports_file_type(&self, path: &Path) -> bool;
}

/// Pick a source by file extension
pub fn source_for_path(path: &Path) -> Result<Box<dyn FragmentSource>> {
    let candidates: Vec<Box<dyn FragmentSource>> = vec![
        Box::new(JsonFragmentSource),
        Box::new(XhtmlFragmentSource),
    ];
    candidates
        .into_iter()
        .find(|source| source.supports_file_type(path))
        .ok_or_else(|| {
            anyhow!(
                "No fragment source for {} (expected .json, .xhtml or .html)",
                path.display()
            )
        })
}

pub(crate) fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_for_path_by_extension() {
        assert_eq!(source_for_path(Path::new("log.json")).unwrap().name(), "json");
        assert_eq!(source_for_path(Path::new("log.XHTML")).unwrap().name(), "xhtml");
        assert_eq!(source_for_path(Path::new("log.html")).unwrap().name(), "xhtml");
        assert!(source_for_path(Path::new("log.pdf")).is_err());
        assert!(source_for_path(Path::new("no_extension")).is_err());
    }
}
