use super::{has_extension, FragmentSource};
use crate::types::{Fragment, FragmentDocument};
use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;

/// Reads fragment dumps in JSON.
///
/// Two shapes are accepted: a full document (`{"pages": [...]}`) or a flat
/// array of fragments, each carrying its `page`.
pub struct JsonFragmentSource;

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonInput {
    Document(FragmentDocument),
    Flat(Vec<Fragment>),
}

impl FragmentSource for JsonFragmentSource {
    fn read_document(&self, bytes: &[u8]) -> Result<FragmentDocument> {
        let input: JsonInput = serde_json::from_slice(bytes)
            .map_err(|e| anyhow!("Failed to parse fragment JSON: {}", e))?;
        let document = match input {
            JsonInput::Document(document) => FragmentDocument::new(document.pages),
            JsonInput::Flat(fragments) => FragmentDocument::from_fragments(fragments),
        };

        log::info!(
            "✅ Loaded {} fragments across {} pages",
            document.fragment_count(),
            document.page_count()
        );
        Ok(document)
    }

    fn name(&self) -> &str {
        "json"
    }

    fn supports_file_type(&self, path: &Path) -> bool {
        has_extension(path, &["json"])
    }
}
