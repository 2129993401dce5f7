//! Loading snapshots and resolving the element a command works on

use std::fs;
use std::path::Path;

use dom_snapshot::{Document, ElementRef};
use tracing::debug;

use crate::errors::{PickerError, PickerResult};

/// Parse the markup file at `path`
pub fn load_document(path: &Path) -> PickerResult<Document> {
    let markup = fs::read_to_string(path).map_err(|e| PickerError::io(path, e))?;
    let document = Document::parse_markup(&markup)?;
    debug!("loaded {} node(s) from {}", document.len(), path.display());
    Ok(document)
}

/// The one element `xpath` selects; zero or several matches are an error
pub fn resolve_target<'d>(document: &'d Document, xpath: &str) -> PickerResult<ElementRef<'d>> {
    let nodes = document.select(xpath)?;
    let [node] = nodes.as_slice() else {
        return Err(PickerError::AmbiguousTarget {
            xpath: xpath.to_string(),
            count: nodes.len(),
        });
    };
    document
        .element(*node)
        .ok_or_else(|| PickerError::NotAnElement {
            xpath: xpath.to_string(),
        })
}
