use lopdf::Document;
use std::path::Path;
use tracing::debug;

use super::Extractor;
use crate::errors::{SearchError, SearchResult};

/// Reads every page of a PDF in page order
#[derive(Debug, Clone, Copy, Default)]
pub struct PagedDocumentExtractor;

impl Extractor for PagedDocumentExtractor {
    fn name(&self) -> &'static str {
        "paged-document"
    }

    fn extract(&self, path: &Path) -> SearchResult<String> {
        let doc = Document::load(path).map_err(|e| SearchError::extraction_failure(path, e))?;

        let pages = doc.get_pages().into_keys().map(|number| {
            doc.extract_text(&[number])
                .map_err(|e| debug!("No text on page {} of {}: {}", number, path.display(), e))
                .ok()
        });

        Ok(join_pages(pages))
    }
}

/// Concatenates page texts, terminating each page with a newline.
///
/// A page without text still contributes its newline so page boundaries
/// stay visible as blank lines.
pub fn join_pages<I>(pages: I) -> String
where
    I: IntoIterator<Item = Option<String>>,
{
    let mut text = String::new();
    for page in pages {
        if let Some(page_text) = page {
            text.push_str(&page_text);
        }
        text.push('\n');
    }
    text
}
