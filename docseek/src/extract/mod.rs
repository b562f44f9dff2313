//! Text extraction for the supported document formats.
//!
//! Every format sits behind the [`Extractor`] trait. [`ExtractorDispatch`]
//! picks a strategy from the file-name suffix and turns every failure into an
//! empty string, so the rest of the pipeline only ever sees plain text.
mod doc;
mod docx;
mod pdf;

pub use doc::{decode_word_stream, LossyHeuristicExtractor};
pub use docx::ZippedXmlExtractor;
pub use pdf::{join_pages, PagedDocumentExtractor};

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{trace, warn};

use crate::errors::SearchResult;
use crate::metrics::SearchMetrics;

/// Document formats with an extraction strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// Zipped word-processor XML (`.docx`)
    WordXml,
    /// Legacy binary word-processor file (`.doc`)
    WordBinary,
    /// Page-based document (`.pdf`)
    Pdf,
}

impl DocumentKind {
    /// Resolves the kind from the file-name suffix, ignoring case
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("docx") {
            Some(Self::WordXml)
        } else if ext.eq_ignore_ascii_case("doc") {
            Some(Self::WordBinary)
        } else if ext.eq_ignore_ascii_case("pdf") {
            Some(Self::Pdf)
        } else {
            None
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::WordXml => "docx",
            Self::WordBinary => "doc",
            Self::Pdf => "pdf",
        }
    }
}

/// A strategy that pulls plain text out of one document format
pub trait Extractor: Send + Sync {
    /// Short name used in diagnostics
    fn name(&self) -> &'static str;

    /// Extracts the text of `path`.
    ///
    /// Implementations return `Ok(String::new())` when the file is not
    /// something they can read, and `Err` for everything that went wrong
    /// while reading something they should have been able to.
    fn extract(&self, path: &Path) -> SearchResult<String>;
}

/// Maps files to their extractor and never fails upward
pub struct ExtractorDispatch {
    extractors: HashMap<DocumentKind, Box<dyn Extractor>>,
    metrics: Arc<SearchMetrics>,
}

impl ExtractorDispatch {
    /// Creates a dispatcher with the built-in strategies
    pub fn new() -> Self {
        Self::with_metrics(Arc::new(SearchMetrics::new()))
    }

    /// Creates a dispatcher that records into the given metrics
    pub fn with_metrics(metrics: Arc<SearchMetrics>) -> Self {
        let mut extractors: HashMap<DocumentKind, Box<dyn Extractor>> = HashMap::new();
        extractors.insert(DocumentKind::WordXml, Box::new(ZippedXmlExtractor));
        extractors.insert(DocumentKind::WordBinary, Box::new(LossyHeuristicExtractor));
        extractors.insert(DocumentKind::Pdf, Box::new(PagedDocumentExtractor));
        Self {
            extractors,
            metrics,
        }
    }

    /// Replaces the strategy used for `kind`
    pub fn with_extractor(mut self, kind: DocumentKind, extractor: Box<dyn Extractor>) -> Self {
        self.extractors.insert(kind, extractor);
        self
    }

    pub fn metrics(&self) -> &Arc<SearchMetrics> {
        &self.metrics
    }

    /// Extracts the text of `path`, or an empty string if that is not possible
    pub fn extract(&self, path: &Path) -> String {
        let Some(extractor) = DocumentKind::from_path(path).and_then(|k| self.extractors.get(&k))
        else {
            trace!("No extractor for {}", path.display());
            return String::new();
        };

        trace!("Extracting {} with {}", path.display(), extractor.name());
        match extractor.extract(path) {
            Ok(text) => {
                self.metrics.record_extraction(text.len());
                text
            }
            Err(e) => {
                warn!("Error extracting text from {}: {}", path.display(), e);
                self.metrics.record_extraction_failure();
                String::new()
            }
        }
    }
}

impl Default for ExtractorDispatch {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ExtractorDispatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self
            .extractors
            .iter()
            .map(|(kind, e)| (kind.extension(), e.name()))
            .collect();
        names.sort_unstable();
        f.debug_struct("ExtractorDispatch")
            .field("extractors", &names)
            .finish()
    }
}
