//! Match records and the aggregation step that orders them.
use std::path::{Path, PathBuf};

/// One line of one file that matched one term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    file: PathBuf,
    line_number: usize,
    term: String,
    context: String,
}

impl MatchRecord {
    pub fn new(
        file: impl Into<PathBuf>,
        line_number: usize,
        term: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            line_number,
            term: term.into(),
            context: context.into(),
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    /// 1-based line number within the extracted text
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    /// The matched line with up to one neighbour on each side
    pub fn context(&self) -> &str {
        &self.context
    }
}

/// What a single scheduled file produced
#[derive(Debug)]
pub enum FileOutcome {
    /// The file was processed; `records` may be empty
    Matched {
        path: PathBuf,
        records: Vec<MatchRecord>,
    },
    /// The task for this file failed and contributed nothing
    Failed { path: PathBuf, diagnostic: String },
}

impl FileOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::Matched { path, .. } | Self::Failed { path, .. } => path,
        }
    }
}

/// The complete, ordered result of a search run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOutput {
    /// Records ordered by file path, then line number
    pub records: Vec<MatchRecord>,
    /// Total number of files searched
    pub files_searched: usize,
    /// Total number of files with at least one match
    pub files_with_matches: usize,
    /// Files whose task failed
    pub files_failed: usize,
}

impl SearchOutput {
    /// Creates a new empty search output
    pub fn new() -> Self {
        Default::default()
    }

    pub fn total_matches(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Merges per-file outcomes, in any arrival order, into one ordered output.
///
/// Records are sorted by the path string and then by line number. The sort
/// is stable, so records for the same line keep the order their terms were
/// given in.
pub fn aggregate<I>(outcomes: I) -> SearchOutput
where
    I: IntoIterator<Item = FileOutcome>,
{
    let mut output = SearchOutput::new();
    for outcome in outcomes {
        output.files_searched += 1;
        match outcome {
            FileOutcome::Matched { records, .. } => {
                if !records.is_empty() {
                    output.files_with_matches += 1;
                }
                output.records.extend(records);
            }
            FileOutcome::Failed { .. } => output.files_failed += 1,
        }
    }

    output.records.sort_by(|a, b| {
        a.file
            .to_string_lossy()
            .cmp(&b.file.to_string_lossy())
            .then(a.line_number.cmp(&b.line_number))
    });
    output
}
