use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, trace};

use super::matcher::{CompiledPattern, SearchOptions};
use crate::extract::ExtractorDispatch;
use crate::results::MatchRecord;

/// Searches the extracted text of one file at a time
#[derive(Debug, Default)]
pub struct FileSearcher {
    dispatch: ExtractorDispatch,
}

impl FileSearcher {
    /// Creates a new FileSearcher that extracts through `dispatch`
    pub fn new(dispatch: ExtractorDispatch) -> Self {
        Self { dispatch }
    }

    pub fn dispatch(&self) -> &ExtractorDispatch {
        &self.dispatch
    }

    /// Extracts `path` and matches every term against every line.
    ///
    /// Records come out grouped by term, in the order the terms were given,
    /// and in line order within a term. A term that fails to compile is
    /// skipped without affecting the others. Repeated terms are searched once.
    pub fn search(
        &self,
        path: &Path,
        terms: &[String],
        options: SearchOptions,
    ) -> Vec<MatchRecord> {
        trace!("Processing file: {}", path.display());

        let text = self.dispatch.extract(path);
        if text.is_empty() {
            return Vec::new();
        }
        let lines = split_lines(&text);

        let mut seen = HashSet::new();
        let mut records = Vec::new();
        for term in terms.iter().filter(|term| seen.insert(term.as_str())) {
            let pattern = match CompiledPattern::compile(term, options) {
                Ok(pattern) => pattern,
                Err(e) => {
                    debug!("Skipping term in {}: {}", path.display(), e);
                    continue;
                }
            };

            records.extend(
                lines
                    .iter()
                    .enumerate()
                    .filter(|(_, line)| pattern.is_match(line))
                    .map(|(i, _)| {
                        MatchRecord::new(path, i + 1, pattern.term(), build_context(&lines, i))
                    }),
            );
        }

        debug!("{} matches in {}", records.len(), path.display());
        records
    }
}

/// Splits text into lines on any line-boundary character.
///
/// `\r\n` counts as a single break and a trailing break does not produce an
/// empty final line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        lines.push(&text[start..i]);
        start = i + c.len_utf8();
        if c == '\r' {
            if let Some((j, '\n')) = chars.peek().copied() {
                chars.next();
                start = j + 1;
            }
        }
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Builds the context block for the line at `index`: the line itself plus at
/// most one neighbour on each side, each stripped, joined by newlines.
pub fn build_context(lines: &[&str], index: usize) -> String {
    let start = index.saturating_sub(1);
    let end = (index + 2).min(lines.len());
    lines[start..end]
        .iter()
        .map(|line| line.trim())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
