use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::errors::{SearchError, SearchResult};

/// How search terms are interpreted.
///
/// Built once per run and shared read-only by every worker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    pub case_sensitive: bool,
    pub whole_word: bool,
    pub use_regex: bool,
}

/// Strategy a term was compiled with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    /// The term is a user-supplied regular expression
    Regex,
    /// The literal term, bounded by `\b` on both sides
    WholeWord,
    /// The literal term anywhere in the line
    Substring,
}

impl MatchStrategy {
    fn for_options(options: SearchOptions) -> Self {
        if options.use_regex {
            Self::Regex
        } else if options.whole_word {
            Self::WholeWord
        } else {
            Self::Substring
        }
    }
}

/// A single term compiled under a set of [`SearchOptions`]
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    term: String,
    strategy: MatchStrategy,
    regex: Regex,
}

impl CompiledPattern {
    /// Compiles `term`.
    ///
    /// Fails only in regex mode, when the term is not a valid expression.
    pub fn compile(term: &str, options: SearchOptions) -> SearchResult<Self> {
        let strategy = MatchStrategy::for_options(options);
        let source = match strategy {
            MatchStrategy::Regex => term.to_string(),
            MatchStrategy::WholeWord => format!(r"\b{}\b", regex::escape(term)),
            MatchStrategy::Substring => regex::escape(term),
        };

        let regex = RegexBuilder::new(&source)
            .case_insensitive(!options.case_sensitive)
            .build()
            .map_err(|e| SearchError::invalid_pattern(format!("{}: {}", term, e)))?;

        Ok(Self {
            term: term.to_string(),
            strategy,
            regex,
        })
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn strategy(&self) -> MatchStrategy {
        self.strategy
    }

    /// Returns true if the line holds at least one occurrence
    pub fn is_match(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }
}
