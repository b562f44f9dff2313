use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::errors::{SearchError, SearchResult};
use crate::filters::{normalize_extensions, DEFAULT_EXTENSIONS};
use crate::search::SearchOptions;

/// Configuration for a document search run.
///
/// # Configuration Locations
///
/// Values are read from these files, later ones overriding earlier ones:
/// 1. Global `$CONFIG_DIR/docseek/config.yaml`
/// 2. Local `.docseek.yaml` in the current directory
/// 3. Custom config file passed with `--config`
///
/// Command-line values are applied on top with [`SearchConfig::merge_with_cli`].
///
/// # Configuration Format
///
/// ```yaml
/// # Terms to search for
/// terms: ["invoice", "due date"]
///
/// # Root directory to search in
/// root_path: "."
///
/// # Document extensions to include
/// extensions: ["doc", "docx", "pdf"]
///
/// # Paths to skip (glob syntax)
/// ignore_patterns:
///   - "**/drafts/*"
///
/// case_sensitive: false
/// whole_word: true
/// use_regex: false
///
/// # Worker count (default: CPU cores)
/// thread_count: 4
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "warn"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchConfig {
    /// Terms to search for, in reporting order
    #[serde(default)]
    pub terms: Vec<String>,

    /// Root directory to start search from
    #[serde(default = "default_root_path")]
    pub root_path: PathBuf,

    /// Extensions of the documents to search
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Patterns to ignore (supports glob syntax)
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    #[serde(default)]
    pub case_sensitive: bool,

    #[serde(default)]
    pub whole_word: bool,

    /// Interpret terms as regular expressions
    #[serde(default)]
    pub use_regex: bool,

    /// Number of files searched concurrently.
    /// Defaults to number of CPU cores if not specified
    #[serde(default = "default_thread_count")]
    pub thread_count: NonZeroUsize,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Write the report here instead of standard output
    #[serde(default)]
    pub output: Option<PathBuf>,
}

/// Values given on the command line. `None` and empty fields leave the
/// configured value untouched; flags can only switch an option on.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub terms: Vec<String>,
    pub root_path: Option<PathBuf>,
    pub extensions: Option<Vec<String>>,
    pub ignore_patterns: Vec<String>,
    pub case_sensitive: bool,
    pub whole_word: bool,
    pub use_regex: bool,
    pub thread_count: Option<NonZeroUsize>,
    pub log_level: Option<String>,
    pub output: Option<PathBuf>,
}

fn default_root_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}

pub fn default_thread_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN)
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            terms: Vec::new(),
            root_path: default_root_path(),
            extensions: default_extensions(),
            ignore_patterns: Vec::new(),
            case_sensitive: false,
            whole_word: false,
            use_regex: false,
            thread_count: default_thread_count(),
            log_level: default_log_level(),
            output: None,
        }
    }
}

impl SearchConfig {
    /// Creates a config with default settings for the given root and terms
    pub fn new(root_path: impl Into<PathBuf>, terms: Vec<String>) -> Self {
        Self {
            root_path: root_path.into(),
            terms,
            ..Default::default()
        }
    }

    /// Loads configuration from the default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads configuration, adding `config_path` as the highest-priority file.
    ///
    /// The default locations are optional; an explicit path must exist.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        let defaults = [
            dirs::config_dir().map(|p| p.join("docseek/config.yaml")),
            Some(PathBuf::from(".docseek.yaml")),
        ];
        for path in defaults.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }
        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder.build()?.try_deserialize()
    }

    /// Merges CLI arguments with configuration file values
    pub fn merge_with_cli(mut self, cli: CliOverrides) -> Self {
        if !cli.terms.is_empty() {
            self.terms = cli.terms;
        }
        if let Some(root) = cli.root_path {
            self.root_path = root;
        }
        if let Some(extensions) = cli.extensions {
            self.extensions = extensions;
        }
        if !cli.ignore_patterns.is_empty() {
            self.ignore_patterns = cli.ignore_patterns;
        }
        self.case_sensitive |= cli.case_sensitive;
        self.whole_word |= cli.whole_word;
        self.use_regex |= cli.use_regex;
        if let Some(threads) = cli.thread_count {
            self.thread_count = threads;
        }
        if let Some(level) = cli.log_level {
            self.log_level = level;
        }
        if cli.output.is_some() {
            self.output = cli.output;
        }
        self
    }

    /// The matching options shared by every worker
    pub fn options(&self) -> SearchOptions {
        SearchOptions {
            case_sensitive: self.case_sensitive,
            whole_word: self.whole_word,
            use_regex: self.use_regex,
        }
    }

    /// Extensions without leading dots, lower-cased
    pub fn normalized_extensions(&self) -> Vec<String> {
        normalize_extensions(&self.extensions)
    }

    /// Rejects configurations that cannot produce a meaningful search
    pub fn validate(&self) -> SearchResult<()> {
        if self.terms.is_empty() {
            return Err(SearchError::config_error("no search terms given"));
        }
        if self.terms.iter().any(|t| t.is_empty()) {
            return Err(SearchError::config_error("search terms must not be empty"));
        }
        if self.whole_word && self.use_regex {
            return Err(SearchError::config_error(
                "whole-word matching cannot be combined with regex terms; add \\b to the expression instead",
            ));
        }
        if self.normalized_extensions().is_empty() {
            return Err(SearchError::config_error("no file extensions given"));
        }
        Ok(())
    }
}
