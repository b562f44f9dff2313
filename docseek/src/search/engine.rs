use ignore::WalkBuilder;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use super::matcher::{CompiledPattern, SearchOptions};
use super::processor::FileSearcher;
use super::scheduler::Scheduler;
use crate::config::SearchConfig;
use crate::errors::{SearchError, SearchResult};
use crate::extract::ExtractorDispatch;
use crate::filters::should_include_file;
use crate::metrics::SearchMetrics;
use crate::results::{aggregate, FileOutcome, SearchOutput};

/// How a search run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Nothing under the root matched the extension filters
    NoCandidateFiles {
        root: PathBuf,
        extensions: Vec<String>,
    },
    /// The candidate files were searched
    Completed(SearchOutput),
}

/// Discovers documents under the configured root and searches them
pub fn search(config: &SearchConfig) -> SearchResult<SearchOutcome> {
    search_with_progress(config, |_| {})
}

/// Like [`search`], calling `on_complete` once per finished file
pub fn search_with_progress<C>(
    config: &SearchConfig,
    on_complete: C,
) -> SearchResult<SearchOutcome>
where
    C: FnMut(&FileOutcome),
{
    config.validate()?;
    info!(
        "Starting search for {:?} in {}",
        config.terms,
        config.root_path.display()
    );

    let files = discover_files(config)?;
    if files.is_empty() {
        info!("No candidate files under {}", config.root_path.display());
        return Ok(SearchOutcome::NoCandidateFiles {
            root: config.root_path.clone(),
            extensions: config.normalized_extensions(),
        });
    }

    let output = search_files(
        &files,
        &config.terms,
        config.options(),
        config.thread_count,
        on_complete,
    )?;
    Ok(SearchOutcome::Completed(output))
}

/// Recursively lists the files under the root that pass the extension and
/// ignore filters, sorted by path
pub fn discover_files(config: &SearchConfig) -> SearchResult<Vec<PathBuf>> {
    let root = &config.root_path;
    if !root.exists() {
        return Err(SearchError::file_not_found(root));
    }
    if !root.is_dir() {
        return Err(SearchError::config_error(format!(
            "{} is not a directory",
            root.display()
        )));
    }

    let extensions = config.normalized_extensions();
    let mut walker = WalkBuilder::new(root);
    // Documents are searched wherever they are, including hidden and git-ignored paths
    walker.standard_filters(false).follow_links(false);

    let mut files: Vec<PathBuf> = walker
        .build()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        // Links to documents count; links to directories are not descended
        .filter(|entry| entry.path().is_file())
        .filter(|entry| should_include_file(entry.path(), &extensions, &config.ignore_patterns))
        .map(|entry| entry.into_path())
        .collect();
    files.sort_unstable();

    debug!("Found {} files to process", files.len());
    Ok(files)
}

/// Searches an explicit list of files with the built-in extractors
pub fn search_files<C>(
    files: &[PathBuf],
    terms: &[String],
    options: SearchOptions,
    jobs: NonZeroUsize,
    on_complete: C,
) -> SearchResult<SearchOutput>
where
    C: FnMut(&FileOutcome),
{
    let searcher = FileSearcher::new(ExtractorDispatch::new());
    search_files_with(&searcher, files, terms, options, jobs, on_complete)
}

/// Searches an explicit list of files with a caller-supplied searcher
pub fn search_files_with<C>(
    searcher: &FileSearcher,
    files: &[PathBuf],
    terms: &[String],
    options: SearchOptions,
    jobs: NonZeroUsize,
    mut on_complete: C,
) -> SearchResult<SearchOutput>
where
    C: FnMut(&FileOutcome),
{
    let metrics = searcher.dispatch().metrics();
    let terms = usable_terms(terms, options, metrics);
    let scheduler = Scheduler::new(jobs)?;

    let outcomes = scheduler.run(
        files,
        |path| searcher.search(path, &terms, options),
        |outcome| {
            if matches!(outcome, FileOutcome::Failed { .. }) {
                metrics.record_worker_failure();
            }
            on_complete(outcome);
        },
    );
    let output = aggregate(outcomes);

    metrics.log_stats();
    info!(
        "Search complete. Found {} matches in {} of {} files",
        output.total_matches(),
        output.files_with_matches,
        output.files_searched
    );
    Ok(output)
}

/// Drops terms that cannot compile, reporting each one once for the whole run
fn usable_terms(terms: &[String], options: SearchOptions, metrics: &SearchMetrics) -> Vec<String> {
    terms
        .iter()
        .filter(|term| match CompiledPattern::compile(term, options) {
            Ok(_) => true,
            Err(e) => {
                warn!("Skipping term: {}", e);
                metrics.record_invalid_pattern();
                false
            }
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{DocumentKind, Extractor};
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    struct FileContents;

    impl Extractor for FileContents {
        fn name(&self) -> &'static str {
            "raw"
        }

        fn extract(&self, path: &Path) -> SearchResult<String> {
            fs::read_to_string(path).map_err(|e| SearchError::from_io(path, e))
        }
    }

    fn raw_searcher() -> FileSearcher {
        FileSearcher::new(
            ExtractorDispatch::new().with_extractor(DocumentKind::Pdf, Box::new(FileContents)),
        )
    }

    #[test]
    fn test_discover_files_filters_and_sorts() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sub/drafts")).unwrap();
        for name in ["b.pdf", "a.DOCX", "sub/c.doc", "sub/drafts/d.pdf", "notes.txt"] {
            fs::write(dir.path().join(name), "x").unwrap();
        }
        let elsewhere = tempdir().unwrap();
        fs::write(elsewhere.path().join("real.pdf"), "x").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::symlink;
            symlink(elsewhere.path().join("real.pdf"), dir.path().join("sub/link.pdf")).unwrap();
            symlink(elsewhere.path(), dir.path().join("linked_dir")).unwrap();
        }

        let config = SearchConfig {
            ignore_patterns: vec!["**/drafts/*".to_string()],
            ..SearchConfig::new(dir.path(), vec!["x".to_string()])
        };
        let files = discover_files(&config).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();

        let mut expected = vec![
            PathBuf::from("a.DOCX"),
            PathBuf::from("b.pdf"),
            PathBuf::from("sub/c.doc"),
        ];
        if cfg!(unix) {
            expected.push(PathBuf::from("sub/link.pdf"));
        }
        assert_eq!(names, expected);
    }

    #[test]
    fn test_discover_files_missing_root() {
        let config = SearchConfig::new("/definitely/not/here", vec!["x".to_string()]);
        assert!(matches!(
            discover_files(&config),
            Err(SearchError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_no_candidate_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "hello").unwrap();

        let config = SearchConfig::new(dir.path(), vec!["hello".to_string()]);
        let outcome = search(&config).unwrap();
        assert_eq!(
            outcome,
            SearchOutcome::NoCandidateFiles {
                root: dir.path().to_path_buf(),
                extensions: vec!["doc".to_string(), "docx".to_string(), "pdf".to_string()],
            }
        );
    }

    #[test]
    fn test_invalid_config_is_rejected_before_walking() {
        let config = SearchConfig {
            whole_word: true,
            use_regex: true,
            ..SearchConfig::new("/definitely/not/here", vec!["x".to_string()])
        };
        assert!(matches!(search(&config), Err(SearchError::ConfigError(_))));
    }

    #[test]
    fn test_search_files_with_skips_invalid_terms_once() {
        let dir = tempdir().unwrap();
        let files: Vec<PathBuf> = (0..3)
            .map(|i| {
                let path = dir.path().join(format!("{}.pdf", i));
                fs::write(&path, "order 17\nnothing").unwrap();
                path
            })
            .collect();

        let searcher = raw_searcher();
        let options = SearchOptions {
            use_regex: true,
            ..Default::default()
        };
        let terms = vec!["[oops".to_string(), r"order \d+".to_string()];
        let output = search_files_with(
            &searcher,
            &files,
            &terms,
            options,
            NonZeroUsize::new(2).unwrap(),
            |_| {},
        )
        .unwrap();

        assert_eq!(output.total_matches(), 3);
        assert!(output.records.iter().all(|r| r.term() == r"order \d+"));
        assert_eq!(searcher.dispatch().metrics().get_stats().invalid_patterns, 1);
    }

    #[test]
    fn test_search_files_with_counts_progress() {
        let dir = tempdir().unwrap();
        let files: Vec<PathBuf> = (0..4)
            .map(|i| {
                let path = dir.path().join(format!("{}.pdf", i));
                fs::write(&path, "alpha").unwrap();
                path
            })
            .collect();

        let mut completed = 0;
        let output = search_files_with(
            &raw_searcher(),
            &files,
            &["alpha".to_string()],
            SearchOptions::default(),
            NonZeroUsize::new(3).unwrap(),
            |_| completed += 1,
        )
        .unwrap();

        assert_eq!(completed, 4);
        assert_eq!(output.files_searched, 4);
        assert_eq!(output.files_with_matches, 4);
    }
}
