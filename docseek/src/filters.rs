//! File filtering for document discovery.
//!
//! Plain functions rather than a trait: discovery only ever needs one
//! extension filter and one set of ignore globs.
use glob::Pattern;
use std::path::Path;

/// Extensions searched when none are configured
pub const DEFAULT_EXTENSIONS: &[&str] = &["doc", "docx", "pdf"];

/// Lower-cases extensions and strips a leading dot, dropping empty entries
pub fn normalize_extensions<S: AsRef<str>>(extensions: &[S]) -> Vec<String> {
    extensions
        .iter()
        .map(|e| e.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Checks if a file's extension is one of `extensions`, ignoring case
pub fn has_valid_extension<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            extensions
                .iter()
                .any(|e| e.as_ref().trim_start_matches('.').eq_ignore_ascii_case(ext))
        })
}

/// Checks if a file should be ignored based on ignore patterns
pub fn should_ignore(path: &Path, ignore_patterns: &[String]) -> bool {
    let path_str = path.to_string_lossy().replace('\\', "/");

    // Version control metadata never holds documents worth searching
    if path_str.contains("/.git/") || path_str.starts_with(".git/") {
        return true;
    }

    ignore_patterns.iter().any(|pattern| {
        Pattern::new(pattern)
            .map(|p| p.matches(&path_str))
            .unwrap_or(false)
    })
}

/// Determines if a discovered file should be searched
pub fn should_include_file<S: AsRef<str>>(
    path: &Path,
    extensions: &[S],
    ignore_patterns: &[String],
) -> bool {
    has_valid_extension(path, extensions) && !should_ignore(path, ignore_patterns)
}
