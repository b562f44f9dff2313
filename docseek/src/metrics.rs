use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// Tracks per-run extraction and failure counters.
///
/// Shared by reference (usually behind an `Arc`) between all workers; every
/// counter is an independent relaxed atomic so recording never blocks.
#[derive(Debug, Default)]
pub struct SearchMetrics {
    files_processed: AtomicU64,
    files_with_text: AtomicU64,
    bytes_extracted: AtomicU64,
    extraction_failures: AtomicU64,
    invalid_patterns: AtomicU64,
    worker_failures: AtomicU64,
}

impl SearchMetrics {
    /// Creates a new SearchMetrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a finished extraction and the size of the text it produced
    pub fn record_extraction(&self, text_len: usize) {
        self.files_processed.fetch_add(1, Ordering::Relaxed);
        if text_len > 0 {
            self.files_with_text.fetch_add(1, Ordering::Relaxed);
            self.bytes_extracted
                .fetch_add(text_len as u64, Ordering::Relaxed);
        }
    }

    pub fn record_extraction_failure(&self) {
        self.extraction_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_invalid_pattern(&self) {
        self.invalid_patterns.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_worker_failure(&self) {
        self.worker_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Gets a snapshot of the current counters
    pub fn get_stats(&self) -> SearchStats {
        SearchStats {
            files_processed: self.files_processed.load(Ordering::Relaxed),
            files_with_text: self.files_with_text.load(Ordering::Relaxed),
            bytes_extracted: self.bytes_extracted.load(Ordering::Relaxed),
            extraction_failures: self.extraction_failures.load(Ordering::Relaxed),
            invalid_patterns: self.invalid_patterns.load(Ordering::Relaxed),
            worker_failures: self.worker_failures.load(Ordering::Relaxed),
        }
    }

    /// Logs the current counters
    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Extraction stats:\n\
             Files processed: {}\n\
             Files with text: {}\n\
             Text extracted: {} bytes\n\
             Extraction failures: {}\n\
             Invalid patterns: {}\n\
             Worker failures: {}",
            stats.files_processed,
            stats.files_with_text,
            stats.bytes_extracted,
            stats.extraction_failures,
            stats.invalid_patterns,
            stats.worker_failures
        );
    }
}

/// Point-in-time copy of [`SearchMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub files_processed: u64,
    pub files_with_text: u64,
    pub bytes_extracted: u64,
    pub extraction_failures: u64,
    pub invalid_patterns: u64,
    pub worker_failures: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_extraction_tracking() {
        let metrics = SearchMetrics::new();

        metrics.record_extraction(120);
        metrics.record_extraction(0);
        metrics.record_extraction(30);

        let stats = metrics.get_stats();
        assert_eq!(stats.files_processed, 3);
        assert_eq!(stats.files_with_text, 2);
        assert_eq!(stats.bytes_extracted, 150);
    }

    #[test]
    fn test_failure_tracking() {
        let metrics = SearchMetrics::new();

        metrics.record_extraction_failure();
        metrics.record_invalid_pattern();
        metrics.record_invalid_pattern();
        metrics.record_worker_failure();

        let stats = metrics.get_stats();
        assert_eq!(stats.extraction_failures, 1);
        assert_eq!(stats.invalid_patterns, 2);
        assert_eq!(stats.worker_failures, 1);
    }

    #[test]
    fn test_concurrent_recording() {
        let metrics = Arc::new(SearchMetrics::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let metrics = Arc::clone(&metrics);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        metrics.record_extraction(1);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stats = metrics.get_stats();
        assert_eq!(stats.files_processed, 800);
        assert_eq!(stats.bytes_extracted, 800);
    }
}
