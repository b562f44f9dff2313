//! The extraction-and-search pipeline.
//!
//! [`engine`] discovers files and drives a run, [`scheduler`] fans files out
//! over a bounded worker pool, [`processor`] searches one file and
//! [`matcher`] compiles the terms.
pub mod engine;
pub mod matcher;
pub mod processor;
pub mod scheduler;

pub use engine::{
    discover_files, search, search_files, search_files_with, search_with_progress, SearchOutcome,
};
pub use matcher::{CompiledPattern, MatchStrategy, SearchOptions};
pub use processor::FileSearcher;
pub use scheduler::Scheduler;
