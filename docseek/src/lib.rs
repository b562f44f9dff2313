pub mod config;
pub mod errors;
pub mod extract;
pub mod filters;
pub mod metrics;
pub mod results;
pub mod search;

pub use config::{CliOverrides, SearchConfig};
pub use errors::{SearchError, SearchResult};
pub use results::{FileOutcome, MatchRecord, SearchOutput};
pub use search::{search, SearchOptions, SearchOutcome};
