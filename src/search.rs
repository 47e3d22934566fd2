pub mod coordinator;
pub mod matcher;
pub mod results;

pub use coordinator::{SearchCoordinator, DEFAULT_ERROR_BUDGET, DEFAULT_SEARCH_WIDTH};
pub use matcher::{LineMatcher, SearchOptions};
pub use results::{LineMatch, SearchOutcome, SearchResults};
