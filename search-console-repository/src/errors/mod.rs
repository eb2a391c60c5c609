//! Error types for the search console repository.

mod search_error;

pub use search_error::SearchError;
