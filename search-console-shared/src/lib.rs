//! # Search Console Shared
//!
//! Data types shared between the search console's repository layer and the
//! console application: document references, documents, search hits and
//! index descriptors.

mod document;
mod index;
mod search;

pub use document::{Document, DocumentRef};
pub use index::{IndexDescriptor, IndexDetails};
pub use search::{SearchHit, SearchQuery, DEFAULT_SEARCH_FIELD};
