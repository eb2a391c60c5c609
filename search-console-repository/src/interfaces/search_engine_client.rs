//! Search engine client trait definition.
//!
//! This module defines the abstract interface for engine operations,
//! allowing for different backend implementations (Elasticsearch, OpenSearch,
//! in-memory).

use async_trait::async_trait;

use crate::errors::SearchError;
use search_console_shared::{Document, DocumentRef, IndexDescriptor, IndexDetails, SearchHit, SearchQuery};

/// Abstract interface for search engine operations.
///
/// Every method is a single round trip to the engine. Implementations report
/// failures as tagged `SearchError`s; turning them into neutral results is the
/// job of `SearchConsoleClient`.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across async tasks.
#[async_trait]
pub trait SearchEngineClient: Send + Sync {
    /// Run a full-text `match` query, optionally scoped to one index.
    ///
    /// Hits are returned in engine order.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>, SearchError>;

    /// Count all documents across the engine.
    async fn count(&self) -> Result<u64, SearchError>;

    /// Store a document under its (index, id), replacing any previous body.
    async fn put_document(&self, document: &Document) -> Result<(), SearchError>;

    /// Delete a document.
    ///
    /// A missing document is reported as an error; it is not treated as an
    /// already-successful delete.
    async fn delete_document(&self, reference: &DocumentRef) -> Result<(), SearchError>;

    /// Index names in the order the engine lists them.
    async fn list_indices(&self) -> Result<Vec<String>, SearchError>;

    /// Create an index with optional settings and mappings.
    ///
    /// Fails if the index already exists or the engine rejects the payload.
    async fn create_index(&self, descriptor: &IndexDescriptor) -> Result<(), SearchError>;

    /// Delete an index and all its documents.
    async fn delete_index(&self, name: &str) -> Result<(), SearchError>;

    /// Settings and mappings of one index.
    ///
    /// # Returns
    ///
    /// * `Ok(IndexDetails)` - The payload unwrapped from its envelope keyed by name
    /// * `Err(SearchError::NotFound)` - If the index does not exist
    /// * `Err(SearchError)` - If the request fails
    async fn get_index(&self, name: &str) -> Result<IndexDetails, SearchError>;
}
