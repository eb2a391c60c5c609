//! Test doubles for view controllers.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use search_console_repository::{
    EngineConfig, InMemorySearchEngine, SearchConsoleClient, SearchEngineClient, SearchError,
};
use search_console_shared::{
    Document, DocumentRef, IndexDescriptor, IndexDetails, SearchHit, SearchQuery,
};

/// In-memory engine whose search and details responses take a scripted time.
#[derive(Default)]
pub struct DelayedEngine {
    pub inner: InMemorySearchEngine,
    search_delays: HashMap<String, Duration>,
    index_delays: HashMap<String, Duration>,
}

impl DelayedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Searches for `query` take `millis` before answering.
    pub fn delay_search(mut self, query: &str, millis: u64) -> Self {
        self.search_delays
            .insert(query.to_string(), Duration::from_millis(millis));
        self
    }

    /// Details for `index` take `millis` before answering.
    pub fn delay_index(mut self, index: &str, millis: u64) -> Self {
        self.index_delays
            .insert(index.to_string(), Duration::from_millis(millis));
        self
    }
}

#[async_trait]
impl SearchEngineClient for DelayedEngine {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>, SearchError> {
        if let Some(delay) = self.search_delays.get(&query.query) {
            sleep(*delay).await;
        }
        self.inner.search(query).await
    }

    async fn count(&self) -> Result<u64, SearchError> {
        self.inner.count().await
    }

    async fn put_document(&self, document: &Document) -> Result<(), SearchError> {
        self.inner.put_document(document).await
    }

    async fn delete_document(&self, reference: &DocumentRef) -> Result<(), SearchError> {
        self.inner.delete_document(reference).await
    }

    async fn list_indices(&self) -> Result<Vec<String>, SearchError> {
        self.inner.list_indices().await
    }

    async fn create_index(&self, descriptor: &IndexDescriptor) -> Result<(), SearchError> {
        self.inner.create_index(descriptor).await
    }

    async fn delete_index(&self, name: &str) -> Result<(), SearchError> {
        self.inner.delete_index(name).await
    }

    async fn get_index(&self, name: &str) -> Result<IndexDetails, SearchError> {
        if let Some(delay) = self.index_delays.get(name) {
            sleep(*delay).await;
        }
        self.inner.get_index(name).await
    }
}

/// Client over `engine` with default index `notes` and search field `content`.
pub fn client_over(engine: Arc<dyn SearchEngineClient>) -> Arc<SearchConsoleClient> {
    let config = EngineConfig::new("http://localhost:9200").with_default_index("notes");
    Arc::new(SearchConsoleClient::new(engine, config))
}

/// A client over a fresh in-memory engine, plus the engine for inspection.
pub fn memory_client() -> (Arc<InMemorySearchEngine>, Arc<SearchConsoleClient>) {
    let engine = Arc::new(InMemorySearchEngine::new());
    let client = client_over(engine.clone());
    (engine, client)
}
