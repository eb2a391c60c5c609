//! Search console client implementation.
//!
//! This module provides the operation boundary the console's views call. Every
//! operation comes in two forms:
//!
//! - `try_*` returns `Result<T, SearchError>` so the caller can show why it failed.
//! - the plain form never fails: errors are logged and replaced by a neutral
//!   value (empty list, `0`, `false`, `None`).

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error};

use crate::config::EngineConfig;
use crate::errors::SearchError;
use crate::interfaces::SearchEngineClient;
use crate::opensearch::OpenSearchClient;
use crate::types::require;
use search_console_shared::{
    Document, DocumentRef, IndexDescriptor, IndexDetails, SearchHit, SearchQuery,
};

/// The client the console uses to query and mutate documents and indices.
#[derive(Clone)]
pub struct SearchConsoleClient {
    engine: Arc<dyn SearchEngineClient>,
    config: EngineConfig,
}

impl SearchConsoleClient {
    /// Create a client over any engine implementation.
    pub fn new(engine: Arc<dyn SearchEngineClient>, config: EngineConfig) -> Self {
        Self { engine, config }
    }

    /// Create a client talking HTTP to the engine at `config.base_url`.
    pub fn connect(config: EngineConfig) -> Result<Self, SearchError> {
        let engine = OpenSearchClient::new(&config)?;
        Ok(Self::new(Arc::new(engine), config))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Log a failed operation and substitute its neutral value.
    fn neutral<T>(operation: &str, result: Result<T, SearchError>, fallback: T) -> T {
        match result {
            Ok(value) => value,
            Err(e) => {
                error!(operation, error = %e, "Operation failed");
                fallback
            }
        }
    }

    /// Search `index` (or every index) for `query` on the configured field.
    ///
    /// Hits come back in engine order. The query text is passed through as is.
    pub async fn try_search(
        &self,
        query: &str,
        index: Option<&str>,
    ) -> Result<Vec<SearchHit>, SearchError> {
        let query = SearchQuery::new(query)
            .with_optional_index(index)
            .with_field(&self.config.search_field);
        self.engine.search(&query).await
    }

    /// Total number of documents in the engine.
    pub async fn try_count(&self) -> Result<u64, SearchError> {
        self.engine.count().await
    }

    /// Store `body` at `index/_doc/id`, replacing any previous body.
    ///
    /// Blank index or id values are rejected before any request is sent.
    pub async fn try_upsert_document(
        &self,
        index: &str,
        id: &str,
        body: Value,
    ) -> Result<(), SearchError> {
        require(index, "index")?;
        require(id, "id")?;

        let document = Document::new(index, id, body);
        self.engine.put_document(&document).await?;

        debug!(doc = %document.reference, "Document upserted");
        Ok(())
    }

    /// Store `body` under `id` in the configured default index.
    pub async fn try_upsert_document_default_index(
        &self,
        id: &str,
        body: Value,
    ) -> Result<(), SearchError> {
        self.try_upsert_document(&self.config.default_index, id, body)
            .await
    }

    /// Delete `index/_doc/id`. A missing document is an error.
    pub async fn try_delete_document(&self, index: &str, id: &str) -> Result<(), SearchError> {
        require(index, "index")?;
        require(id, "id")?;

        self.engine
            .delete_document(&DocumentRef::new(index, id))
            .await
    }

    /// Index names in engine order.
    pub async fn try_list_indices(&self) -> Result<Vec<String>, SearchError> {
        self.engine.list_indices().await
    }

    /// Create an index. Fails if it already exists or the payload is rejected.
    pub async fn try_create_index(&self, descriptor: &IndexDescriptor) -> Result<(), SearchError> {
        require(&descriptor.name, "index name")?;
        self.engine.create_index(descriptor).await
    }

    /// Delete an index. Irreversible; confirmation belongs to the caller.
    pub async fn try_delete_index(&self, name: &str) -> Result<(), SearchError> {
        require(name, "index name")?;
        self.engine.delete_index(name).await
    }

    /// Settings and mappings of `name`.
    pub async fn try_get_index_details(&self, name: &str) -> Result<IndexDetails, SearchError> {
        require(name, "index name")?;
        self.engine.get_index(name).await
    }

    /// Search; empty on any failure.
    pub async fn search(&self, query: &str, index: Option<&str>) -> Vec<SearchHit> {
        Self::neutral("search", self.try_search(query, index).await, Vec::new())
    }

    /// Document count; `0` on any failure.
    pub async fn count(&self) -> u64 {
        Self::neutral("count", self.try_count().await, 0)
    }

    /// Upsert a document; `false` on any failure.
    pub async fn upsert_document(&self, index: &str, id: &str, body: Value) -> bool {
        Self::neutral(
            "upsert_document",
            self.try_upsert_document(index, id, body).await.map(|_| true),
            false,
        )
    }

    /// Upsert into the default index; `false` on any failure.
    pub async fn upsert_document_default_index(&self, id: &str, body: Value) -> bool {
        Self::neutral(
            "upsert_document_default_index",
            self.try_upsert_document_default_index(id, body)
                .await
                .map(|_| true),
            false,
        )
    }

    /// Delete a document; `false` on any failure, including a missing document.
    pub async fn delete_document(&self, index: &str, id: &str) -> bool {
        Self::neutral(
            "delete_document",
            self.try_delete_document(index, id).await.map(|_| true),
            false,
        )
    }

    /// Index names; empty on any failure.
    pub async fn list_indices(&self) -> Vec<String> {
        Self::neutral("list_indices", self.try_list_indices().await, Vec::new())
    }

    /// Create an index with optional settings and mappings; `false` on any failure.
    pub async fn create_index(
        &self,
        name: &str,
        settings: Option<Value>,
        mappings: Option<Value>,
    ) -> bool {
        let descriptor = IndexDescriptor {
            name: name.to_string(),
            settings,
            mappings,
        };
        Self::neutral(
            "create_index",
            self.try_create_index(&descriptor).await.map(|_| true),
            false,
        )
    }

    /// Delete an index; `false` on any failure.
    pub async fn delete_index(&self, name: &str) -> bool {
        Self::neutral(
            "delete_index",
            self.try_delete_index(name).await.map(|_| true),
            false,
        )
    }

    /// Index details; `None` if the index is missing or the call fails.
    pub async fn get_index_details(&self, name: &str) -> Option<IndexDetails> {
        Self::neutral(
            "get_index_details",
            self.try_get_index_details(name).await.map(Some),
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemorySearchEngine;
    use crate::types::parse_document_body;
    use serde_json::json;
    use uuid::Uuid;

    fn setup(search_field: &str) -> (Arc<InMemorySearchEngine>, SearchConsoleClient) {
        let engine = Arc::new(InMemorySearchEngine::new());
        let config = EngineConfig::new("http://localhost:9200/_search")
            .with_default_index("notes")
            .with_search_field(search_field);
        let client = SearchConsoleClient::new(engine.clone(), config);
        (engine, client)
    }

    fn unique_index() -> String {
        format!("idx-{}", Uuid::new_v4())
    }

    #[tokio::test]
    async fn test_upsert_then_search_returns_last_body() {
        let (_, client) = setup("title");

        assert!(client.upsert_document("docs", "1", json!({"title": "a"})).await);

        let hits = client.search("a", None).await;
        let hit = hits.iter().find(|h| h.id == "1").unwrap();
        assert_eq!(hit.index, "docs");
        assert_eq!(hit.source, json!({"title": "a"}));

        assert!(client.upsert_document("docs", "1", json!({"title": "a b"})).await);
        let hits = client.search("a", Some("docs")).await;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].source, json!({"title": "a b"}));
    }

    #[tokio::test]
    async fn test_upsert_default_index() {
        let (engine, client) = setup("content");

        assert!(
            client
                .upsert_document_default_index("7", json!({"content": "hello"}))
                .await
        );
        assert_eq!(
            engine.document(&DocumentRef::new("notes", "7")).await,
            Some(json!({"content": "hello"}))
        );
    }

    #[tokio::test]
    async fn test_upsert_requires_index_and_id() {
        let (engine, client) = setup("content");

        assert_eq!(
            client.try_upsert_document("", "1", json!({})).await,
            Err(SearchError::validation("index is required"))
        );
        assert!(!client.upsert_document("docs", " ", json!({})).await);
        assert_eq!(engine.request_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_never_created_document_fails() {
        let (_, client) = setup("content");
        let index = unique_index();
        assert!(client.create_index(&index, None, None).await);

        assert!(!client.delete_document(&index, "ghost").await);
    }

    #[tokio::test]
    async fn test_delete_document() {
        let (_, client) = setup("content");
        assert!(client.upsert_document("docs", "1", json!({"content": "x"})).await);

        assert!(client.delete_document("docs", "1").await);
        assert_eq!(client.count().await, 0);
        assert!(!client.delete_document("docs", "1").await);
    }

    #[tokio::test]
    async fn test_create_existing_index_fails() {
        let (_, client) = setup("content");
        let index = unique_index();

        assert!(client.create_index(&index, None, None).await);
        assert!(!client.create_index(&index, None, None).await);
    }

    #[tokio::test]
    async fn test_delete_index_then_list() {
        let (_, client) = setup("content");
        assert!(client.create_index("keep", None, None).await);
        assert!(client.create_index("drop", None, None).await);

        assert!(client.delete_index("drop").await);

        let indices = client.list_indices().await;
        assert!(indices.contains(&"keep".to_string()));
        assert!(!indices.contains(&"drop".to_string()));
        assert!(!client.delete_index("drop").await);
    }

    #[tokio::test]
    async fn test_count_after_distinct_upserts() {
        let (_, client) = setup("content");
        let pairs = [("a", "1"), ("a", "2"), ("b", "1"), ("c", "9")];

        for (n, (index, id)) in pairs.iter().enumerate() {
            assert!(client.upsert_document(index, id, json!({"n": n})).await);
            assert_eq!(client.count().await, n as u64 + 1);
        }
    }

    #[tokio::test]
    async fn test_index_details_report_shard_count() {
        let (_, client) = setup("content");

        assert!(
            client
                .create_index("t1", Some(json!({"number_of_shards": 1})), None)
                .await
        );

        let details = client.get_index_details("t1").await.unwrap();
        assert_eq!(details.number_of_shards(), Some(1));
        assert!(client.get_index_details("t2").await.is_none());
    }

    #[tokio::test]
    async fn test_malformed_json_rejected_before_request() {
        let (engine, _) = setup("content");

        let result = parse_document_body("{title:");

        assert!(matches!(result, Err(SearchError::InvalidDocument(_))));
        assert_eq!(engine.request_count(), 0);
    }

    #[tokio::test]
    async fn test_unavailable_engine_yields_neutral_values() {
        let (engine, client) = setup("content");
        engine.set_unavailable(true);

        assert!(client.search("x", None).await.is_empty());
        assert_eq!(client.count().await, 0);
        assert!(!client.upsert_document("docs", "1", json!({})).await);
        assert!(!client.delete_document("docs", "1").await);
        assert!(client.list_indices().await.is_empty());
        assert!(!client.create_index("t1", None, None).await);
        assert!(!client.delete_index("t1").await);
        assert!(client.get_index_details("t1").await.is_none());

        assert!(matches!(
            client.try_count().await,
            Err(SearchError::ConnectionError(_))
        ));
    }

    #[tokio::test]
    async fn test_connect_builds_http_client() {
        let config = EngineConfig::new("http://localhost:9200/_search");
        let client = SearchConsoleClient::connect(config).unwrap();
        assert_eq!(client.config().base_url, "http://localhost:9200");

        assert!(SearchConsoleClient::connect(EngineConfig::new("nope")).is_err());
    }
}
