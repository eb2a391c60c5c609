//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `SearchEngineClient`
//! using the OpenSearch Rust client, which speaks the Elasticsearch-compatible
//! REST API.

use async_trait::async_trait;
use opensearch::{
    cat::CatIndicesParts,
    http::headers::HeaderMap,
    http::request::JsonBody,
    http::response::Response,
    http::Method,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesDeleteParts, IndicesGetParts},
    CountParts, DeleteParts, OpenSearch, SearchParts,
};
use serde_json::Value;
use tracing::{debug, error, info, instrument};

use crate::config::EngineConfig;
use crate::errors::SearchError;
use crate::interfaces::SearchEngineClient;
use crate::opensearch::queries;
use search_console_shared::{Document, DocumentRef, IndexDescriptor, IndexDetails, SearchHit, SearchQuery};

/// OpenSearch client implementation.
///
/// Every operation is one request against the configured base URL. There is no
/// retry, no backoff and no request timeout.
///
/// # Example
///
/// ```ignore
/// let config = EngineConfig::new("http://localhost:9200/_search");
/// let client = OpenSearchClient::new(&config)?;
///
/// let hits = client.search(&SearchQuery::new("rust").with_index("docs")).await?;
/// ```
pub struct OpenSearchClient {
    client: OpenSearch,
    base_url: String,
}

impl OpenSearchClient {
    /// Create a new client for the engine at `config.base_url`.
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchClient)` - A new client instance
    /// * `Err(SearchError)` - If the URL is invalid or the transport cannot be built
    pub fn new(config: &EngineConfig) -> Result<Self, SearchError> {
        let parsed_url = config.url()?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(url = %config.base_url, "Created engine client");

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// The engine root this client sends requests to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Pass successful responses through; turn anything else into `Rejected`
    /// carrying the response text.
    async fn ensure_success(response: Response, operation: &str) -> Result<Response, SearchError> {
        let status = response.status_code();
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        error!(operation, status = %status, body = %error_body, "Engine request failed");
        Err(SearchError::rejected(status.as_u16(), error_body))
    }

    async fn read_json(response: Response) -> Result<Value, SearchError> {
        response
            .json::<Value>()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))
    }
}

#[async_trait]
impl SearchEngineClient for OpenSearchClient {
    #[instrument(skip(self, query), fields(index = ?query.index, field = %query.field))]
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>, SearchError> {
        let body = queries::build_match_query(&query.field, &query.query);

        let response = match query.index.as_deref() {
            Some(index) => {
                self.client
                    .search(SearchParts::Index(&[index]))
                    .body(body)
                    .send()
                    .await
            }
            None => self.client.search(SearchParts::None).body(body).send().await,
        }
        .map_err(|e| SearchError::connection(e.to_string()))?;

        let response = Self::ensure_success(response, "search").await?;
        let body = Self::read_json(response).await?;
        let hits = queries::parse_hits(&body);

        debug!(hit_count = hits.len(), "Search completed");
        Ok(hits)
    }

    #[instrument(skip(self))]
    async fn count(&self) -> Result<u64, SearchError> {
        let response = self
            .client
            .count(CountParts::None)
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let response = Self::ensure_success(response, "count").await?;
        let body = Self::read_json(response).await?;

        queries::parse_count(&body)
            .ok_or_else(|| SearchError::parse("Count response has no numeric 'count' field"))
    }

    #[instrument(skip(self, document), fields(doc = %document.reference))]
    async fn put_document(&self, document: &Document) -> Result<(), SearchError> {
        // The typed index API always POSTs; upserts by id are sent as PUT.
        let path = queries::document_path(document.index(), document.id())?;
        let response = self
            .client
            .send(
                Method::Put,
                &path,
                HeaderMap::new(),
                None::<&()>,
                Some(JsonBody::new(document.body.clone())),
                None,
            )
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        Self::ensure_success(response, "put_document").await?;

        debug!("Document stored");
        Ok(())
    }

    #[instrument(skip(self), fields(doc = %reference))]
    async fn delete_document(&self, reference: &DocumentRef) -> Result<(), SearchError> {
        let response = self
            .client
            .delete(DeleteParts::IndexId(&reference.index, &reference.id))
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        // 404 is a failure here: the caller asked for a document that is not there.
        Self::ensure_success(response, "delete_document").await?;

        debug!("Document deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_indices(&self) -> Result<Vec<String>, SearchError> {
        let response = self
            .client
            .cat()
            .indices(CatIndicesParts::None)
            .format("json")
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let response = Self::ensure_success(response, "list_indices").await?;
        let body = Self::read_json(response).await?;

        if !body.is_array() {
            return Err(SearchError::parse("Index catalog is not a JSON array"));
        }
        Ok(queries::parse_index_names(&body))
    }

    #[instrument(skip(self, descriptor), fields(index = %descriptor.name))]
    async fn create_index(&self, descriptor: &IndexDescriptor) -> Result<(), SearchError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(&descriptor.name))
            .body(queries::build_create_index_body(descriptor))
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        Self::ensure_success(response, "create_index").await?;

        info!("Index created");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_index(&self, name: &str) -> Result<(), SearchError> {
        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[name]))
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        Self::ensure_success(response, "delete_index").await?;

        info!("Index deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_index(&self, name: &str) -> Result<IndexDetails, SearchError> {
        let response = self
            .client
            .indices()
            .get(IndicesGetParts::Index(&[name]))
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        if response.status_code().as_u16() == 404 {
            let error_body = response.text().await.unwrap_or_default();
            error!(body = %error_body, "Index not found");
            return Err(SearchError::not_found(format!("index '{}'", name)));
        }

        let response = Self::ensure_success(response, "get_index").await?;
        let body = Self::read_json(response).await?;

        queries::unwrap_index_details(name, body)
            .ok_or_else(|| SearchError::not_found(format!("index '{}' missing from response", name)))
    }
}
