//! In-memory engine.
//!
//! Implements `SearchEngineClient` without a network, following the engine's
//! observable REST behaviour closely enough for the console: documents are
//! upserted, indices are created implicitly on first write, deleting missing
//! documents or indices is rejected, and `match` queries score documents by
//! the number of query terms found in the target field.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tokio::sync::RwLock;
use tracing::debug;

use crate::errors::SearchError;
use crate::interfaces::SearchEngineClient;
use search_console_shared::{
    Document, DocumentRef, IndexDescriptor, IndexDetails, SearchHit, SearchQuery,
};

#[derive(Debug, Clone, Default)]
struct StoredIndex {
    settings: Value,
    mappings: Value,
    /// Insertion order is kept so equal-score hits come back in write order.
    documents: Vec<(String, Value)>,
}

impl StoredIndex {
    fn from_descriptor(descriptor: &IndexDescriptor) -> Self {
        let settings = match descriptor.settings.clone() {
            Some(Value::Object(settings)) if settings.contains_key("index") => {
                Value::Object(settings)
            }
            Some(settings) => json!({ "index": settings }),
            None => json!({ "index": {} }),
        };

        Self {
            settings,
            mappings: descriptor.mappings.clone().unwrap_or_else(|| json!({})),
            documents: Vec::new(),
        }
    }

    fn upsert(&mut self, id: &str, body: Value) {
        match self.documents.iter_mut().find(|(doc_id, _)| doc_id == id) {
            Some((_, existing)) => *existing = body,
            None => self.documents.push((id.to_string(), body)),
        }
    }
}

/// Engine that keeps every index in process memory.
///
/// Besides the engine contract it counts requests and can simulate an
/// unreachable engine, which makes it the standard test double for the
/// console's operations and views.
#[derive(Debug, Default)]
pub struct InMemorySearchEngine {
    indices: RwLock<BTreeMap<String, StoredIndex>>,
    requests: AtomicUsize,
    unavailable: AtomicBool,
}

impl InMemorySearchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of requests received so far, including failed ones.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Make every subsequent request fail with a connection error (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Read a stored document body directly.
    pub async fn document(&self, reference: &DocumentRef) -> Option<Value> {
        let indices = self.indices.read().await;
        indices.get(&reference.index).and_then(|index| {
            index
                .documents
                .iter()
                .find(|(id, _)| *id == reference.id)
                .map(|(_, body)| body.clone())
        })
    }

    fn begin_request(&self) -> Result<(), SearchError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(SearchError::connection("engine unavailable"));
        }
        Ok(())
    }

    fn tokenize(text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
            .map(str::to_lowercase)
            .collect()
    }

    fn field_text(body: &Value, field: &str) -> Option<String> {
        match body.get(field)? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    fn score(terms: &[String], body: &Value, field: &str) -> usize {
        let Some(text) = Self::field_text(body, field) else {
            return 0;
        };
        let tokens = Self::tokenize(&text);
        terms.iter().filter(|term| tokens.contains(term)).count()
    }

    /// Index names follow the engine's rules: lowercase, non-empty, no
    /// whitespace or reserved characters, not starting with `-`, `_` or `+`.
    fn validate_index_name(name: &str) -> Result<(), SearchError> {
        const RESERVED: &[char] = &['\\', '/', '*', '?', '"', '<', '>', '|', ',', '#', ':'];

        let invalid = name.is_empty()
            || name == "."
            || name == ".."
            || name.starts_with(['-', '_', '+'])
            || name.chars().any(|c| c.is_uppercase() || c.is_whitespace() || RESERVED.contains(&c));

        if invalid {
            return Err(SearchError::rejected(
                400,
                format!("invalid_index_name_exception: [{}]", name),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl SearchEngineClient for InMemorySearchEngine {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>, SearchError> {
        self.begin_request()?;
        let indices = self.indices.read().await;

        let terms = Self::tokenize(&query.query);
        let targets: Vec<(&String, &StoredIndex)> = match query.index {
            Some(ref name) => {
                let index = indices.get(name).ok_or_else(|| {
                    SearchError::rejected(404, format!("index_not_found_exception: [{}]", name))
                })?;
                vec![(name, index)]
            }
            None => indices.iter().collect(),
        };

        let mut scored: Vec<(usize, SearchHit)> = Vec::new();
        for (name, index) in targets {
            for (id, body) in &index.documents {
                let score = Self::score(&terms, body, &query.field);
                if score > 0 {
                    scored.push((
                        score,
                        SearchHit {
                            index: name.clone(),
                            id: id.clone(),
                            score: Some(score as f64),
                            source: body.clone(),
                        },
                    ));
                }
            }
        }

        // Stable sort keeps index order then insertion order for ties.
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        debug!(hit_count = scored.len(), "In-memory search completed");
        Ok(scored.into_iter().map(|(_, hit)| hit).collect())
    }

    async fn count(&self) -> Result<u64, SearchError> {
        self.begin_request()?;
        let indices = self.indices.read().await;
        Ok(indices.values().map(|index| index.documents.len() as u64).sum())
    }

    async fn put_document(&self, document: &Document) -> Result<(), SearchError> {
        self.begin_request()?;
        Self::validate_index_name(document.index())?;

        let mut indices = self.indices.write().await;
        indices
            .entry(document.index().to_string())
            .or_insert_with(|| StoredIndex::from_descriptor(&IndexDescriptor::new(document.index())))
            .upsert(document.id(), document.body.clone());
        Ok(())
    }

    async fn delete_document(&self, reference: &DocumentRef) -> Result<(), SearchError> {
        self.begin_request()?;
        let mut indices = self.indices.write().await;

        let index = indices.get_mut(&reference.index).ok_or_else(|| {
            SearchError::rejected(404, format!("index_not_found_exception: [{}]", reference.index))
        })?;
        let position = index
            .documents
            .iter()
            .position(|(id, _)| *id == reference.id)
            .ok_or_else(|| SearchError::rejected(404, r#"{"result":"not_found"}"#))?;

        index.documents.remove(position);
        Ok(())
    }

    async fn list_indices(&self) -> Result<Vec<String>, SearchError> {
        self.begin_request()?;
        let indices = self.indices.read().await;
        Ok(indices.keys().cloned().collect())
    }

    async fn create_index(&self, descriptor: &IndexDescriptor) -> Result<(), SearchError> {
        self.begin_request()?;
        Self::validate_index_name(&descriptor.name)?;

        for (part, value) in [("settings", &descriptor.settings), ("mappings", &descriptor.mappings)] {
            if matches!(value, Some(v) if !v.is_object()) {
                return Err(SearchError::rejected(
                    400,
                    format!("parse_exception: [{}] must be an object", part),
                ));
            }
        }

        let mut indices = self.indices.write().await;
        if indices.contains_key(&descriptor.name) {
            return Err(SearchError::rejected(
                400,
                format!("resource_already_exists_exception: [{}]", descriptor.name),
            ));
        }

        indices.insert(descriptor.name.clone(), StoredIndex::from_descriptor(descriptor));
        Ok(())
    }

    async fn delete_index(&self, name: &str) -> Result<(), SearchError> {
        self.begin_request()?;
        let mut indices = self.indices.write().await;

        indices
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| SearchError::rejected(404, format!("index_not_found_exception: [{}]", name)))
    }

    async fn get_index(&self, name: &str) -> Result<IndexDetails, SearchError> {
        self.begin_request()?;
        let indices = self.indices.read().await;

        let index = indices
            .get(name)
            .ok_or_else(|| SearchError::not_found(format!("index '{}'", name)))?;

        let mut details = Map::new();
        details.insert("aliases".to_string(), json!({}));
        details.insert("mappings".to_string(), index.mappings.clone());
        details.insert("settings".to_string(), index.settings.clone());
        Ok(IndexDetails::new(Value::Object(details)))
    }
}
