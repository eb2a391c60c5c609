//! Search query and hit types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::DocumentRef;

/// Field targeted by full-text queries unless configured otherwise.
pub const DEFAULT_SEARCH_FIELD: &str = "content";

/// A free-text query against a single full-text field.
///
/// The query text is passed to the engine unmodified, including the empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// The free-text query.
    pub query: String,
    /// Restrict the search to one index. `None` searches every index.
    pub index: Option<String>,
    /// Field the `match` query runs against.
    pub field: String,
}

impl SearchQuery {
    /// Create a query across all indices on the default field.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            index: None,
            field: DEFAULT_SEARCH_FIELD.to_string(),
        }
    }

    /// Scope the query to a single index.
    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    /// Scope the query to an optional index.
    pub fn with_optional_index(mut self, index: Option<impl Into<String>>) -> Self {
        self.index = index.map(Into::into);
        self
    }

    /// Run the query against `field` instead of the default.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }
}

/// One matched document as returned by the engine.
///
/// Hits keep the engine's ordering; the score is opaque and may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
    #[serde(rename = "_source", default)]
    pub source: Value,
}

impl SearchHit {
    /// The (index, id) key of the hit.
    pub fn reference(&self) -> DocumentRef {
        DocumentRef::new(&self.index, &self.id)
    }
}
