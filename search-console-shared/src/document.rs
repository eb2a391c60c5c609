//! Document types.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Composite key of a document: the index it lives in and its identifier.
///
/// Uniqueness is enforced by the search engine, not by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentRef {
    /// Name of the index holding the document.
    pub index: String,
    /// Document identifier within the index.
    pub id: String,
}

impl DocumentRef {
    /// Create a reference to `id` in `index`.
    pub fn new(index: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.index, self.id)
    }
}

/// A document reference together with its JSON body.
///
/// The body is opaque: any JSON value is accepted and passed to the engine as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub reference: DocumentRef,
    pub body: Value,
}

impl Document {
    pub fn new(index: impl Into<String>, id: impl Into<String>, body: Value) -> Self {
        Self {
            reference: DocumentRef::new(index, id),
            body,
        }
    }

    pub fn index(&self) -> &str {
        &self.reference.index
    }

    pub fn id(&self) -> &str {
        &self.reference.id
    }
}
