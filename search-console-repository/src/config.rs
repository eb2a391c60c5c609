//! Configuration types for the engine transport.

use search_console_shared::DEFAULT_SEARCH_FIELD;
use url::Url;

use crate::errors::SearchError;

/// Index used by the default-index upsert when none is configured.
pub const DEFAULT_INDEX: &str = "documents";

/// Suffix stripped from the configured URL so root operations target the engine root.
const SEARCH_SUFFIX: &str = "/_search";

/// Configuration for the engine transport, constructed once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Engine API root without a trailing slash or `/_search` suffix.
    pub base_url: String,
    /// Index targeted by `upsert_document_default_index`.
    pub default_index: String,
    /// Field full-text searches run against.
    pub search_field: String,
}

impl EngineConfig {
    /// Create a config for the engine at `base_url` with default index and field.
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            base_url: Self::normalize_base_url(base_url.as_ref()),
            default_index: DEFAULT_INDEX.to_string(),
            search_field: DEFAULT_SEARCH_FIELD.to_string(),
        }
    }

    /// Use `index` for the default-index upsert. Blank names keep the default.
    pub fn with_default_index(mut self, index: impl Into<String>) -> Self {
        let index = index.into();
        if !index.trim().is_empty() {
            self.default_index = index.trim().to_string();
        }
        self
    }

    /// Run full-text searches against `field`. Blank names keep the default.
    pub fn with_search_field(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        if !field.trim().is_empty() {
            self.search_field = field.trim().to_string();
        }
        self
    }

    /// Strip surrounding whitespace, trailing slashes and a trailing `/_search`.
    pub fn normalize_base_url(raw: &str) -> String {
        let trimmed = raw.trim().trim_end_matches('/');
        trimmed
            .strip_suffix(SEARCH_SUFFIX)
            .unwrap_or(trimmed)
            .trim_end_matches('/')
            .to_string()
    }

    /// Parse the base URL.
    pub fn url(&self) -> Result<Url, SearchError> {
        Url::parse(&self.base_url).map_err(|e| {
            SearchError::connection(format!("Invalid engine URL '{}': {}", self.base_url, e))
        })
    }
}
