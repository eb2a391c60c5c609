//! Search screen: full-text results, document count and delete-from-results.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use search_console_repository::SearchConsoleClient;
use search_console_shared::{DocumentRef, SearchHit};

use super::state::{Notice, Slot};

/// Everything the search screen shows.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub last_query: Option<String>,
    pub last_index: Option<String>,
    pub results: Slot<Vec<SearchHit>>,
    pub count: Slot<u64>,
    /// Hit currently being deleted, if any.
    pub deleting: Option<DocumentRef>,
    pub notice: Option<Notice>,
}

pub struct SearchView {
    client: Arc<SearchConsoleClient>,
    state: Mutex<SearchState>,
}

impl SearchView {
    pub fn new(client: Arc<SearchConsoleClient>) -> Self {
        Self {
            client,
            state: Mutex::new(SearchState::default()),
        }
    }

    /// Run `query`, optionally scoped to `index`, and remember it for `refresh`.
    ///
    /// Returns whether the engine answered.
    pub async fn search(&self, query: &str, index: Option<&str>) -> bool {
        let ticket = {
            let mut state = self.state.lock().await;
            state.last_query = Some(query.to_string());
            state.last_index = index.map(str::to_string);
            state.results.begin()
        };

        let outcome = self.client.try_search(query, index).await.map_err(|e| {
            warn!(query, error = %e, "Search failed");
            e.to_string()
        });

        let ok = outcome.is_ok();
        self.state.lock().await.results.resolve(ticket, outcome);
        ok
    }

    /// Re-run the last query. Does nothing before the first search.
    pub async fn refresh(&self) -> bool {
        let last = {
            let state = self.state.lock().await;
            state
                .last_query
                .clone()
                .map(|query| (query, state.last_index.clone()))
        };

        match last {
            Some((query, index)) => self.search(&query, index.as_deref()).await,
            None => true,
        }
    }

    /// Reload the total document count.
    pub async fn refresh_count(&self) -> bool {
        let ticket = self.state.lock().await.count.begin();
        let outcome = self.client.try_count().await.map_err(|e| {
            warn!(error = %e, "Count failed");
            e.to_string()
        });
        let ok = outcome.is_ok();
        self.state.lock().await.count.resolve(ticket, outcome);
        ok
    }

    /// Delete a hit and, on success, refresh the results and the count.
    pub async fn delete_hit(&self, index: &str, id: &str) -> bool {
        let reference = DocumentRef::new(index, id);
        {
            let mut state = self.state.lock().await;
            state.deleting = Some(reference.clone());
            state.notice = None;
        }

        let deleted = self.client.delete_document(index, id).await;

        {
            let mut state = self.state.lock().await;
            if state.deleting.as_ref() == Some(&reference) {
                state.deleting = None;
            }
            state.notice = Some(if deleted {
                Notice::success(format!("Deleted {}", reference))
            } else {
                Notice::error("Failed to delete document")
            });
        }

        if deleted {
            info!(doc = %reference, "Document deleted from results");
            self.refresh().await;
            self.refresh_count().await;
        }
        deleted
    }

    /// Copy of the current state for rendering.
    pub async fn snapshot(&self) -> SearchState {
        self.state.lock().await.clone()
    }
}
