//! Index management screen.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use search_console_repository::types::parse_optional_object;
use search_console_repository::SearchConsoleClient;
use search_console_shared::{IndexDescriptor, IndexDetails, SearchHit};

use super::state::{LoadState, Notice, Slot};

#[derive(Debug, Clone, Default)]
pub struct IndicesState {
    pub list: Slot<Vec<String>>,
    /// Name of the last index created.
    pub create: Slot<String>,
    pub selected_name: Option<String>,
    pub selected: Slot<IndexDetails>,
    /// Search results scoped to the selected index.
    pub documents: Slot<Vec<SearchHit>>,
    pub notice: Option<Notice>,
}

pub struct IndicesView {
    client: Arc<SearchConsoleClient>,
    state: Mutex<IndicesState>,
}

impl IndicesView {
    pub fn new(client: Arc<SearchConsoleClient>) -> Self {
        Self {
            client,
            state: Mutex::new(IndicesState::default()),
        }
    }

    /// Reload the index list.
    pub async fn load(&self) -> bool {
        let ticket = self.state.lock().await.list.begin();
        let outcome = self.client.try_list_indices().await.map_err(|e| {
            warn!(error = %e, "Failed to list indices");
            e.to_string()
        });
        let ok = outcome.is_ok();
        self.state.lock().await.list.resolve(ticket, outcome);
        ok
    }

    /// Create an index from form text.
    ///
    /// A blank name is ignored. Settings and mappings text, when given, must be
    /// JSON objects; otherwise the create slot shows the parse error and no
    /// request is sent. On success the index list is reloaded.
    pub async fn create(
        &self,
        name: &str,
        settings_text: Option<&str>,
        mappings_text: Option<&str>,
    ) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }

        let parsed = parse_optional_object(settings_text, "settings").and_then(|settings| {
            parse_optional_object(mappings_text, "mappings").map(|mappings| (settings, mappings))
        });
        let (settings, mappings) = match parsed {
            Ok(parts) => parts,
            Err(e) => {
                self.state
                    .lock()
                    .await
                    .create
                    .set(LoadState::Error(e.to_string()));
                return false;
            }
        };

        let descriptor = IndexDescriptor {
            name: name.to_string(),
            settings,
            mappings,
        };

        let ticket = self.state.lock().await.create.begin();
        let result = self.client.try_create_index(&descriptor).await;
        let created = result.is_ok();
        let outcome = result.map(|_| descriptor.name.clone()).map_err(|e| {
            warn!(index = %descriptor.name, error = %e, "Failed to create index");
            e.to_string()
        });
        self.state.lock().await.create.resolve(ticket, outcome);

        if created {
            info!(index = %descriptor.name, "Index created");
            self.load().await;
        }
        created
    }

    /// Delete an index, clearing it from the selection, and reload the list.
    ///
    /// Callers are expected to have confirmed with the user.
    pub async fn delete(&self, name: &str) -> bool {
        let deleted = self.client.delete_index(name).await;

        {
            let mut state = self.state.lock().await;
            if deleted {
                if state.selected_name.as_deref() == Some(name) {
                    state.selected_name = None;
                    state.selected.reset();
                    state.documents.reset();
                }
                state.notice = Some(Notice::success(format!("Index {} deleted", name)));
            } else {
                state.notice = Some(Notice::error(format!("Failed to delete index {}", name)));
            }
        }

        if deleted {
            self.load().await;
        }
        deleted
    }

    /// Select an index and load its settings and mappings.
    pub async fn select(&self, name: &str) -> bool {
        let ticket = {
            let mut state = self.state.lock().await;
            state.selected_name = Some(name.to_string());
            state.documents.reset();
            state.notice = None;
            state.selected.begin()
        };

        let outcome = self.client.try_get_index_details(name).await.map_err(|e| {
            warn!(index = name, error = %e, "Failed to load index details");
            e.to_string()
        });
        let ok = outcome.is_ok();
        self.state.lock().await.selected.resolve(ticket, outcome);
        ok
    }

    /// Search the selected index. Fails when nothing is selected.
    pub async fn browse(&self, query: &str) -> bool {
        let ticket = {
            let mut state = self.state.lock().await;
            match state.selected_name.clone() {
                Some(name) => Some((name, state.documents.begin())),
                None => {
                    state.notice = Some(Notice::warning("Select an index first"));
                    None
                }
            }
        };
        let Some((index, ticket)) = ticket else {
            return false;
        };

        let outcome = self
            .client
            .try_search(query, Some(&index))
            .await
            .map_err(|e| e.to_string());
        let ok = outcome.is_ok();
        self.state.lock().await.documents.resolve(ticket, outcome);
        ok
    }

    pub async fn snapshot(&self) -> IndicesState {
        self.state.lock().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::testing::{client_over, memory_client, DelayedEngine};
    use crate::views::NoticeLevel;
    use serde_json::json;

    #[tokio::test]
    async fn test_load_lists_indices() {
        let (_, client) = memory_client();
        assert!(client.create_index("alpha", None, None).await);
        assert!(client.create_index("beta", None, None).await);
        let view = IndicesView::new(client);

        view.load().await;

        let state = view.snapshot().await;
        assert_eq!(
            state.list.state().value(),
            Some(&vec!["alpha".to_string(), "beta".to_string()])
        );
    }

    #[tokio::test]
    async fn test_load_failure() {
        let (engine, client) = memory_client();
        engine.set_unavailable(true);
        let view = IndicesView::new(client);

        view.load().await;
        assert!(view.snapshot().await.list.state().error().is_some());
    }

    #[tokio::test]
    async fn test_create_reloads_list() {
        let (_, client) = memory_client();
        let view = IndicesView::new(client);

        assert!(
            view.create("t1", Some(r#"{"number_of_shards": 1}"#), Some("  "))
                .await
        );

        let state = view.snapshot().await;
        assert_eq!(state.create.state().value(), Some(&"t1".to_string()));
        assert_eq!(state.list.state().value(), Some(&vec!["t1".to_string()]));

        view.select("t1").await;
        let state = view.snapshot().await;
        assert_eq!(state.selected.state().value().unwrap().number_of_shards(), Some(1));
    }

    #[tokio::test]
    async fn test_create_blank_name_is_ignored() {
        let (engine, client) = memory_client();
        let view = IndicesView::new(client);

        assert!(!view.create("   ", None, None).await);
        assert_eq!(*view.snapshot().await.create.state(), LoadState::Idle);
        assert_eq!(engine.request_count(), 0);
    }

    #[tokio::test]
    async fn test_create_with_malformed_settings_sends_nothing() {
        let (engine, client) = memory_client();
        let view = IndicesView::new(client);

        assert!(!view.create("t1", Some("{shards:"), None).await);
        assert!(!view.create("t1", None, Some("[]")).await);

        assert!(view.snapshot().await.create.state().error().is_some());
        assert_eq!(engine.request_count(), 0);
    }

    #[tokio::test]
    async fn test_create_existing_index_fails() {
        let (_, client) = memory_client();
        let view = IndicesView::new(client);

        assert!(view.create("t1", None, None).await);
        assert!(!view.create("t1", None, None).await);
        assert!(view.snapshot().await.create.state().error().is_some());
    }

    #[tokio::test]
    async fn test_delete_clears_matching_selection() {
        let (_, client) = memory_client();
        assert!(client.create_index("keep", None, None).await);
        assert!(client.create_index("drop", None, None).await);
        let view = IndicesView::new(client);

        view.select("drop").await;
        assert!(view.delete("drop").await);

        let state = view.snapshot().await;
        assert!(state.selected_name.is_none());
        assert_eq!(*state.selected.state(), LoadState::Idle);
        assert_eq!(state.list.state().value(), Some(&vec!["keep".to_string()]));
    }

    #[tokio::test]
    async fn test_delete_keeps_other_selection() {
        let (_, client) = memory_client();
        assert!(client.create_index("keep", None, None).await);
        assert!(client.create_index("drop", None, None).await);
        let view = IndicesView::new(client);

        view.select("keep").await;
        assert!(view.delete("drop").await);
        assert_eq!(view.snapshot().await.selected_name.as_deref(), Some("keep"));

        assert!(!view.delete("drop").await);
        let notice = view.snapshot().await.notice.unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn test_select_missing_index() {
        let (_, client) = memory_client();
        let view = IndicesView::new(client);

        view.select("nope").await;
        assert!(view.snapshot().await.selected.state().error().is_some());
    }

    #[tokio::test]
    async fn test_browse_selected_index() {
        let (_, client) = memory_client();
        assert!(client.upsert_document("a", "1", json!({"content": "shared word"})).await);
        assert!(client.upsert_document("b", "2", json!({"content": "shared word"})).await);
        let view = IndicesView::new(client);

        view.browse("shared").await;
        assert_eq!(
            view.snapshot().await.notice,
            Some(Notice::warning("Select an index first"))
        );

        view.select("b").await;
        view.browse("shared").await;

        let state = view.snapshot().await;
        let hits = state.documents.state().value().unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].index, "b");
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_details_do_not_override_newer_selection() {
        let engine = Arc::new(DelayedEngine::new().delay_index("slow", 100));
        let client = client_over(engine);
        assert!(client.create_index("slow", None, None).await);
        assert!(client.create_index("fast", Some(json!({"number_of_shards": 3})), None).await);
        let view = IndicesView::new(client);

        tokio::join!(view.select("slow"), view.select("fast"));

        let state = view.snapshot().await;
        assert_eq!(state.selected_name.as_deref(), Some("fast"));
        assert_eq!(state.selected.state().value().unwrap().number_of_shards(), Some(3));
    }
}
