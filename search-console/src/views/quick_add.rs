//! Quick-add form on the search screen: id plus free text, stored in the
//! default index.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use search_console_repository::types::document_body_or_wrap;
use search_console_repository::SearchConsoleClient;

use super::state::Notice;

pub const ID_AND_CONTENT_REQUIRED: &str = "ID and content required";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuickAddForm {
    pub id: String,
    pub content: String,
}

impl QuickAddForm {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
        }
    }
}

pub struct QuickAddView {
    client: Arc<SearchConsoleClient>,
    form: Mutex<QuickAddForm>,
    notice: Mutex<Option<Notice>>,
}

impl QuickAddView {
    pub fn new(client: Arc<SearchConsoleClient>) -> Self {
        Self {
            client,
            form: Mutex::new(QuickAddForm::default()),
            notice: Mutex::new(None),
        }
    }

    pub async fn fill(&self, form: QuickAddForm) {
        *self.form.lock().await = form;
    }

    /// Store the form in the default index.
    ///
    /// Content that is not JSON is stored as `{"content": <text>}`.
    pub async fn submit(&self) -> bool {
        let form = self.form.lock().await.clone();
        if form.id.trim().is_empty() || form.content.trim().is_empty() {
            *self.notice.lock().await = Some(Notice::warning(ID_AND_CONTENT_REQUIRED));
            return false;
        }

        let body = document_body_or_wrap(&form.content);
        let added = self
            .client
            .upsert_document_default_index(&form.id, body)
            .await;

        let index = &self.client.config().default_index;
        *self.notice.lock().await = Some(if added {
            info!(index = %index, id = %form.id, "Document added");
            Notice::success(format!("Document {} saved to {}", form.id, index))
        } else {
            Notice::error(format!("Failed to save document to {}", index))
        });

        if added {
            let mut current = self.form.lock().await;
            if *current == form {
                *current = QuickAddForm::default();
            }
        }
        added
    }

    pub async fn form(&self) -> QuickAddForm {
        self.form.lock().await.clone()
    }

    pub async fn clear_notice(&self) {
        *self.notice.lock().await = None;
    }

    pub async fn notice(&self) -> Option<Notice> {
        self.notice.lock().await.clone()
    }
}
