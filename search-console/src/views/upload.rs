//! Document upload form.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use search_console_repository::types::parse_document_body;
use search_console_repository::SearchConsoleClient;
use search_console_shared::DocumentRef;

use super::state::{Notice, Slot};

pub const FIELDS_REQUIRED: &str = "All fields are required";
pub const INVALID_JSON: &str = "Invalid JSON format. Please check your content.";
pub const UPLOADED: &str = "Document uploaded successfully!";
pub const UPLOAD_FAILED: &str = "Upload failed. Please try again.";

/// Text typed into the upload form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadForm {
    pub index: String,
    pub id: String,
    pub content: String,
}

impl UploadForm {
    pub fn new(
        index: impl Into<String>,
        id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            index: index.into(),
            id: id.into(),
            content: content.into(),
        }
    }

    fn is_complete(&self) -> bool {
        [&self.index, &self.id, &self.content]
            .iter()
            .all(|field| !field.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default)]
pub struct UploadState {
    pub form: UploadForm,
    pub submission: Slot<DocumentRef>,
    pub notice: Option<Notice>,
}

pub struct UploadView {
    client: Arc<SearchConsoleClient>,
    state: Mutex<UploadState>,
}

impl UploadView {
    pub fn new(client: Arc<SearchConsoleClient>) -> Self {
        Self {
            client,
            state: Mutex::new(UploadState::default()),
        }
    }

    /// Replace the form contents.
    pub async fn fill(&self, form: UploadForm) {
        self.state.lock().await.form = form;
    }

    /// Validate and upload the current form.
    ///
    /// Missing fields and malformed JSON are reported without contacting the
    /// engine. A successful upload clears the form; a failed one keeps it so
    /// the user can retry.
    pub async fn submit(&self) -> bool {
        let form = self.state.lock().await.form.clone();

        if !form.is_complete() {
            self.state.lock().await.notice = Some(Notice::warning(FIELDS_REQUIRED));
            return false;
        }

        let body = match parse_document_body(&form.content) {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "Rejected upload with malformed JSON");
                self.state.lock().await.notice = Some(Notice::error(INVALID_JSON));
                return false;
            }
        };

        let ticket = {
            let mut state = self.state.lock().await;
            state.notice = None;
            state.submission.begin()
        };

        let reference = DocumentRef::new(form.index.as_str(), form.id.as_str());
        let result = self
            .client
            .try_upsert_document(&reference.index, &reference.id, body)
            .await;
        let uploaded = result.is_ok();

        let mut state = self.state.lock().await;
        let current = state.submission.is_current(ticket);
        state
            .submission
            .resolve(ticket, result.map(|_| reference.clone()).map_err(|e| e.to_string()));
        if !current {
            return uploaded;
        }

        if uploaded {
            info!(doc = %reference, "Document uploaded");
            state.notice = Some(Notice::success(UPLOADED));
            if state.form == form {
                state.form = UploadForm::default();
            }
        } else {
            state.notice = Some(Notice::error(UPLOAD_FAILED));
        }
        uploaded
    }

    pub async fn snapshot(&self) -> UploadState {
        self.state.lock().await.clone()
    }
}
