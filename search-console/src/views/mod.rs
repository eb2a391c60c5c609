//! Per-screen view controllers.
//!
//! Every controller keeps its state behind an async mutex that is only held
//! while reading or writing state, never across a request to the engine.

mod indices;
mod quick_add;
mod search;
mod state;
mod upload;

#[cfg(test)]
pub(crate) mod testing;

pub use indices::{IndicesState, IndicesView};
pub use quick_add::{QuickAddForm, QuickAddView};
pub use search::{SearchState, SearchView};
pub use state::{LoadState, Notice, NoticeLevel, Slot, Ticket};
pub use upload::{UploadForm, UploadState, UploadView};
