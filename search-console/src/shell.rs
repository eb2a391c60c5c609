//! Navigation shell.
//!
//! The shell owns one controller per tab, tracks the active tab and turns
//! command lines into controller actions.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use search_console_repository::SearchConsoleClient;

use crate::views::{IndicesView, QuickAddForm, QuickAddView, SearchView, UploadForm, UploadView};
use crate::ConsoleError;

/// Top-level screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Search,
    Indices,
    Upload,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Search, Tab::Indices, Tab::Upload];

    /// Parse a tab name; anything unrecognised falls back to `Search`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "indices" | "index" => Tab::Indices,
            "upload" => Tab::Upload,
            _ => Tab::Search,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Search => "Search",
            Tab::Indices => "Indices",
            Tab::Upload => "Upload",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A parsed shell command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Empty,
    Tab(Tab),
    Search {
        query: String,
        index: Option<String>,
    },
    Refresh,
    Count,
    DeleteHit {
        index: String,
        id: String,
    },
    ListIndices,
    CreateIndex {
        name: String,
        settings: Option<String>,
        mappings: Option<String>,
    },
    DropIndex(String),
    ShowIndex(String),
    Browse(String),
    Upload {
        index: String,
        id: String,
        content: String,
    },
    QuickAdd {
        id: String,
        content: String,
    },
    Help,
    Quit,
}

/// Split off the first whitespace-delimited word.
fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.find(char::is_whitespace) {
        Some(pos) => (&text[..pos], text[pos..].trim_start()),
        None => (text, ""),
    }
}

fn required<'a>(value: &'a str, usage: &str) -> Result<&'a str, ConsoleError> {
    if value.is_empty() {
        return Err(ConsoleError::command(format!("usage: {}", usage)));
    }
    Ok(value)
}

/// Split at the first `separator` that is not inside a JSON string.
fn split_outside_strings(text: &str, separator: char) -> Option<(&str, &str)> {
    let mut in_string = false;
    let mut escaped = false;

    for (pos, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
        } else if c == '"' {
            in_string = true;
        } else if c == separator {
            return Some((&text[..pos], &text[pos + c.len_utf8()..]));
        }
    }
    None
}

fn optional(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

impl Command {
    /// Parse one command line.
    ///
    /// Free-text arguments (queries, document bodies, index settings) take the
    /// rest of the line. Index settings and mappings are separated by a `|`
    /// outside JSON strings.
    pub fn parse(line: &str) -> Result<Self, ConsoleError> {
        let (verb, rest) = split_word(line.trim());

        let command = match verb.to_ascii_lowercase().as_str() {
            "" => Command::Empty,
            "tab" | "go" => Command::Tab(Tab::from_name(rest)),
            "search" | "s" => {
                let (index, query) = match split_word(rest) {
                    ("-i" | "--index", rest) => {
                        let (index, query) = split_word(rest);
                        let index = required(index, "search -i <index> <query>")?;
                        (Some(index.to_string()), query)
                    }
                    _ => (None, rest),
                };
                Command::Search {
                    query: query.to_string(),
                    index,
                }
            }
            "refresh" | "r" => Command::Refresh,
            "count" => Command::Count,
            "delete" | "rm" => {
                let (index, rest) = split_word(rest);
                let (id, _) = split_word(rest);
                Command::DeleteHit {
                    index: required(index, "delete <index> <id>")?.to_string(),
                    id: required(id, "delete <index> <id>")?.to_string(),
                }
            }
            "indices" | "ls" => Command::ListIndices,
            "create" => {
                let (name, rest) = split_word(rest);
                let name = required(name, "create <name> [settings-json] [| mappings-json]")?;
                let (settings, mappings) = match split_outside_strings(rest, '|') {
                    Some((settings, mappings)) => (optional(settings), optional(mappings)),
                    None => (optional(rest), None),
                };
                Command::CreateIndex {
                    name: name.to_string(),
                    settings,
                    mappings,
                }
            }
            "drop" => {
                let (name, _) = split_word(rest);
                Command::DropIndex(required(name, "drop <name>")?.to_string())
            }
            "show" => {
                let (name, _) = split_word(rest);
                Command::ShowIndex(required(name, "show <name>")?.to_string())
            }
            "browse" => Command::Browse(rest.to_string()),
            "upload" => {
                let (index, rest) = split_word(rest);
                let (id, content) = split_word(rest);
                Command::Upload {
                    index: index.to_string(),
                    id: id.to_string(),
                    content: content.to_string(),
                }
            }
            "add" => {
                let (id, content) = split_word(rest);
                Command::QuickAdd {
                    id: id.to_string(),
                    content: content.to_string(),
                }
            }
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => {
                return Err(ConsoleError::command(format!(
                    "unknown command '{}', type 'help' for a list",
                    other
                )))
            }
        };

        Ok(command)
    }

    /// Question to confirm before running an irreversible command.
    pub fn confirmation(&self) -> Option<String> {
        match self {
            Command::DropIndex(name) => Some(format!(
                "Delete index '{}' and all its documents? This cannot be undone.",
                name
            )),
            _ => None,
        }
    }
}

/// What the caller should do after a command ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// The command ran but its action failed; the message says which.
    Failed(String),
    Help,
    Quit,
}

impl Flow {
    fn from_outcome(ok: bool, failure: impl FnOnce() -> String) -> Self {
        if ok {
            Flow::Continue
        } else {
            Flow::Failed(failure())
        }
    }
}

pub struct Shell {
    active: Tab,
    pub search: SearchView,
    pub indices: IndicesView,
    pub upload: UploadView,
    pub quick_add: QuickAddView,
}

impl Shell {
    pub fn new(client: Arc<SearchConsoleClient>) -> Self {
        Self {
            active: Tab::default(),
            search: SearchView::new(client.clone()),
            indices: IndicesView::new(client.clone()),
            upload: UploadView::new(client.clone()),
            quick_add: QuickAddView::new(client),
        }
    }

    pub fn active(&self) -> Tab {
        self.active
    }

    /// Switch tabs and load what the new tab shows on entry.
    ///
    /// Returns whether that load succeeded.
    pub async fn navigate(&mut self, tab: Tab) -> bool {
        debug!(from = %self.active, to = %tab, "Switching tab");
        self.active = tab;
        match tab {
            Tab::Search => self.search.refresh_count().await,
            Tab::Indices => self.indices.load().await,
            Tab::Upload => true,
        }
    }

    /// Run a command against its controller, switching to that controller's tab.
    ///
    /// Irreversible commands are expected to be confirmed by the caller first
    /// (see [`Command::confirmation`]).
    pub async fn execute(&mut self, command: Command) -> Flow {
        if matches!(
            command,
            Command::Search { .. } | Command::Count | Command::DeleteHit { .. }
        ) || (command == Command::Refresh && self.active == Tab::Search)
        {
            self.quick_add.clear_notice().await;
        }

        match command {
            Command::Empty => Flow::Continue,
            Command::Tab(tab) => {
                let ok = self.navigate(tab).await;
                Flow::from_outcome(ok, || format!("Failed to load the {} tab", tab))
            }
            Command::Search { query, index } => {
                self.active = Tab::Search;
                let ok = self.search.search(&query, index.as_deref()).await;
                Flow::from_outcome(ok, || format!("Search for '{}' failed", query))
            }
            Command::Refresh => {
                let ok = match self.active {
                    Tab::Search => self.search.refresh().await,
                    Tab::Indices => self.indices.load().await,
                    Tab::Upload => true,
                };
                Flow::from_outcome(ok, || "Refresh failed".to_string())
            }
            Command::Count => {
                self.active = Tab::Search;
                let ok = self.search.refresh_count().await;
                Flow::from_outcome(ok, || "Failed to count documents".to_string())
            }
            Command::DeleteHit { index, id } => {
                self.active = Tab::Search;
                let ok = self.search.delete_hit(&index, &id).await;
                Flow::from_outcome(ok, || format!("Failed to delete document {}/{}", index, id))
            }
            Command::ListIndices => {
                let ok = self.navigate(Tab::Indices).await;
                Flow::from_outcome(ok, || "Failed to list indices".to_string())
            }
            Command::CreateIndex {
                name,
                settings,
                mappings,
            } => {
                self.active = Tab::Indices;
                let ok = self
                    .indices
                    .create(&name, settings.as_deref(), mappings.as_deref())
                    .await;
                Flow::from_outcome(ok, || format!("Failed to create index {}", name))
            }
            Command::DropIndex(name) => {
                self.active = Tab::Indices;
                let ok = self.indices.delete(&name).await;
                Flow::from_outcome(ok, || format!("Failed to delete index {}", name))
            }
            Command::ShowIndex(name) => {
                self.active = Tab::Indices;
                let ok = self.indices.select(&name).await;
                Flow::from_outcome(ok, || format!("Failed to load index {}", name))
            }
            Command::Browse(query) => {
                self.active = Tab::Indices;
                let ok = self.indices.browse(&query).await;
                Flow::from_outcome(ok, || "Failed to browse the selected index".to_string())
            }
            Command::Upload { index, id, content } => {
                self.active = Tab::Upload;
                self.upload.fill(UploadForm::new(index, id, content)).await;
                let ok = self.upload.submit().await;
                Flow::from_outcome(ok, || "Upload failed".to_string())
            }
            Command::QuickAdd { id, content } => {
                self.active = Tab::Search;
                self.quick_add.fill(QuickAddForm::new(id, content)).await;
                let ok = self.quick_add.submit().await;
                if ok {
                    self.search.refresh().await;
                    self.search.refresh_count().await;
                }
                Flow::from_outcome(ok, || "Failed to add document".to_string())
            }
            Command::Help => Flow::Help,
            Command::Quit => Flow::Quit,
        }
    }
}
