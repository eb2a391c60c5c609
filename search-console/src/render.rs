//! Text rendering of view state for the terminal.

use std::fmt::Write;

use colored::*;
use serde_json::Value;

use search_console_shared::SearchHit;

use crate::shell::{Shell, Tab};
use crate::views::{IndicesState, LoadState, Notice, NoticeLevel, SearchState, UploadState};

/// Pretty-print a JSON value, falling back to compact output.
pub fn json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

pub fn tabs(active: Tab) -> String {
    Tab::ALL
        .iter()
        .map(|tab| {
            if *tab == active {
                format!("[{}]", tab.title()).bold().to_string()
            } else {
                format!(" {} ", tab.title()).dimmed().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn notice(notice: &Notice) -> String {
    match notice.level {
        NoticeLevel::Success => format!("✓ {}", notice.message).green().to_string(),
        NoticeLevel::Warning => format!("! {}", notice.message).yellow().to_string(),
        NoticeLevel::Error => format!("✗ {}", notice.message).red().to_string(),
    }
}

/// One line for a non-success state, or `None` when there is a value to show.
fn pending<T>(state: &LoadState<T>, idle: &str) -> Option<String> {
    match state {
        LoadState::Idle => Some(idle.dimmed().to_string()),
        LoadState::Loading => Some("Loading...".dimmed().to_string()),
        LoadState::Error(message) => Some(format!("Error: {}", message).red().to_string()),
        LoadState::Success(_) => None,
    }
}

pub fn hits(hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return "No results".dimmed().to_string();
    }

    let mut out = String::new();
    for hit in hits {
        let score = hit
            .score
            .map(|s| format!(" (score {:.3})", s))
            .unwrap_or_default();
        let _ = writeln!(out, "{}{}", hit.reference().to_string().cyan().bold(), score.dimmed());
        for line in json(&hit.source).lines() {
            let _ = writeln!(out, "    {}", line);
        }
    }
    out.trim_end().to_string()
}

pub fn search(state: &SearchState) -> String {
    let mut out = String::new();

    let count = match state.count.state() {
        LoadState::Success(count) => count.to_string(),
        LoadState::Loading => "...".to_string(),
        _ => "-".to_string(),
    };
    let _ = writeln!(out, "Documents: {}", count.bold());

    if let Some(query) = &state.last_query {
        let scope = state
            .last_index
            .as_deref()
            .map(|index| format!(" in {}", index))
            .unwrap_or_default();
        let _ = writeln!(out, "Query: \"{}\"{}", query, scope);
    }
    if let Some(deleting) = &state.deleting {
        let _ = writeln!(out, "{}", format!("Deleting {}...", deleting).dimmed());
    }

    let results = pending(state.results.state(), "Type 'search <query>' to search")
        .unwrap_or_else(|| hits(state.results.state().value().map(Vec::as_slice).unwrap_or(&[])));
    out.push_str(&results);

    if let Some(n) = &state.notice {
        let _ = write!(out, "\n{}", notice(n));
    }
    out
}

pub fn indices(state: &IndicesState) -> String {
    let mut out = String::new();

    match state.list.state() {
        LoadState::Success(names) if names.is_empty() => {
            let _ = writeln!(out, "{}", "No indices".dimmed());
        }
        LoadState::Success(names) => {
            for name in names {
                let marker = if state.selected_name.as_deref() == Some(name.as_str()) {
                    "*"
                } else {
                    " "
                };
                let _ = writeln!(out, "{} {}", marker, name);
            }
        }
        other => {
            if let Some(line) = pending(other, "Type 'indices' to load the index list") {
                let _ = writeln!(out, "{}", line);
            }
        }
    }

    match state.create.state() {
        LoadState::Success(name) => {
            let _ = writeln!(out, "{}", format!("✓ Index {} created", name).green());
        }
        LoadState::Error(message) => {
            let _ = writeln!(out, "{}", format!("✗ Create failed: {}", message).red());
        }
        LoadState::Loading => {
            let _ = writeln!(out, "{}", "Creating...".dimmed());
        }
        LoadState::Idle => {}
    }

    if let Some(name) = &state.selected_name {
        let _ = writeln!(out, "\n{}", format!("Index {}", name).bold());
        match state.selected.state() {
            LoadState::Success(details) => {
                if let Some(shards) = details.number_of_shards() {
                    let _ = writeln!(out, "Shards: {}", shards);
                }
                let _ = writeln!(out, "{}", json(details.as_value()));
            }
            other => {
                if let Some(line) = pending(other, "") {
                    let _ = writeln!(out, "{}", line);
                }
            }
        }

        match state.documents.state() {
            LoadState::Success(found) => {
                let _ = writeln!(out, "{}", hits(found));
            }
            LoadState::Idle => {}
            other => {
                if let Some(line) = pending(other, "") {
                    let _ = writeln!(out, "{}", line);
                }
            }
        }
    }

    if let Some(n) = &state.notice {
        let _ = writeln!(out, "{}", notice(n));
    }
    out.trim_end().to_string()
}

pub fn upload(state: &UploadState) -> String {
    let mut out = String::new();
    let field = |value: &str| {
        if value.is_empty() {
            "<empty>".dimmed().to_string()
        } else {
            value.to_string()
        }
    };

    let _ = writeln!(out, "Index:   {}", field(&state.form.index));
    let _ = writeln!(out, "ID:      {}", field(&state.form.id));
    let _ = writeln!(out, "Content: {}", field(&state.form.content));

    if state.submission.state().is_loading() {
        let _ = writeln!(out, "{}", "Uploading...".dimmed());
    }
    if let Some(n) = &state.notice {
        let _ = writeln!(out, "{}", notice(n));
    }
    out.trim_end().to_string()
}

/// The active tab's screen, headed by the tab bar.
pub async fn screen(shell: &Shell) -> String {
    let body = match shell.active() {
        Tab::Search => {
            let mut body = search(&shell.search.snapshot().await);
            if let Some(n) = shell.quick_add.notice().await {
                body.push('\n');
                body.push_str(&notice(&n));
            }
            body
        }
        Tab::Indices => indices(&shell.indices.snapshot().await),
        Tab::Upload => upload(&shell.upload.snapshot().await),
    };
    format!("{}\n\n{}", tabs(shell.active()), body)
}

pub fn help() -> String {
    let commands = [
        ("tab <search|indices|upload>", "switch tab"),
        ("search [-i <index>] <query>", "full-text search"),
        ("refresh", "re-run the last search or reload the index list"),
        ("count", "reload the document count"),
        ("delete <index> <id>", "delete a document"),
        ("add <id> <text or json>", "save a document to the default index"),
        ("indices", "list indices"),
        ("create <name> [settings] [| mappings]", "create an index"),
        ("drop <name>", "delete an index"),
        ("show <name>", "select an index and show its details"),
        ("browse <query>", "search the selected index"),
        ("upload <index> <id> <json>", "upload a document"),
        ("quit", "leave the console"),
    ];

    commands
        .iter()
        .map(|(usage, about)| format!("  {:<40} {}", usage.cyan(), about))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::testing::memory_client;
    use serde_json::json;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_hits() {
        plain();
        let hit: SearchHit = serde_json::from_value(json!({
            "_index": "docs",
            "_id": "1",
            "_score": 1.5,
            "_source": {"title": "a"}
        }))
        .unwrap();

        let text = hits(&[hit]);
        assert!(text.starts_with("docs/1 (score 1.500)"));
        assert!(text.contains("\"title\": \"a\""));
        assert_eq!(hits(&[]), "No results");
    }

    #[test]
    fn test_notice() {
        plain();
        assert_eq!(
            notice(&Notice::warning("All fields are required")),
            "! All fields are required"
        );
    }

    #[tokio::test]
    async fn test_screens() {
        plain();
        let (_, client) = memory_client();
        assert!(
            client
                .create_index("t1", Some(json!({"number_of_shards": 1})), None)
                .await
        );
        let mut shell = Shell::new(client);

        let text = screen(&shell).await;
        assert!(text.starts_with("[Search]"));
        assert!(text.contains("Type 'search <query>' to search"));

        shell.navigate(Tab::Indices).await;
        shell.indices.select("t1").await;
        let text = screen(&shell).await;
        assert!(text.contains("* t1"));
        assert!(text.contains("Shards: 1"));

        shell.navigate(Tab::Upload).await;
        assert!(screen(&shell).await.contains("Index:   <empty>"));
    }
}
