use std::io::Write;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dotenv::dotenv;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use search_console::config::LogFormat;
use search_console::shell::Flow;
use search_console::{render, Command, ConsoleSettings, Dependencies, Shell};

#[derive(Parser)]
#[command(name = "search-console")]
#[command(about = "Administration console for Elasticsearch-compatible search engines", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Engine URL, overrides ELASTIC_API
    #[arg(long, global = true)]
    elastic_api: Option<String>,

    /// Index used by `add`, overrides DEFAULT_INDEX
    #[arg(long, global = true)]
    default_index: Option<String>,

    /// Field full-text searches run against, overrides SEARCH_FIELD
    #[arg(long, global = true)]
    search_field: Option<String>,

    /// Use an empty in-process engine instead of ELASTIC_API; nothing is persisted
    #[arg(long, global = true)]
    memory: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Full-text search
    Search {
        /// Restrict the search to one index
        #[arg(long, short)]
        index: Option<String>,
        /// Query text
        #[arg(default_value = "")]
        query: String,
    },
    /// Total number of documents
    Count,
    /// Manage indices
    Indices {
        #[command(subcommand)]
        command: IndicesCommands,
    },
    /// Upload a JSON document
    Upload {
        index: String,
        id: String,
        /// Document body as JSON
        content: String,
    },
    /// Save a document to the default index; non-JSON text is stored under `content`
    Add { id: String, content: String },
    /// Delete a document
    DeleteDoc { index: String, id: String },
    /// Interactive console (default)
    Shell,
}

#[derive(Subcommand)]
enum IndicesCommands {
    /// List index names
    List,
    /// Create an index
    Create {
        name: String,
        /// Settings as a JSON object
        #[arg(long)]
        settings: Option<String>,
        /// Mappings as a JSON object
        #[arg(long)]
        mappings: Option<String>,
    },
    /// Delete an index and all its documents
    Delete {
        name: String,
        /// Do not ask for confirmation
        #[arg(long, short)]
        yes: bool,
    },
    /// Show settings and mappings of an index
    Show { name: String },
    /// Search within one index
    Browse {
        name: String,
        #[arg(default_value = "")]
        query: String,
    },
}

impl Commands {
    /// Shell commands equivalent to this subcommand, in order.
    fn into_shell_commands(self) -> Vec<Command> {
        match self {
            Commands::Search { index, query } => vec![Command::Search { query, index }],
            Commands::Count => vec![Command::Count],
            Commands::Indices { command } => match command {
                IndicesCommands::List => vec![Command::ListIndices],
                IndicesCommands::Create {
                    name,
                    settings,
                    mappings,
                } => vec![Command::CreateIndex {
                    name,
                    settings,
                    mappings,
                }],
                IndicesCommands::Delete { name, .. } => vec![Command::DropIndex(name)],
                IndicesCommands::Show { name } => vec![Command::ShowIndex(name)],
                IndicesCommands::Browse { name, query } => {
                    vec![Command::ShowIndex(name), Command::Browse(query)]
                }
            },
            Commands::Upload { index, id, content } => {
                vec![Command::Upload { index, id, content }]
            }
            Commands::Add { id, content } => vec![Command::QuickAdd { id, content }],
            Commands::DeleteDoc { index, id } => vec![Command::DeleteHit { index, id }],
            Commands::Shell => Vec::new(),
        }
    }

    fn skips_confirmation(&self) -> bool {
        matches!(
            self,
            Commands::Indices {
                command: IndicesCommands::Delete { yes: true, .. }
            }
        )
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

fn prompt(text: &str) -> Result<()> {
    print!("{}", text);
    std::io::stdout().flush().context("Failed to flush stdout")
}

/// Ask a yes/no question on stdin; anything but `y`/`yes` is a no.
async fn confirm(lines: &mut Lines<BufReader<Stdin>>, question: &str) -> Result<bool> {
    prompt(&format!("{} [y/N] ", question.yellow()))?;
    let answer = lines.next_line().await.context("Failed to read answer")?;
    Ok(matches!(
        answer.as_deref().map(|a| a.trim().to_ascii_lowercase()),
        Some(a) if a == "y" || a == "yes"
    ))
}

async fn run_once(shell: &mut Shell, commands: Vec<Command>, skip_confirmation: bool) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    for command in commands {
        if let Some(question) = command.confirmation() {
            if !skip_confirmation && !confirm(&mut lines, &question).await? {
                println!("Aborted");
                return Ok(());
            }
        }
        let flow = shell.execute(command).await;
        if let Flow::Failed(message) = flow {
            println!("{}", render::screen(shell).await);
            bail!(message);
        }
    }

    println!("{}", render::screen(shell).await);
    Ok(())
}

async fn run_shell(shell: &mut Shell) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let tab = shell.active();
    shell.navigate(tab).await;
    println!("{}", render::screen(shell).await);
    println!("{}", "Type 'help' for commands".dimmed());

    loop {
        prompt(&format!("{}> ", shell.active().title().to_ascii_lowercase()))?;
        let Some(line) = lines.next_line().await.context("Failed to read command")? else {
            break;
        };

        let command = match Command::parse(&line) {
            Ok(Command::Empty) => continue,
            Ok(command) => command,
            Err(e) => {
                println!("{}", e.to_string().red());
                continue;
            }
        };

        if let Some(question) = command.confirmation() {
            if !confirm(&mut lines, &question).await? {
                println!("Aborted");
                continue;
            }
        }

        match shell.execute(command).await {
            Flow::Quit => break,
            Flow::Help => println!("{}", render::help()),
            Flow::Continue | Flow::Failed(_) => println!("{}", render::screen(shell).await),
        }
    }

    info!("Console closed");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let cli = Cli::parse();
    let settings = ConsoleSettings::from_env().with_overrides(
        cli.elastic_api,
        cli.default_index,
        cli.search_field,
    );
    init_tracing(settings.log_format);

    let mut deps = if cli.memory {
        Dependencies::in_memory(&settings)
    } else {
        match Dependencies::new(&settings) {
            Ok(deps) => deps,
            Err(e) => {
                error!(error = %e, "Failed to start console");
                return Err(e).context("Failed to start console");
            }
        }
    };

    match cli.command {
        None | Some(Commands::Shell) => run_shell(&mut deps.shell).await,
        Some(command) => {
            let skip_confirmation = command.skips_confirmation();
            run_once(&mut deps.shell, command.into_shell_commands(), skip_confirmation).await
        }
    }
}
