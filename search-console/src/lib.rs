//! # Search Console
//!
//! Terminal administration console for Elasticsearch-compatible search
//! engines.
//!
//! This crate wires configuration into a `SearchConsoleClient`, keeps
//! per-screen view state for searching, index management and document upload,
//! and provides the navigation shell the binary drives.

pub mod config;
pub mod render;
pub mod shell;
pub mod views;

pub use config::{ConsoleSettings, Dependencies};
pub use shell::{Command, Flow, Shell, Tab};

use thiserror::Error;

/// Errors that can occur while starting or running the console.
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Command line could not be understood.
    #[error("Command error: {0}")]
    CommandError(String),

    /// Search error.
    #[error("Search error: {0}")]
    SearchError(#[from] search_console_repository::SearchError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConsoleError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a command error.
    pub fn command(msg: impl Into<String>) -> Self {
        Self::CommandError(msg.into())
    }
}
