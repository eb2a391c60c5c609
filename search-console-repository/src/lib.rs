//! # Search Console Repository
//!
//! This crate provides the operations the search console runs against an
//! Elasticsearch-compatible engine. It includes definitions for errors, the
//! engine interface, a concrete HTTP implementation, an in-memory engine and
//! the `SearchConsoleClient` boundary used by the console's views.

pub mod client;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod opensearch;
pub mod types;

pub use client::SearchConsoleClient;
pub use config::EngineConfig;
pub use errors::SearchError;
pub use interfaces::SearchEngineClient;
pub use memory::InMemorySearchEngine;
pub use opensearch::OpenSearchClient;
