//! OpenSearch implementation of the search engine client.
//!
//! This module provides a concrete implementation of `SearchEngineClient`
//! over the Elasticsearch-compatible REST API, using the OpenSearch client.

mod client;
pub mod queries;

pub use client::OpenSearchClient;
