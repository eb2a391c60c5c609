//! Request bodies and response parsing for the engine REST API.
//!
//! This module builds the JSON payloads the console sends and pulls typed
//! values out of the engine's responses.

use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::warn;
use url::Url;

use crate::errors::SearchError;

use search_console_shared::{IndexDescriptor, IndexDetails, SearchHit};

/// Build a single-field full-text query.
///
/// The query text is passed through unmodified, including the empty string.
pub fn build_match_query(field: &str, query_text: &str) -> Value {
    let mut clause = Map::new();
    clause.insert(field.to_string(), Value::String(query_text.to_string()));

    json!({
        "query": {
            "match": clause
        }
    })
}

/// Build the body of an index creation request.
///
/// Only the parts that are present are included, so an index without settings
/// or mappings is created with `{}`.
pub fn build_create_index_body(descriptor: &IndexDescriptor) -> Value {
    let mut body = Map::new();
    if let Some(ref settings) = descriptor.settings {
        body.insert("settings".to_string(), settings.clone());
    }
    if let Some(ref mappings) = descriptor.mappings {
        body.insert("mappings".to_string(), mappings.clone());
    }
    Value::Object(body)
}

/// Extract hits from a `{hits: {hits: [...]}}` search response.
///
/// A response without `hits.hits` yields no results. Hits that cannot be
/// decoded are skipped.
pub fn parse_hits(response: &Value) -> Vec<SearchHit> {
    let Some(hits) = response
        .get("hits")
        .and_then(|h| h.get("hits"))
        .and_then(|h| h.as_array())
    else {
        return Vec::new();
    };

    hits.iter()
        .filter_map(|hit| match SearchHit::deserialize(hit) {
            Ok(hit) => Some(hit),
            Err(e) => {
                warn!(error = %e, "Skipping undecodable search hit");
                None
            }
        })
        .collect()
}

/// Extract the document count from a `{count: n}` response.
pub fn parse_count(response: &Value) -> Option<u64> {
    response.get("count").and_then(Value::as_u64)
}

#[derive(Debug, Deserialize)]
struct CatIndexRow {
    index: Option<String>,
}

/// Extract index names from a `_cat/indices?format=json` response.
///
/// Names keep the engine's ordering; rows without a name are skipped.
pub fn parse_index_names(response: &Value) -> Vec<String> {
    let Some(rows) = response.as_array() else {
        return Vec::new();
    };

    rows.iter()
        .filter_map(|row| CatIndexRow::deserialize(row).ok())
        .filter_map(|row| row.index)
        .collect()
}

/// Unwrap the details of `name` from a `{ name: {...} }` response.
pub fn unwrap_index_details(name: &str, response: Value) -> Option<IndexDetails> {
    match response {
        Value::Object(mut envelope) => envelope.remove(name).map(IndexDetails::new),
        _ => None,
    }
}

/// Path of `index/_doc/id`, each segment percent-encoded.
pub fn document_path(index: &str, id: &str) -> Result<String, SearchError> {
    let mut url = Url::parse("http://engine/").map_err(|e| SearchError::validation(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| SearchError::validation("Cannot build document path"))?
        .pop_if_empty()
        .extend([index, "_doc", id]);
    Ok(url.path().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_path() {
        assert_eq!(document_path("docs", "1").unwrap(), "/docs/_doc/1");
        assert_eq!(
            document_path("docs", "a/b c").unwrap(),
            "/docs/_doc/a%2Fb%20c"
        );
        assert_eq!(document_path("docs", " 1").unwrap(), "/docs/_doc/%201");
    }

    #[test]
    fn test_build_match_query() {
        let query = build_match_query("content", "hello world");
        assert_eq!(
            query,
            json!({"query": {"match": {"content": "hello world"}}})
        );
    }

    #[test]
    fn test_build_match_query_empty_text() {
        let query = build_match_query("content", "");
        assert_eq!(query["query"]["match"]["content"], "");
    }

    #[test]
    fn test_create_index_body() {
        let bare = IndexDescriptor::new("t1");
        assert_eq!(build_create_index_body(&bare), json!({}));

        let full = IndexDescriptor::new("t1")
            .with_settings(json!({"number_of_shards": 1}))
            .with_mappings(json!({"properties": {"title": {"type": "text"}}}));
        let body = build_create_index_body(&full);
        assert_eq!(body["settings"]["number_of_shards"], 1);
        assert_eq!(body["mappings"]["properties"]["title"]["type"], "text");
    }

    #[test]
    fn test_parse_hits_keeps_order() {
        let response = json!({
            "took": 3,
            "hits": {
                "total": {"value": 2, "relation": "eq"},
                "hits": [
                    {"_index": "docs", "_id": "b", "_score": 0.4, "_source": {"content": "b"}},
                    {"_index": "docs", "_id": "a", "_score": 0.9, "_source": {"content": "a"}}
                ]
            }
        });

        let hits = parse_hits(&response);
        let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_parse_hits_missing() {
        assert!(parse_hits(&json!({"error": "index_not_found_exception"})).is_empty());
        assert!(parse_hits(&json!({"hits": {}})).is_empty());
    }

    #[test]
    fn test_parse_hits_skips_invalid() {
        let response = json!({"hits": {"hits": [
            {"_source": {"name": "Missing IDs"}},
            {"_index": "docs", "_id": "1", "_source": {}}
        ]}});

        let hits = parse_hits(&response);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "1");
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(&json!({"count": 12, "_shards": {}})), Some(12));
        assert_eq!(parse_count(&json!({"count": "12"})), None);
        assert_eq!(parse_count(&json!({})), None);
    }

    #[test]
    fn test_parse_index_names() {
        let response = json!([
            {"health": "yellow", "index": "docs", "docs.count": "3"},
            {"health": "green"},
            {"index": ".kibana"}
        ]);
        assert_eq!(parse_index_names(&response), vec!["docs", ".kibana"]);
        assert!(parse_index_names(&json!({"error": "x"})).is_empty());
    }

    #[test]
    fn test_unwrap_index_details() {
        let response = json!({
            "t1": {"settings": {"index": {"number_of_shards": "1"}}, "mappings": {}}
        });
        let details = unwrap_index_details("t1", response.clone()).unwrap();
        assert_eq!(details.number_of_shards(), Some(1));

        assert!(unwrap_index_details("t2", response).is_none());
        assert!(unwrap_index_details("t1", json!([])).is_none());
    }
}
