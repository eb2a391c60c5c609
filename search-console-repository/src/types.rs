//! Local input handling for document bodies and index payloads.
//!
//! Free text typed by a user is turned into JSON here, before any request is
//! sent. Malformed input is reported as a local error.

use serde_json::{Map, Value};

use crate::errors::SearchError;

/// Field a non-JSON quick-add body is stored under.
pub const FALLBACK_BODY_FIELD: &str = "content";

/// Parse free text as a JSON document body.
///
/// Any JSON value is accepted; only syntax errors are rejected.
pub fn parse_document_body(text: &str) -> Result<Value, SearchError> {
    serde_json::from_str(text).map_err(|e| SearchError::invalid_document(e.to_string()))
}

/// Parse free text as JSON, or store it verbatim under [`FALLBACK_BODY_FIELD`].
pub fn document_body_or_wrap(text: &str) -> Value {
    parse_document_body(text).unwrap_or_else(|_| {
        let mut body = Map::new();
        body.insert(FALLBACK_BODY_FIELD.to_string(), Value::String(text.to_string()));
        Value::Object(body)
    })
}

/// Parse optional index settings or mappings text.
///
/// Blank text means "not provided". Anything else must be a JSON object.
pub fn parse_optional_object(text: Option<&str>, what: &str) -> Result<Option<Value>, SearchError> {
    let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };

    let value: Value = serde_json::from_str(text)
        .map_err(|e| SearchError::invalid_document(format!("{} is not valid JSON: {}", what, e)))?;

    if !value.is_object() {
        return Err(SearchError::validation(format!("{} must be a JSON object", what)));
    }
    Ok(Some(value))
}

/// Reject blank required fields before a request is built.
pub(crate) fn require(value: &str, field: &str) -> Result<(), SearchError> {
    if value.trim().is_empty() {
        return Err(SearchError::validation(format!("{} is required", field)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_document_body() {
        assert_eq!(
            parse_document_body(r#"{"title": "a"}"#).unwrap(),
            json!({"title": "a"})
        );
        assert_eq!(parse_document_body("[1, 2]").unwrap(), json!([1, 2]));
    }

    #[test]
    fn test_parse_document_body_malformed() {
        let result = parse_document_body("{title:");
        assert!(matches!(result, Err(SearchError::InvalidDocument(_))));
    }

    #[test]
    fn test_document_body_or_wrap() {
        assert_eq!(document_body_or_wrap(r#"{"a": 1}"#), json!({"a": 1}));
        assert_eq!(
            document_body_or_wrap("just some notes"),
            json!({"content": "just some notes"})
        );
    }

    #[test]
    fn test_parse_optional_object() {
        assert_eq!(parse_optional_object(None, "settings").unwrap(), None);
        assert_eq!(parse_optional_object(Some("   "), "settings").unwrap(), None);
        assert_eq!(
            parse_optional_object(Some(r#"{"number_of_shards": 1}"#), "settings").unwrap(),
            Some(json!({"number_of_shards": 1}))
        );
        assert!(matches!(
            parse_optional_object(Some("[1]"), "mappings"),
            Err(SearchError::ValidationError(_))
        ));
        assert!(matches!(
            parse_optional_object(Some("{"), "mappings"),
            Err(SearchError::InvalidDocument(_))
        ));
    }

    #[test]
    fn test_require() {
        assert!(require("docs", "index").is_ok());
        assert_eq!(
            require("  ", "id"),
            Err(SearchError::validation("id is required"))
        );
    }
}
