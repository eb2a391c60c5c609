//! Environment-sourced console settings.

use std::env;

use search_console_repository::EngineConfig;

use crate::ConsoleError;

/// Engine base URL (required).
pub const ELASTIC_API_VAR: &str = "ELASTIC_API";

/// Index used by the quick-add form (optional).
pub const DEFAULT_INDEX_VAR: &str = "DEFAULT_INDEX";

/// Field full-text searches run against (optional).
pub const SEARCH_FIELD_VAR: &str = "SEARCH_FIELD";

/// `json` switches log lines to JSON (optional).
pub const LOG_FORMAT_VAR: &str = "LOG_FORMAT";

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    fn from_value(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Settings read once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsoleSettings {
    pub elastic_api: Option<String>,
    pub default_index: Option<String>,
    pub search_field: Option<String>,
    pub log_format: LogFormat,
}

impl ConsoleSettings {
    /// Read settings from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `ELASTIC_API`: Engine API root, a trailing `/_search` is accepted (required)
    /// - `DEFAULT_INDEX`: Index for the quick-add form (default: documents)
    /// - `SEARCH_FIELD`: Field searched by full-text queries (default: content)
    /// - `LOG_FORMAT`: `json` for JSON log lines (default: text)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through `lookup`, treating blank values as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            elastic_api: read(ELASTIC_API_VAR),
            default_index: read(DEFAULT_INDEX_VAR),
            search_field: read(SEARCH_FIELD_VAR),
            log_format: LogFormat::from_value(read(LOG_FORMAT_VAR).as_deref()),
        }
    }

    /// Replace settings with values given on the command line.
    pub fn with_overrides(
        mut self,
        elastic_api: Option<String>,
        default_index: Option<String>,
        search_field: Option<String>,
    ) -> Self {
        if elastic_api.is_some() {
            self.elastic_api = elastic_api;
        }
        if default_index.is_some() {
            self.default_index = default_index;
        }
        if search_field.is_some() {
            self.search_field = search_field;
        }
        self
    }

    /// Build the transport configuration.
    ///
    /// # Returns
    ///
    /// * `Ok(EngineConfig)` - Normalized engine configuration
    /// * `Err(ConsoleError)` - If no engine URL was configured
    pub fn engine_config(&self) -> Result<EngineConfig, ConsoleError> {
        let elastic_api = self.elastic_api.as_deref().ok_or_else(|| {
            ConsoleError::config(format!(
                "{} is not set; pass --elastic-api or set it in the environment",
                ELASTIC_API_VAR
            ))
        })?;
        Ok(self.engine_config_for(elastic_api))
    }

    /// Engine configuration for `base_url` with the configured index and field.
    pub fn engine_config_for(&self, base_url: &str) -> EngineConfig {
        let mut config = EngineConfig::new(base_url);
        if let Some(ref index) = self.default_index {
            config = config.with_default_index(index);
        }
        if let Some(ref field) = self.search_field {
            config = config.with_search_field(field);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_from_lookup() {
        let settings = ConsoleSettings::from_lookup(lookup(&[
            ("ELASTIC_API", "http://localhost:9200/_search"),
            ("DEFAULT_INDEX", "notes"),
            ("LOG_FORMAT", "JSON"),
        ]));

        assert_eq!(
            settings.elastic_api.as_deref(),
            Some("http://localhost:9200/_search")
        );
        assert_eq!(settings.default_index.as_deref(), Some("notes"));
        assert!(settings.search_field.is_none());
        assert_eq!(settings.log_format, LogFormat::Json);

        let config = settings.engine_config().unwrap();
        assert_eq!(config.base_url, "http://localhost:9200");
        assert_eq!(config.default_index, "notes");
        assert_eq!(config.search_field, "content");
    }

    #[test]
    fn test_missing_url() {
        let settings = ConsoleSettings::from_lookup(lookup(&[("ELASTIC_API", "  ")]));
        assert!(settings.elastic_api.is_none());
        assert!(matches!(
            settings.engine_config(),
            Err(ConsoleError::ConfigError(_))
        ));
    }

    #[test]
    fn test_defaults() {
        let settings = ConsoleSettings::from_lookup(lookup(&[("ELASTIC_API", "http://es:9200")]));
        let config = settings.engine_config().unwrap();

        assert_eq!(config.default_index, "documents");
        assert_eq!(settings.log_format, LogFormat::Text);
    }

    #[test]
    fn test_overrides() {
        let settings = ConsoleSettings::from_lookup(lookup(&[
            ("ELASTIC_API", "http://env:9200"),
            ("SEARCH_FIELD", "body"),
        ]))
        .with_overrides(Some("http://flag:9200".to_string()), None, Some("title".to_string()));

        let config = settings.engine_config().unwrap();
        assert_eq!(config.base_url, "http://flag:9200");
        assert_eq!(config.search_field, "title");
        assert_eq!(config.default_index, "documents");
    }
}
