//! Dependency initialization and wiring for the search console.

use std::sync::Arc;
use tracing::info;

use crate::config::ConsoleSettings;
use crate::shell::Shell;
use crate::ConsoleError;
use search_console_repository::{
    EngineConfig, InMemorySearchEngine, SearchConsoleClient, SearchEngineClient,
};

/// Base URL reported for the in-process engine.
pub const IN_MEMORY_URL: &str = "memory://local";

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The operation boundary shared by every view.
    pub client: Arc<SearchConsoleClient>,
    /// The navigation shell, starting on the search tab.
    pub shell: Shell,
}

impl Dependencies {
    /// Initialize all dependencies from settings.
    ///
    /// No request is sent here: an unreachable engine shows up as failed
    /// operations in the views, not as a startup error.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(ConsoleError)` - If the engine URL is missing or invalid
    pub fn new(settings: &ConsoleSettings) -> Result<Self, ConsoleError> {
        let config = settings.engine_config()?;

        info!(
            base_url = %config.base_url,
            default_index = %config.default_index,
            search_field = %config.search_field,
            "Initializing dependencies"
        );

        let client = SearchConsoleClient::connect(config)
            .map_err(|e| ConsoleError::config(format!("Failed to create engine client: {}", e)))?;

        Ok(Self::from_client(Arc::new(client)))
    }

    /// Wire the console over an empty in-process engine, for offline use.
    ///
    /// Nothing is persisted: every document and index is lost on exit.
    pub fn in_memory(settings: &ConsoleSettings) -> Self {
        let config = settings.engine_config_for(IN_MEMORY_URL);

        info!(
            default_index = %config.default_index,
            search_field = %config.search_field,
            "Initializing dependencies with the in-memory engine"
        );

        Self::with_engine(Arc::new(InMemorySearchEngine::new()), config)
    }

    /// Wire the console over an existing engine implementation.
    pub fn with_engine(engine: Arc<dyn SearchEngineClient>, config: EngineConfig) -> Self {
        Self::from_client(Arc::new(SearchConsoleClient::new(engine, config)))
    }

    fn from_client(client: Arc<SearchConsoleClient>) -> Self {
        let shell = Shell::new(client.clone());
        Self { client, shell }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::{Command, Flow, Tab};

    #[test]
    fn test_new_requires_url() {
        let result = Dependencies::new(&ConsoleSettings::default());
        assert!(matches!(result, Err(ConsoleError::ConfigError(_))));
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        let settings = ConsoleSettings {
            elastic_api: Some("not a url".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            Dependencies::new(&settings),
            Err(ConsoleError::ConfigError(_))
        ));
    }

    #[tokio::test]
    async fn test_new_from_settings() {
        let settings = ConsoleSettings {
            elastic_api: Some("http://localhost:9200/_search".to_string()),
            default_index: Some("notes".to_string()),
            ..Default::default()
        };

        let deps = Dependencies::new(&settings).unwrap();
        assert_eq!(deps.client.config().base_url, "http://localhost:9200");
        assert_eq!(deps.client.config().default_index, "notes");
        assert_eq!(deps.shell.active(), Tab::Search);
    }

    #[test]
    fn test_with_engine() {
        let deps = Dependencies::with_engine(
            Arc::new(InMemorySearchEngine::new()),
            EngineConfig::new("http://localhost:9200"),
        );
        assert_eq!(deps.client.config().search_field, "content");
    }

    #[tokio::test]
    async fn test_in_memory_needs_no_url() {
        let settings = ConsoleSettings {
            default_index: Some("notes".to_string()),
            ..Default::default()
        };

        let mut deps = Dependencies::in_memory(&settings);
        assert_eq!(deps.client.config().base_url, IN_MEMORY_URL);
        assert_eq!(deps.client.config().default_index, "notes");

        assert_eq!(
            deps.shell.execute(Command::parse("add 1 offline note").unwrap()).await,
            Flow::Continue
        );
        assert_eq!(deps.client.count().await, 1);
    }
}
