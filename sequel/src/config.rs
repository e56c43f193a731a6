use serde::Deserialize;
use std::env;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

/// Read a string variable, treating an empty or whitespace-only value as unset.
fn env_non_empty(var: &str) -> Option<String> {
    env::var(var)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub const DEFAULT_MODEL: &str = "google/gemini-2.5-pro-exp-03-25:free";
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub llm: LlmConfig,
    pub graph: GraphConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `file:<path>`, a bare path, or `:memory:`.
    pub url: String,
    pub busy_timeout_ms: u64,
    pub journal_mode: String,
}

impl DatabaseConfig {
    pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            busy_timeout_ms: Self::DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: "WAL".to_string(),
        }
    }
}

/// Completion service configuration.
///
/// A missing `api_key` switches the completion client into mock mode.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
    /// Total number of attempts, including the first one.
    pub max_retries: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphConfig {
    /// Pairs must score strictly above this to become an edge.
    pub similarity_threshold: f64,
    pub seed_sample_graph: bool,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            base_url: OPENROUTER_BASE_URL.to_string(),
            timeout_secs: 30,
            max_retries: 3,
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.1,
            seed_sample_graph: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("SEQUEL_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("SEQUEL_PORT", 5000),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or_else(|_| "file:sequel_ai.db".to_string()),
                busy_timeout_ms: parse_env_or(
                    "DATABASE_BUSY_TIMEOUT_MS",
                    DatabaseConfig::DEFAULT_BUSY_TIMEOUT_MS,
                ),
                journal_mode: env_non_empty("DATABASE_JOURNAL_MODE")
                    .unwrap_or_else(|| "WAL".to_string()),
            },
            llm: LlmConfig {
                model: env_non_empty("MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                api_key: env_non_empty("OPENROUTER_API_KEY"),
                base_url: env_non_empty("LLM_BASE_URL")
                    .unwrap_or_else(|| OPENROUTER_BASE_URL.to_string()),
                timeout_secs: parse_env_or("LLM_TIMEOUT", 30),
                max_retries: parse_env_or("LLM_MAX_RETRIES", 3),
            },
            graph: GraphConfig {
                similarity_threshold: parse_env_or("SIMILARITY_THRESHOLD", 0.1),
                seed_sample_graph: parse_env_or("SEED_SAMPLE_GRAPH", true),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_llm_env() {
        for var in [
            "OPENROUTER_API_KEY",
            "MODEL",
            "LLM_BASE_URL",
            "LLM_TIMEOUT",
            "LLM_MAX_RETRIES",
        ] {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_llm_config_defaults() {
        clear_llm_env();

        let config = Config::default();
        assert_eq!(config.llm.model, DEFAULT_MODEL);
        assert!(config.llm.api_key.is_none());
        assert_eq!(config.llm.base_url, OPENROUTER_BASE_URL);
        assert_eq!(config.llm.timeout_secs, 30);
        assert_eq!(config.llm.max_retries, 3);
    }

    #[test]
    #[serial]
    fn test_llm_config_from_env() {
        clear_llm_env();
        std::env::set_var("OPENROUTER_API_KEY", "sk-or-test");
        std::env::set_var("MODEL", "openai/gpt-3.5-turbo");
        std::env::set_var("LLM_TIMEOUT", "15");
        std::env::set_var("LLM_MAX_RETRIES", "5");

        let config = Config::default();
        assert_eq!(config.llm.api_key.as_deref(), Some("sk-or-test"));
        assert_eq!(config.llm.model, "openai/gpt-3.5-turbo");
        assert_eq!(config.llm.timeout_secs, 15);
        assert_eq!(config.llm.max_retries, 5);

        clear_llm_env();
    }

    #[test]
    #[serial]
    fn test_blank_api_key_means_mock_mode() {
        clear_llm_env();
        std::env::set_var("OPENROUTER_API_KEY", "   ");

        let config = Config::default();
        assert!(config.llm.api_key.is_none());

        clear_llm_env();
    }

    #[test]
    #[serial]
    fn test_invalid_numeric_value_falls_back_to_default() {
        std::env::set_var("SIMILARITY_THRESHOLD", "not-a-number");
        let config = Config::default();
        assert_eq!(config.graph.similarity_threshold, 0.1);
        std::env::remove_var("SIMILARITY_THRESHOLD");
    }

    #[test]
    #[serial]
    fn test_database_pragmas_from_env() {
        std::env::set_var("DATABASE_BUSY_TIMEOUT_MS", "750");
        std::env::set_var("DATABASE_JOURNAL_MODE", "delete");

        let config = Config::default();
        assert_eq!(config.database.busy_timeout_ms, 750);
        assert_eq!(config.database.journal_mode, "delete");

        std::env::remove_var("DATABASE_BUSY_TIMEOUT_MS");
        std::env::remove_var("DATABASE_JOURNAL_MODE");
        let config = Config::default();
        assert_eq!(
            config.database.busy_timeout_ms,
            DatabaseConfig::DEFAULT_BUSY_TIMEOUT_MS
        );
        assert_eq!(config.database.journal_mode, "WAL");
    }

    #[test]
    #[serial]
    fn test_parse_env_or_valid_value() {
        std::env::set_var("__TEST_PARSE_PORT", "8080");
        let result: u16 = parse_env_or("__TEST_PARSE_PORT", 3000);
        assert_eq!(result, 8080);
        std::env::remove_var("__TEST_PARSE_PORT");
    }
}
