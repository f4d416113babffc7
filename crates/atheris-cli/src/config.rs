use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use atheris::{CompletionOptions, CoordinatorConfig, GroqConfig, ProviderConfig, ProviderType, SimulatedConfig};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub llm: LlmConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(default)]
    pub groq_api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub provider: ProviderType,
    #[serde(default)]
    pub base_url: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    #[serde(default = "default_simulated_delay_ms")]
    pub simulated_delay_ms: u64,
}

fn default_simulated_delay_ms() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatConfig {
    #[serde(default)]
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. ATHERIS_<SECTION>__<KEY> environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let config = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("ATHERIS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let cfg: Config = config.try_deserialize()?;
        cfg.with_api_key(std::env::var("GROQ_API_KEY").ok())
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = ConfigLoader::builder()
            .add_source(File::from(path.as_ref()))
            .build()?;
        config.try_deserialize()
    }

    /// Attach the API key; required only for the Groq provider
    pub fn with_api_key(mut self, api_key: Option<String>) -> Result<Self, ConfigError> {
        self.groq_api_key = api_key.unwrap_or_default();
        if self.llm.provider == ProviderType::Groq && self.groq_api_key.trim().is_empty() {
            return Err(ConfigError::Message(
                "GROQ_API_KEY environment variable is required for the groq provider".to_string(),
            ));
        }
        Ok(self)
    }

    pub fn provider_config(&self) -> ProviderConfig {
        match self.llm.provider {
            ProviderType::Groq => {
                let mut groq = GroqConfig::new(self.groq_api_key.clone());
                if let Some(base_url) = &self.llm.base_url {
                    groq = groq.with_base_url(base_url.clone());
                }
                ProviderConfig::Groq(groq)
            }
            ProviderType::Simulated => ProviderConfig::Simulated(SimulatedConfig {
                char_delay_ms: self.llm.simulated_delay_ms,
            }),
        }
    }

    pub fn coordinator_config(&self) -> CoordinatorConfig {
        let options = CompletionOptions::new()
            .temperature(self.llm.temperature)
            .max_tokens(self.llm.max_tokens);
        let config = CoordinatorConfig::default().with_options(options);

        match self.chat.idle_timeout_secs {
            Some(secs) => config.with_idle_timeout(Duration::from_secs(secs)),
            None => config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOML: &str = r#"
        [llm]
        provider = "simulated"
        temperature = 0.2
        max_tokens = 256
        simulated_delay_ms = 0

        [storage]
        data_dir = "/tmp/atheris"

        [chat]
        idle_timeout_secs = 15

        [logging]
        level = "debug"
        format = "json"
    "#;

    #[test]
    fn test_config_structure() {
        let config: Config = toml::from_str(TOML).unwrap();

        assert_eq!(config.llm.provider, ProviderType::Simulated);
        assert_eq!(config.llm.max_tokens, 256);
        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/atheris"));
        assert_eq!(config.chat.idle_timeout_secs, Some(15));
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_chat_section_optional() {
        let toml = TOML.replace("[chat]\n        idle_timeout_secs = 15", "");
        let config: Config = toml::from_str(&toml).unwrap();

        assert_eq!(config.chat.idle_timeout_secs, None);
        assert_eq!(config.coordinator_config().idle_timeout, None);
    }

    #[test]
    fn test_groq_requires_api_key() {
        let mut config: Config = toml::from_str(TOML).unwrap();
        config.llm.provider = ProviderType::Groq;

        assert!(config.clone().with_api_key(None).is_err());
        assert!(config.clone().with_api_key(Some("  ".into())).is_err());

        let config = config.with_api_key(Some("gsk_test".into())).unwrap();
        match config.provider_config() {
            ProviderConfig::Groq(groq) => assert_eq!(groq.api_key, "gsk_test"),
            _ => panic!("Expected groq provider"),
        }
    }

    #[test]
    fn test_simulated_needs_no_key() {
        let config: Config = toml::from_str(TOML).unwrap();
        let config = config.with_api_key(None).unwrap();

        match config.provider_config() {
            ProviderConfig::Simulated(sim) => assert_eq!(sim.char_delay_ms, 0),
            _ => panic!("Expected simulated provider"),
        }
    }

    #[test]
    fn test_coordinator_options() {
        let config: Config = toml::from_str(TOML).unwrap();
        let coordinator = config.coordinator_config();

        assert_eq!(coordinator.options.temperature, Some(0.2));
        assert_eq!(coordinator.options.max_tokens, Some(256));
        assert_eq!(coordinator.idle_timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_default_file_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/default.toml");
        let config = Config::from_file(path).unwrap();

        assert_eq!(config.llm.provider, ProviderType::Groq);
        assert_eq!(config.chat.idle_timeout_secs, None);
    }
}
