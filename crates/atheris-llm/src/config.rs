// Provider configuration and client factory

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::groq::{GroqClient, DEFAULT_BASE_URL};
use crate::simulated::SimulatedClient;
use crate::traits::CompletionClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    Groq,
    Simulated,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroqConfig {
    pub api_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl GroqConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatedConfig {
    #[serde(default = "default_char_delay_ms")]
    pub char_delay_ms: u64,
}

fn default_char_delay_ms() -> u64 {
    30
}

impl Default for SimulatedConfig {
    fn default() -> Self {
        Self {
            char_delay_ms: default_char_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Groq(GroqConfig),
    Simulated(SimulatedConfig),
}

impl ProviderConfig {
    pub fn groq(api_key: impl Into<String>) -> Self {
        Self::Groq(GroqConfig::new(api_key))
    }

    pub fn simulated() -> Self {
        Self::Simulated(SimulatedConfig::default())
    }

    pub fn provider_type(&self) -> ProviderType {
        match self {
            Self::Groq(_) => ProviderType::Groq,
            Self::Simulated(_) => ProviderType::Simulated,
        }
    }
}

pub struct ClientFactory;

impl ClientFactory {
    pub fn create_client(config: ProviderConfig) -> Result<Arc<dyn CompletionClient>> {
        match config {
            ProviderConfig::Groq(groq) => {
                let base_url = groq.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
                tracing::info!(%base_url, "creating Groq completion client");
                Ok(Arc::new(GroqClient::with_base_url(groq.api_key, base_url)?))
            }
            ProviderConfig::Simulated(sim) => {
                tracing::info!(char_delay_ms = sim.char_delay_ms, "creating simulated completion client");
                Ok(Arc::new(SimulatedClient::with_delay(Duration::from_millis(
                    sim.char_delay_ms,
                ))))
            }
        }
    }
}
