//! Catalog of selectable providers and models

use crate::groq::DEFAULT_MODEL;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelInfo {
    pub id: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct ProviderInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub api_endpoint: &'static str,
    pub models: &'static [ModelInfo],
    pub is_default: bool,
}

pub const PROVIDERS: &[ProviderInfo] = &[
    ProviderInfo {
        id: "atheris",
        name: "Atheris AI",
        description: "Atheris is an AI assistant powered by Groq and various Llama models",
        api_endpoint: "/api/chat",
        models: &[
            ModelInfo { id: "llama3-8b-8192", name: "Llama 3 8B" },
            ModelInfo { id: "llama-3.3-70b-versatile", name: "Llama 3.3 70B Versatile" },
            ModelInfo { id: "llama-3.1-8b-instant", name: "Llama 3.1 8B Instant" },
            ModelInfo { id: "meta-llama/llama-4-maverick-17b-128e-instruct", name: "Llama 4 Maverick 17B" },
            ModelInfo { id: "meta-llama/llama-4-scout-17b-16e-instruct", name: "Llama 4 Scout 17B" },
            ModelInfo { id: "mistral-saba-24b", name: "Mistral Saba 24B" },
        ],
        is_default: true,
    },
    ProviderInfo {
        id: "groq",
        name: "Groq",
        description: "Groq API providing fast inference for large language models",
        api_endpoint: "https://api.groq.com/openai/v1",
        models: &[
            ModelInfo { id: "llama-3.1-8b-instant", name: "Llama 3.1 8B Instant" },
            ModelInfo { id: "mixtral-8x7b-32768", name: "Mixtral 8x7B 32k" },
            ModelInfo { id: "gemma-7b-it", name: "Gemma 7B" },
        ],
        is_default: false,
    },
];

pub fn default_provider() -> &'static ProviderInfo {
    PROVIDERS
        .iter()
        .find(|p| p.is_default)
        .unwrap_or(&PROVIDERS[0])
}

/// Models offered by the default provider
pub fn available_models() -> &'static [ModelInfo] {
    default_provider().models
}

pub fn find_model(id: &str) -> Option<&'static ModelInfo> {
    PROVIDERS
        .iter()
        .flat_map(|p| p.models.iter())
        .find(|m| m.id == id)
}

/// Display name for a model id, falling back to the id itself
pub fn display_name(id: &str) -> &str {
    find_model(id).map(|m| m.name).unwrap_or(id)
}

pub fn default_model() -> &'static str {
    DEFAULT_MODEL
}
