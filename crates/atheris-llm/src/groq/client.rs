// Groq client (OpenAI-compatible chat completions over HTTP)

use crate::buffer_utils::parse_sse_stream;
use crate::streaming::ChatChunkParser;
use crate::traits::{
    CompletionClient, CompletionRequest, CompletionResponse, CompletionStream, TokenUsage,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Model used when the caller does not pick one
pub const DEFAULT_MODEL: &str = "llama3-8b-8192";

/// Reasoning exchanges always run on this model, whatever the caller selected
pub const REASONING_MODEL: &str = "deepseek-r1-distill-llama-70b";

pub struct GroqClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl GroqClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .context("Invalid API key format")?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Model actually sent upstream for this request
    pub fn effective_model(request: &CompletionRequest) -> &str {
        if request.options.use_reasoning {
            REASONING_MODEL
        } else if request.model.is_empty() {
            DEFAULT_MODEL
        } else {
            &request.model
        }
    }

    pub(crate) fn build_payload(request: &CompletionRequest, stream: bool) -> Value {
        let mut payload = serde_json::json!({
            "model": Self::effective_model(request),
            "messages": request.messages,
            "stream": stream,
        });

        if let Some(obj) = payload.as_object_mut() {
            if let Some(temp) = request.options.temperature {
                obj.insert("temperature".to_string(), serde_json::json!(temp));
            }
            if let Some(max_tokens) = request.options.max_tokens {
                obj.insert("max_tokens".to_string(), serde_json::json!(max_tokens));
            }
            if request.options.use_reasoning {
                obj.insert("reasoning_format".to_string(), serde_json::json!("parsed"));
            }
        }

        payload
    }

    async fn post(&self, payload: &Value) -> Result<reqwest::Response> {
        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .json(payload)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Groq API error ({}): {}", status, error_text);
        }

        Ok(response)
    }
}

#[async_trait]
impl CompletionClient for GroqClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let payload = Self::build_payload(&request, false);
        tracing::debug!(model = %Self::effective_model(&request), "sending chat completion");

        let raw: GroqChatResponse = self
            .post(&payload)
            .await?
            .json()
            .await
            .context("Failed to parse response")?;

        let choice = raw.choices.first();
        Ok(CompletionResponse {
            content: choice.and_then(|c| c.message.content.clone()),
            reasoning: choice.and_then(|c| c.message.reasoning.clone()),
            model: raw.model.clone(),
            usage: raw.usage.as_ref().map(|u| TokenUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            finish_reason: choice.and_then(|c| c.finish_reason.clone()),
        })
    }

    async fn stream_completion(&self, request: CompletionRequest) -> Result<CompletionStream> {
        let payload = Self::build_payload(&request, true);
        tracing::debug!(
            model = %Self::effective_model(&request),
            messages = request.messages.len(),
            reasoning = request.options.use_reasoning,
            "opening chat completion stream"
        );

        let response = self.post(&payload).await?;

        Ok(parse_sse_stream(response.bytes_stream(), ChatChunkParser))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GroqChatResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub model: String,
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Choice {
    pub index: u32,
    pub message: ResponseMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ResponseMessage {
    pub role: String,
    pub content: Option<String>,
    pub reasoning: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}
