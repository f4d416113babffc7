pub mod types;
pub mod traits;
pub mod streaming;
pub mod buffer_utils;
pub mod groq;
pub mod simulated;
pub mod config;
pub mod models;

pub use traits::{
    CompletionClient,
    CompletionRequest, CompletionResponse, CompletionOptions, CompletionStream,
    TokenUsage,
};

pub use streaming::StreamEvent;
pub use buffer_utils::LineBuffer;
pub use groq::{GroqClient, DEFAULT_MODEL, REASONING_MODEL};
pub use simulated::SimulatedClient;
pub use config::{ClientFactory, ProviderConfig, GroqConfig, SimulatedConfig, ProviderType};
pub use types::{ChatMessage, Role};
