mod client;

pub use client::{GroqClient, DEFAULT_BASE_URL, DEFAULT_MODEL, REASONING_MODEL};
