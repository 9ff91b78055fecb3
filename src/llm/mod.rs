//! Generative model collaborator
//!
//! The chain only needs `generate(prompt, temperature) -> text`; everything
//! about the hosted service lives behind [`GenerativeModel`].

mod openai;

pub use openai::OpenAiChatModel;

use crate::config::LlmConfig;
use reqwest::blocking::Client;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Model initialization failed: {0}")]
    InitializationError(String),

    #[error("Generation request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Rate limited by {provider}")]
    RateLimited { provider: String },

    #[error("{provider} API returned {status}: {body}")]
    Api {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("Invalid response from {provider}: {message}")]
    InvalidResponse { provider: String, message: String },

    #[error("{provider} returned no choices")]
    EmptyResponse { provider: String },
}

/// Text generation backend
pub trait GenerativeModel: Send + Sync {
    /// Complete `prompt` and return the raw model text
    fn generate(&self, prompt: &str, temperature: f32) -> Result<String, GenerationError>;

    fn model_name(&self) -> &str;
}

/// Construct the backend named by `llm.provider`
pub fn create_model(
    llm: &LlmConfig,
    client: &Client,
    api_key: &str,
) -> Result<Arc<dyn GenerativeModel>, GenerationError> {
    match llm.provider.as_str() {
        "openai" => Ok(Arc::new(OpenAiChatModel::new(
            client.clone(),
            api_key,
            &llm.base_url,
            llm.model.clone(),
            llm.max_tokens,
        ))),
        other => Err(GenerationError::InitializationError(format!(
            "Unknown LLM provider: {}",
            other
        ))),
    }
}
