/// Embedding & Indexing
///
/// - EmbeddingProvider trait for abstraction over backends
/// - OpenAiEmbeddingProvider for hosted embeddings (default)
/// - FastEmbedProvider for local, offline embeddings
/// - VectorIndex for exact cosine nearest-neighbor search
mod openai;
mod provider;
mod vector_index;

pub use openai::{known_dimension, OpenAiEmbeddingProvider};
pub use provider::{EmbeddingError, EmbeddingProvider, FastEmbedProvider};
pub use vector_index::{BuildOptions, VectorIndex, VectorIndexError};

use crate::config::{EmbeddingConfig, LlmConfig};
use reqwest::blocking::Client;
use std::sync::Arc;

/// Construct the embedding backend named by `embedding.provider`.
///
/// The OpenAI backend shares the HTTP client, credential and base URL of
/// the generative model.
pub fn create_provider(
    embedding: &EmbeddingConfig,
    llm: &LlmConfig,
    client: &Client,
    api_key: &str,
) -> Result<Arc<dyn EmbeddingProvider>, EmbeddingError> {
    match embedding.provider.as_str() {
        "openai" => Ok(Arc::new(OpenAiEmbeddingProvider::new(
            client.clone(),
            api_key,
            &llm.base_url,
            embedding.model.clone(),
            embedding.dimension,
        )?)),
        "fastembed" => Ok(Arc::new(FastEmbedProvider::new(&embedding.model)?)),
        other => Err(EmbeddingError::InitializationError(format!(
            "Unknown embedding provider: {}",
            other
        ))),
    }
}
