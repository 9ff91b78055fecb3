/// OpenAI-compatible embeddings over HTTP
use super::{EmbeddingError, EmbeddingProvider};
use crate::http::normalize_base_url;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calls `POST {base_url}/embeddings`.
pub struct OpenAiEmbeddingProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    dimension: usize,
}

impl fmt::Debug for OpenAiEmbeddingProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiEmbeddingProvider")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("dimension", &self.dimension)
            .finish()
    }
}

/// Output dimension of the hosted embedding models
pub fn known_dimension(model: &str) -> Option<usize> {
    match model {
        "text-embedding-3-small" | "text-embedding-ada-002" => Some(1536),
        "text-embedding-3-large" => Some(3072),
        _ => None,
    }
}

impl OpenAiEmbeddingProvider {
    /// `dimension` overrides the built-in table and is required for unknown models
    pub fn new(
        client: Client,
        api_key: impl Into<String>,
        base_url: &str,
        model: impl Into<String>,
        dimension: Option<usize>,
    ) -> Result<Self, EmbeddingError> {
        let model = model.into();
        let dimension = dimension
            .or_else(|| known_dimension(&model))
            .ok_or_else(|| {
                EmbeddingError::InitializationError(format!(
                    "Unknown dimension for embedding model '{}'; set embedding.dimension",
                    model
                ))
            })?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: normalize_base_url(base_url),
            model,
            dimension,
        })
    }

    fn request(&self, input: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let body = EmbeddingRequest {
            model: &self.model,
            input,
        };

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()?;

        let status = response.status();
        let text = response.text()?;

        if !status.is_success() {
            tracing::error!("Embedding API error {status}: {text}");
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        let resp: EmbeddingResponse = serde_json::from_str(&text)
            .map_err(|e| EmbeddingError::GenerationError(format!("Invalid response: {}", e)))?;

        if resp.data.len() != input.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: input.len(),
                actual: resp.data.len(),
            });
        }

        let embeddings = into_input_order(resp.data)?;
        for embedding in &embeddings {
            if embedding.len() != self.dimension {
                return Err(EmbeddingError::DimensionMismatch {
                    expected: self.dimension,
                    actual: embedding.len(),
                });
            }
        }

        Ok(embeddings)
    }
}

impl EmbeddingProvider for OpenAiEmbeddingProvider {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::InvalidInput("Empty text".to_string()));
        }

        self.request(&[text])?
            .pop()
            .ok_or_else(|| EmbeddingError::GenerationError("No embeddings generated".to_string()))
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        if let Some(pos) = texts.iter().position(|t| t.trim().is_empty()) {
            return Err(EmbeddingError::InvalidInput(format!(
                "Empty text at batch position {}",
                pos
            )));
        }

        let input: Vec<&str> = texts.iter().map(String::as_str).collect();
        self.request(&input)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    #[serde(default)]
    index: usize,
}

/// Order vectors by `index`, which must cover `0..data.len()` exactly once
fn into_input_order(mut data: Vec<EmbeddingData>) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    data.sort_by_key(|d| d.index);
    if let Some(position) = data.iter().enumerate().position(|(i, d)| d.index != i) {
        return Err(EmbeddingError::GenerationError(format!(
            "Response indices do not match inputs: expected index {}, got {}",
            position, data[position].index
        )));
    }
    Ok(data.into_iter().map(|d| d.embedding).collect())
}
