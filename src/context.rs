//! Startup context
//!
//! Everything that lives for the whole process (corpus, index, service
//! clients) is built once here and handed to the loop by reference.
//! Any failure in this module is a setup error and aborts startup.

use crate::chain::ClassificationChain;
use crate::config::{Config, ConfigValidator};
use crate::corpus::{CorpusLoader, Document};
use crate::embedding::{create_provider, BuildOptions, EmbeddingProvider, VectorIndex};
use crate::error::{AppError, Result};
use crate::http::build_client;
use crate::llm::{create_model, GenerativeModel};
use crate::retrieval::Retriever;
use std::sync::Arc;
use tracing::{info, warn};

pub struct Context {
    chain: ClassificationChain,
}

impl Context {
    /// Credential, corpus, embedding backend, index and model, in that order
    pub fn bootstrap(config: Config) -> Result<Self> {
        ConfigValidator::validate(&config)?;

        let api_key = read_credential(&config.llm.api_key_env)?;

        let client = build_client(&config.http)
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        let documents = CorpusLoader::load_path(&config.corpus.path)?;

        let provider = create_provider(&config.embedding, &config.llm, &client, &api_key)?;
        let model = create_model(&config.llm, &client, &api_key)?;

        Self::assemble(config, documents, provider, model)
    }

    /// Build the index and chain from already constructed collaborators
    pub fn assemble(
        config: Config,
        documents: Vec<Document>,
        provider: Arc<dyn EmbeddingProvider>,
        model: Arc<dyn GenerativeModel>,
    ) -> Result<Self> {
        let options = BuildOptions {
            batch_size: config.embedding.batch_size,
            expected_dimension: config.embedding.dimension,
        };
        let index = VectorIndex::build(documents, provider.as_ref(), &options)?;

        if config.retrieval.top_k > index.len() {
            warn!(
                "top_k ({}) exceeds corpus size ({}); every document will be retrieved",
                config.retrieval.top_k,
                index.len()
            );
        }

        info!(
            "Classifier ready: {} documents, embeddings={}, model={}, k={}",
            index.len(),
            provider.model_name(),
            model.model_name(),
            config.retrieval.top_k
        );

        let retriever = Retriever::new(provider, Arc::new(index), config.retrieval.top_k);
        let chain = ClassificationChain::new(retriever, model);

        Ok(Self { chain })
    }

    pub fn chain(&self) -> &ClassificationChain {
        &self.chain
    }

    /// Number of documents in the index
    pub fn corpus_size(&self) -> usize {
        self.chain.retriever().index().len()
    }
}

/// Read the API key from the environment; blank counts as missing
pub fn read_credential(var: &str) -> Result<String> {
    match std::env::var(var) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(AppError::MissingCredential {
            var: var.to_string(),
        }),
    }
}
