//! Nearest-neighbor retrieval of labeled examples
//!
//! The retriever is a thin composition layer: embed the query, then ask the
//! vector index for the top `k` documents. There is no caching and no retry;
//! failures from either step propagate unchanged.

use crate::corpus::Document;
use crate::embedding::{EmbeddingError, EmbeddingProvider, VectorIndex, VectorIndexError};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// Default number of examples retrieved per query
pub const DEFAULT_TOP_K: usize = 3;

#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("Query embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Vector search failed: {0}")]
    Index(#[from] VectorIndexError),
}

/// A document with its similarity to the query
#[derive(Debug, Clone, Serialize)]
pub struct ScoredDocument {
    pub document: Arc<Document>,
    /// Cosine similarity in [-1, 1], higher is more similar
    pub score: f32,
}

/// Ranked documents, most similar first
pub type RetrievalResult = Vec<ScoredDocument>;

/// Fixed top-k retriever over a shared index
#[derive(Clone)]
pub struct Retriever {
    provider: Arc<dyn EmbeddingProvider>,
    index: Arc<VectorIndex>,
    top_k: usize,
}

impl Retriever {
    pub fn new(
        provider: Arc<dyn EmbeddingProvider>,
        index: Arc<VectorIndex>,
        top_k: usize,
    ) -> Self {
        Self {
            provider,
            index,
            top_k,
        }
    }

    /// Retrieve with the configured `k`
    pub fn retrieve(&self, query: &str) -> Result<RetrievalResult, RetrievalError> {
        self.retrieve_k(query, self.top_k)
    }

    /// Retrieve with an explicit `k`
    pub fn retrieve_k(&self, query: &str, k: usize) -> Result<RetrievalResult, RetrievalError> {
        let vector = self.provider.embed(query)?;
        let results = self.index.search(&vector, k)?;
        tracing::debug!("Retrieved {} examples (k={})", results.len(), k);
        Ok(results)
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Label;
    use std::collections::HashMap;

    struct TableEmbedder {
        table: HashMap<&'static str, Vec<f32>>,
    }

    impl EmbeddingProvider for TableEmbedder {
        fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
            self.table
                .get(text)
                .cloned()
                .ok_or_else(|| EmbeddingError::GenerationError(format!("no vector for {}", text)))
        }

        fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            texts.iter().map(|t| self.embed(t)).collect()
        }

        fn dimension(&self) -> usize {
            2
        }

        fn model_name(&self) -> &str {
            "table"
        }
    }

    fn retriever(top_k: usize) -> Retriever {
        let provider = Arc::new(TableEmbedder {
            table: HashMap::from([
                ("Bu film harika!", vec![1.0, 0.1]),
                ("Su 100 derecede kaynar.", vec![0.0, 1.0]),
                ("Bence bu kitap çok güzel.", vec![0.9, 0.2]),
            ]),
        });
        let docs = vec![
            Document::new("Bu film harika!", Label::Subjective).unwrap(),
            Document::new("Su 100 derecede kaynar.", Label::Objective).unwrap(),
        ];
        let index = VectorIndex::build(docs, provider.as_ref(), &Default::default()).unwrap();
        Retriever::new(provider, Arc::new(index), top_k)
    }

    #[test]
    fn test_retrieve_uses_configured_k() {
        let retriever = retriever(1);
        let results = retriever.retrieve("Bence bu kitap çok güzel.").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].document.content(), "Bu film harika!");
        assert_eq!(results[0].document.label(), Label::Subjective);
    }

    #[test]
    fn test_retrieve_k_caps_at_corpus_size() {
        let retriever = retriever(DEFAULT_TOP_K);
        let results = retriever.retrieve("Bence bu kitap çok güzel.").unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].score >= results[1].score);
    }

    #[test]
    fn test_embedding_failure_propagates() {
        let retriever = retriever(1);
        let result = retriever.retrieve("bilinmeyen cümle");
        assert!(matches!(result, Err(RetrievalError::Embedding(_))));
    }

    #[test]
    fn test_zero_k_is_index_error() {
        let retriever = retriever(1);
        let result = retriever.retrieve_k("Bu film harika!", 0);
        assert!(matches!(
            result,
            Err(RetrievalError::Index(VectorIndexError::InvalidK))
        ));
    }
}
