/// Exact cosine-similarity index over the corpus embeddings
use super::{EmbeddingError, EmbeddingProvider};
use crate::corpus::Document;
use crate::retrieval::{RetrievalResult, ScoredDocument};
use ndarray::{Array1, Array2};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum VectorIndexError {
    #[error("Cannot build an index from an empty corpus")]
    EmptyCorpus,

    #[error("Index has no entries")]
    EmptyIndex,

    #[error("k must be at least 1")]
    InvalidK,

    #[error("Invalid dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Expected {expected} vectors, got {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("Vector for document {position} contains non-finite values")]
    NonFinite { position: usize },

    #[error("Invalid query vector: {0}")]
    InvalidQuery(String),

    #[error("Index initialization failed: {0}")]
    InitializationError(String),

    #[error("Embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),
}

/// Build-time settings
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Number of documents sent per `embed_batch` call
    pub batch_size: usize,
    /// Dimension every vector must have, when pinned by configuration
    pub expected_dimension: Option<usize>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            batch_size: 64,
            expected_dimension: None,
        }
    }
}

/// Flat vector index with exact cosine scoring.
///
/// Rows are L2-normalized once at construction, so a query is a single
/// matrix-vector product. The index is immutable after construction.
#[derive(Debug)]
pub struct VectorIndex {
    vectors: Array2<f32>,
    documents: Vec<Arc<Document>>,
    dimension: usize,
}

impl VectorIndex {
    /// Embed every document and build the index.
    ///
    /// Fails fast if the provider returns the wrong number of vectors or any
    /// vector whose dimension differs from the expected one. Nothing is
    /// truncated or padded.
    pub fn build(
        documents: Vec<Document>,
        provider: &dyn EmbeddingProvider,
        options: &BuildOptions,
    ) -> Result<Self, VectorIndexError> {
        if documents.is_empty() {
            return Err(VectorIndexError::EmptyCorpus);
        }

        let expected = options.expected_dimension.unwrap_or(provider.dimension());
        if expected != provider.dimension() {
            return Err(VectorIndexError::InvalidDimension {
                expected,
                actual: provider.dimension(),
            });
        }

        info!(
            "Embedding {} documents with {} ({}D)",
            documents.len(),
            provider.model_name(),
            expected
        );

        let texts: Vec<String> = documents.iter().map(|d| d.content().to_string()).collect();
        let batch_size = options.batch_size.max(1);
        let mut vectors = Vec::with_capacity(texts.len());

        for (batch_no, chunk) in texts.chunks(batch_size).enumerate() {
            let batch = provider.embed_batch(chunk)?;
            if batch.len() != chunk.len() {
                return Err(VectorIndexError::CountMismatch {
                    expected: chunk.len(),
                    actual: batch.len(),
                });
            }
            debug!("Embedded batch {} ({} documents)", batch_no, chunk.len());
            vectors.extend(batch);
        }

        Self::from_vectors(documents, vectors, Some(expected))
    }

    /// Build from precomputed vectors, one per document in the same order.
    pub fn from_vectors(
        documents: Vec<Document>,
        vectors: Vec<Vec<f32>>,
        expected_dimension: Option<usize>,
    ) -> Result<Self, VectorIndexError> {
        if documents.is_empty() {
            return Err(VectorIndexError::EmptyCorpus);
        }
        if vectors.len() != documents.len() {
            return Err(VectorIndexError::CountMismatch {
                expected: documents.len(),
                actual: vectors.len(),
            });
        }

        let dimension = expected_dimension.unwrap_or(vectors[0].len());
        if dimension == 0 {
            return Err(VectorIndexError::InitializationError(
                "Vector dimension must be greater than 0".to_string(),
            ));
        }

        let mut flat = Vec::with_capacity(vectors.len() * dimension);
        for (position, vector) in vectors.iter().enumerate() {
            if vector.len() != dimension {
                return Err(VectorIndexError::InvalidDimension {
                    expected: dimension,
                    actual: vector.len(),
                });
            }
            if vector.iter().any(|x| !x.is_finite()) {
                return Err(VectorIndexError::NonFinite { position });
            }
            flat.extend_from_slice(vector);
        }

        let mut matrix = Array2::from_shape_vec((vectors.len(), dimension), flat)
            .map_err(|e| VectorIndexError::InitializationError(e.to_string()))?;

        for mut row in matrix.rows_mut() {
            let norm = row.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm > 0.0 {
                row.mapv_inplace(|x| x / norm);
            }
        }

        info!(
            "Vector index built: {} entries, {} dimensions",
            documents.len(),
            dimension
        );

        Ok(Self {
            vectors: matrix,
            documents: documents.into_iter().map(Arc::new).collect(),
            dimension,
        })
    }

    /// Return the `min(k, len)` most similar documents.
    ///
    /// Results are ordered by descending cosine similarity; equal scores
    /// keep corpus order.
    pub fn search(&self, query: &[f32], k: usize) -> Result<RetrievalResult, VectorIndexError> {
        if k == 0 {
            return Err(VectorIndexError::InvalidK);
        }
        if self.is_empty() {
            return Err(VectorIndexError::EmptyIndex);
        }
        if query.len() != self.dimension {
            return Err(VectorIndexError::InvalidDimension {
                expected: self.dimension,
                actual: query.len(),
            });
        }
        if query.iter().any(|x| !x.is_finite()) {
            return Err(VectorIndexError::InvalidQuery(
                "contains non-finite values".to_string(),
            ));
        }

        let mut query = Array1::from(query.to_vec());
        let norm = query.dot(&query).sqrt();
        if norm > 0.0 {
            query.mapv_inplace(|x| x / norm);
        }

        let scores = self.vectors.dot(&query);

        let mut ranked: Vec<(usize, f32)> = scores.iter().copied().enumerate().collect();
        // sort_by is stable: ties stay in insertion order
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(k);

        Ok(ranked
            .into_iter()
            .map(|(position, score)| ScoredDocument {
                document: Arc::clone(&self.documents[position]),
                score,
            })
            .collect())
    }

    /// Get the number of vectors in the index
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check if index is empty
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Get vector dimension
    pub fn dimension(&self) -> usize {
        self.dimension
    }
}
