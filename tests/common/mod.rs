//! In-memory collaborators shared by the integration tests
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use subjectivity::chain::{ChainError, Classification, ClassificationChain, Classifier};
use subjectivity::config::Config;
use subjectivity::context::Context;
use subjectivity::corpus::{CorpusLoader, Document};
use subjectivity::embedding::{EmbeddingError, EmbeddingProvider};
use subjectivity::llm::{GenerationError, GenerativeModel};

pub const SUBJECTIVE_SENTENCE: &str = "Bu film harika!";
pub const OBJECTIVE_SENTENCE: &str = "Su 100 derecede kaynar.";
pub const QUERY_SENTENCE: &str = "Bence bu kitap çok güzel.";

/// Looks texts up in a fixed table; unknown texts get `fallback` or fail
pub struct TableEmbedder {
    table: HashMap<String, Vec<f32>>,
    fallback: Option<Vec<f32>>,
    dimension: usize,
    pub calls: AtomicUsize,
}

impl TableEmbedder {
    pub fn new(dimension: usize, entries: Vec<(&str, Vec<f32>)>) -> Self {
        Self {
            table: entries
                .into_iter()
                .map(|(text, vector)| (text.to_string(), vector))
                .collect(),
            fallback: None,
            dimension,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_fallback(mut self, vector: &[f32]) -> Self {
        self.fallback = Some(vector.to_vec());
        self
    }

    /// Two-document corpus where the query leans towards the subjective example
    pub fn scenario() -> Self {
        Self::new(
            3,
            vec![
                (SUBJECTIVE_SENTENCE, vec![0.9, 0.1, 0.0]),
                (OBJECTIVE_SENTENCE, vec![0.0, 0.2, 0.9]),
                (QUERY_SENTENCE, vec![0.8, 0.3, 0.1]),
            ],
        )
    }
}

impl EmbeddingProvider for TableEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.table
            .get(text)
            .or(self.fallback.as_ref())
            .cloned()
            .ok_or_else(|| EmbeddingError::GenerationError(format!("no vector for '{}'", text)))
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        "table"
    }
}

/// Returns queued replies in order and records every prompt it receives
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, GenerationError>>>,
    pub prompts: Mutex<Vec<String>>,
    pub temperatures: Mutex<Vec<f32>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<Result<String, GenerationError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
            temperatures: Mutex::new(Vec::new()),
        }
    }

    pub fn answering(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(t.to_string())).collect())
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

impl GenerativeModel for ScriptedModel {
    fn generate(&self, prompt: &str, temperature: f32) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.temperatures.lock().unwrap().push(temperature);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(GenerationError::EmptyResponse {
                    provider: "scripted".into(),
                })
            })
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

pub fn generation_failure() -> GenerationError {
    GenerationError::Api {
        provider: "scripted".into(),
        status: 500,
        body: "internal error".into(),
    }
}

pub fn scenario_documents() -> Vec<Document> {
    let csv = format!(
        "Cümle,Tür\n{},Öznel\n{},Nesnel\n",
        SUBJECTIVE_SENTENCE, OBJECTIVE_SENTENCE
    );
    CorpusLoader::load_reader(csv.as_bytes()).unwrap()
}

/// Context over the two-document scenario corpus with k=1
pub fn scenario_context(
    embedder: Arc<TableEmbedder>,
    model: Arc<ScriptedModel>,
    top_k: usize,
) -> Context {
    let mut config = Config::default();
    config.retrieval.top_k = top_k;
    Context::assemble(config, scenario_documents(), embedder, model).unwrap()
}

/// Counts dispatches; wraps a real chain
pub struct CountingClassifier<'a> {
    pub inner: &'a ClassificationChain,
    pub calls: AtomicUsize,
}

impl<'a> CountingClassifier<'a> {
    pub fn new(inner: &'a ClassificationChain) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Classifier for CountingClassifier<'_> {
    fn classify(&self, query: &str) -> Result<Classification, ChainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.classify(query)
    }
}
