//! Retrieval-augmented classification chain
//!
//! One call walks `Retrieve -> Assemble -> Generate -> Parse`. A failure in
//! any stage ends the call with a [`ChainError`] naming that stage; the chain
//! itself keeps no state between calls and never retries.

use crate::corpus::Label;
use crate::llm::{GenerationError, GenerativeModel};
use crate::prompt::PromptContext;
use crate::retrieval::{RetrievalError, RetrievalResult, Retriever};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Lowest temperature the chat API accepts
pub const GENERATION_TEMPERATURE: f32 = 0.0;

/// Chain stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Retrieve,
    Assemble,
    Generate,
    Parse,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Retrieve => "retrieve",
            Stage::Assemble => "assemble",
            Stage::Generate => "generate",
            Stage::Parse => "parse",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum StageError {
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Recoverable per-query failure
#[derive(Error, Debug)]
#[error("{stage} stage failed: {source}")]
pub struct ChainError {
    pub stage: Stage,
    pub source: StageError,
}

impl ChainError {
    pub fn new(stage: Stage, source: impl Into<StageError>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }
}

/// Whether the model stayed inside the label vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Recognized(Label),
    Unrecognized,
}

/// Model output plus the label it maps to, if any
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationAnswer {
    pub raw_text: String,
    pub label: Option<Label>,
}

impl ClassificationAnswer {
    /// Strict parse: only an exact (case-insensitive, trimmed) label counts.
    /// Free text is kept verbatim and never coerced into a label.
    pub fn parse(raw_text: impl Into<String>) -> Self {
        let raw_text = raw_text.into();
        let label = Label::parse(&raw_text);
        Self { raw_text, label }
    }

    pub fn outcome(&self) -> AnswerOutcome {
        match self.label {
            Some(label) => AnswerOutcome::Recognized(label),
            None => AnswerOutcome::Unrecognized,
        }
    }

    pub fn is_recognized(&self) -> bool {
        self.label.is_some()
    }

    /// Canonical label when recognized, otherwise the trimmed model text
    pub fn display_text(&self) -> &str {
        match self.label {
            Some(label) => label.as_str(),
            None => self.raw_text.trim(),
        }
    }
}

/// Answer together with the examples it was derived from
#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    pub answer: ClassificationAnswer,
    pub sources: RetrievalResult,
}

/// Seam between the interactive loop and the chain
pub trait Classifier {
    fn classify(&self, query: &str) -> Result<Classification, ChainError>;
}

pub struct ClassificationChain {
    retriever: Retriever,
    model: Arc<dyn GenerativeModel>,
}

impl ClassificationChain {
    pub fn new(retriever: Retriever, model: Arc<dyn GenerativeModel>) -> Self {
        Self { retriever, model }
    }

    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }
}

impl Classifier for ClassificationChain {
    fn classify(&self, query: &str) -> Result<Classification, ChainError> {
        debug!(stage = %Stage::Retrieve, "chain stage");
        let sources = self
            .retriever
            .retrieve(query)
            .map_err(|e| ChainError::new(Stage::Retrieve, e))?;

        debug!(stage = %Stage::Assemble, examples = sources.len(), "chain stage");
        let prompt = PromptContext::new(&sources, query).render();

        debug!(stage = %Stage::Generate, model = self.model.model_name(), "chain stage");
        let raw = self
            .model
            .generate(&prompt, GENERATION_TEMPERATURE)
            .map_err(|e| ChainError::new(Stage::Generate, e))?;

        debug!(stage = %Stage::Parse, "chain stage");
        let answer = ClassificationAnswer::parse(raw);

        Ok(Classification { answer, sources })
    }
}
