//! Subjectivity - retrieval-augmented sentence classifier
//!
//! Embeds a labeled corpus of Turkish sentences, retrieves the examples most
//! similar to an incoming sentence, and asks a language model to label it as
//! subjective (`Öznel`) or objective (`Nesnel`) by analogy.

pub mod chain;
pub mod cli;
pub mod config;
pub mod context;
pub mod corpus;
pub mod embedding;
pub mod error;
pub mod http;
pub mod llm;
pub mod prompt;
pub mod retrieval;
pub mod session;

pub use error::{AppError, Result};
