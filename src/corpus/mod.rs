//! Labeled corpus: canonical labels, documents and the CSV loader
//!
//! Documents are the retrieval examples shown to the generative model.
//! They are built once at startup and shared read-only afterwards.

mod loader;

pub use loader::{CorpusError, CorpusLoader, LoadReport};

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two canonical output categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    /// Öznel
    #[serde(rename = "Öznel")]
    Subjective,
    /// Nesnel
    #[serde(rename = "Nesnel")]
    Objective,
}

impl Label {
    pub const ALL: [Label; 2] = [Label::Subjective, Label::Objective];

    /// Canonical spelling used in the corpus, prompts and answers
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Subjective => "Öznel",
            Label::Objective => "Nesnel",
        }
    }

    /// Exact, case-insensitive match against the canonical vocabulary.
    ///
    /// Surrounding whitespace is ignored; anything else (extra words,
    /// punctuation) yields `None`.
    pub fn parse(text: &str) -> Option<Label> {
        let folded = fold_case(text.trim());
        Self::ALL
            .into_iter()
            .find(|label| fold_case(label.as_str()) == folded)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A labeled sentence used as a retrieval example
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    content: String,
    label: Label,
}

impl Document {
    /// Returns `None` when `content` is blank after trimming.
    pub fn new(content: impl Into<String>, label: Label) -> Option<Self> {
        let content = content.into();
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return None;
        }

        Some(Self {
            content: trimmed.to_string(),
            label,
        })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn label(&self) -> Label {
        self.label
    }
}

/// Lowercase with Turkish dotted/dotless I rules.
///
/// `str::to_lowercase` maps `I` to `i` and `İ` to `i̇`, which breaks
/// comparisons such as `ÇIKIŞ` == `çıkış`.
pub fn fold_case(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            'I' => folded.push('ı'),
            'İ' => folded.push('i'),
            _ => folded.extend(c.to_lowercase()),
        }
    }
    folded
}
