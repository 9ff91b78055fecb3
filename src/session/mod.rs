//! Interactive classification loop
//!
//! Reads one sentence per line, classifies it and prints the answer.
//! Per-query failures are reported and the loop keeps going; only the exit
//! keyword or end of input stop it.

use crate::chain::{AnswerOutcome, Classification, Classifier};
use crate::corpus::fold_case;
use std::io::{self, BufRead, Write};
use tracing::{info, info_span, warn};
use uuid::Uuid;

/// Typed by the user to leave the loop (case-insensitive, trimmed)
pub const EXIT_KEYWORD: &str = "çıkış";

pub const INPUT_PROMPT: &str = "Siz: ";

const BANNER_RULE: &str = "-----------------------------------------------------";

/// Whether `line` asks to end the session
pub fn is_exit_command(line: &str) -> bool {
    fold_case(line.trim()) == EXIT_KEYWORD
}

/// Counters reported when the loop ends
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Lines dispatched to the classifier
    pub queries: usize,
    pub recognized: usize,
    pub unrecognized: usize,
    pub failed: usize,
    /// Blank or undecodable lines that were not dispatched
    pub blank: usize,
}

pub struct Session<'a> {
    classifier: &'a dyn Classifier,
    show_sources: bool,
}

impl<'a> Session<'a> {
    pub fn new(classifier: &'a dyn Classifier) -> Self {
        Self {
            classifier,
            show_sources: false,
        }
    }

    /// Also print the retrieved examples after each answer
    pub fn with_sources(mut self, show_sources: bool) -> Self {
        self.show_sources = show_sources;
        self
    }

    /// Run until the exit keyword or end of input
    pub fn run<R: BufRead, W: Write>(
        &self,
        mut input: R,
        mut output: W,
    ) -> io::Result<SessionSummary> {
        let mut summary = SessionSummary::default();

        writeln!(output, "\n{}", BANNER_RULE)?;
        writeln!(output, "Öznel/Nesnel Chatbot'a hoş geldiniz!")?;
        writeln!(
            output,
            "Bir cümle girin veya çıkmak için '{}' yazın.",
            EXIT_KEYWORD
        )?;
        writeln!(output, "{}", BANNER_RULE)?;

        let mut buf = Vec::new();
        loop {
            write!(output, "{}", INPUT_PROMPT)?;
            output.flush()?;

            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                writeln!(output)?;
                break;
            }

            // undecodable lines are skipped like blank ones
            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line,
                Err(e) => {
                    summary.blank += 1;
                    warn!("Input line is not valid UTF-8: {}", e);
                    writeln!(output, "Lütfen geçerli bir cümle girin.")?;
                    continue;
                }
            };

            if is_exit_command(line) {
                writeln!(output, "Chatbot kapatılıyor. Hoşça kalın!")?;
                break;
            }

            let query = line.trim();
            if query.is_empty() {
                summary.blank += 1;
                writeln!(output, "Lütfen bir cümle girin.")?;
                continue;
            }

            summary.queries += 1;
            self.dispatch(query, &mut output, &mut summary)?;
        }

        info!(
            queries = summary.queries,
            recognized = summary.recognized,
            unrecognized = summary.unrecognized,
            failed = summary.failed,
            "Session finished"
        );
        Ok(summary)
    }

    fn dispatch<W: Write>(
        &self,
        query: &str,
        output: &mut W,
        summary: &mut SessionSummary,
    ) -> io::Result<()> {
        let span = info_span!("query", id = %Uuid::new_v4());
        let _guard = span.enter();

        match self.classifier.classify(query) {
            Ok(classification) => {
                match classification.answer.outcome() {
                    AnswerOutcome::Recognized(label) => {
                        summary.recognized += 1;
                        info!(outcome = "recognized", label = %label, "Query classified");
                    }
                    AnswerOutcome::Unrecognized => {
                        summary.unrecognized += 1;
                        warn!(
                            outcome = "unrecognized",
                            raw = %classification.answer.raw_text,
                            "Model answer outside label vocabulary"
                        );
                    }
                }
                writeln!(output, "Bot: {}", classification.answer.display_text())?;
                if self.show_sources {
                    write_sources(output, &classification)?;
                }
            }
            Err(e) => {
                summary.failed += 1;
                warn!(outcome = "failed", stage = %e.stage, "Query failed: {}", e);
                writeln!(output, "HATA: Cevap alınırken bir sorun oluştu: {}", e)?;
            }
        }
        Ok(())
    }
}

/// Print retrieved examples, most similar first
pub fn write_sources<W: Write>(output: &mut W, classification: &Classification) -> io::Result<()> {
    for source in &classification.sources {
        writeln!(
            output,
            "  - \"{}\" → {} ({:.3})",
            source.document.content(),
            source.document.label(),
            source.score
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_keyword_any_case() {
        assert!(is_exit_command("çıkış"));
        assert!(is_exit_command("  ÇIKIŞ \n"));
        assert!(is_exit_command("Çıkış"));
        assert!(!is_exit_command("çıkış yap"));
        assert!(!is_exit_command(""));
    }
}
