//! Prompt assembly for classification by analogy

use crate::corpus::Label;
use crate::retrieval::ScoredDocument;
use std::fmt::Write;

const INSTRUCTION: &str = "\
Sen cümleleri 'Öznel' veya 'Nesnel' olarak sınıflandırmada uzman bir asistansın.
Aşağıdaki veri kümesinden alınmış örneklere dayanarak, verilen 'Kullanıcı Cümlesi'nin 'Öznel' mi yoksa 'Nesnel' mi olduğunu belirle.
Sadece 'Öznel' veya 'Nesnel' olarak cevap ver. Başka bir açıklama yapma.";

/// Per-query input to the generative model
#[derive(Debug, Clone, Copy)]
pub struct PromptContext<'a> {
    pub examples: &'a [ScoredDocument],
    pub query: &'a str,
}

impl<'a> PromptContext<'a> {
    pub fn new(examples: &'a [ScoredDocument], query: &'a str) -> Self {
        Self { examples, query }
    }

    /// Render instruction, examples (in retrieval order) and the query.
    ///
    /// Deterministic: the same context always renders the same text.
    pub fn render(&self) -> String {
        let mut prompt = String::with_capacity(
            INSTRUCTION.len() + self.query.len() + self.examples.len() * 64 + 128,
        );

        prompt.push_str(INSTRUCTION);
        prompt.push_str("\n\nVeri Kümesinden Örnekler:\n");
        for example in self.examples {
            // Writing into a String cannot fail
            let _ = writeln!(
                prompt,
                "\"{}\" → {}",
                example.document.content(),
                example.document.label()
            );
        }

        let _ = write!(
            prompt,
            "\nKullanıcı Cümlesi: {}\nSınıflandırma ({}):",
            self.query.trim(),
            Label::ALL.map(|l| l.as_str()).join(" / ")
        );
        prompt
    }
}
