/// CSV corpus loader with row validation
use super::{Document, Label};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("Data file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Failed to read data file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed CSV: {0}")]
    Parse(#[from] csv::Error),

    #[error("Expected at least 2 columns (sentence, label), found {found}: {columns:?}")]
    MissingColumns { found: usize, columns: Vec<String> },

    #[error("No valid documents could be loaded ({rows} rows read)")]
    Empty { rows: usize },
}

/// Row accounting for a single load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub rows: usize,
    pub kept: usize,
    pub skipped_empty: usize,
    pub skipped_label: usize,
}

/// Reads `sentence,label` CSV files into validated documents.
///
/// The header row is skipped and the first two columns are taken
/// positionally regardless of their header text. Extra columns are ignored.
pub struct CorpusLoader;

impl CorpusLoader {
    /// Load and validate a corpus file
    pub fn load_path(path: &Path) -> Result<Vec<Document>, CorpusError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CorpusError::NotFound {
                path: path.to_path_buf(),
            },
            _ => CorpusError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        info!("Loading corpus from {}", path.display());
        Self::load_reader(file)
    }

    /// Load and validate a corpus from any reader
    pub fn load_reader<R: Read>(reader: R) -> Result<Vec<Document>, CorpusError> {
        let (documents, report) = Self::load_with_report(reader)?;
        info!(
            "{} documents loaded ({} rows, {} empty, {} unknown label)",
            report.kept, report.rows, report.skipped_empty, report.skipped_label
        );
        Ok(documents)
    }

    /// Same as [`CorpusLoader::load_reader`] but also returns row accounting
    pub fn load_with_report<R: Read>(
        reader: R,
    ) -> Result<(Vec<Document>, LoadReport), CorpusError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?;
        if headers.len() < 2 {
            return Err(CorpusError::MissingColumns {
                found: headers.len(),
                columns: headers.iter().map(str::to_string).collect(),
            });
        }

        let mut report = LoadReport::default();
        let mut documents = Vec::new();

        // A bad record anywhere aborts the whole load
        for record in csv_reader.records() {
            let record = record?;
            report.rows += 1;

            let sentence = record.get(0).unwrap_or_default().trim();
            let raw_label = record.get(1).unwrap_or_default().trim();

            if sentence.is_empty() || raw_label.is_empty() {
                debug!("Skipping row {}: empty sentence or label", report.rows);
                report.skipped_empty += 1;
                continue;
            }

            let Some(label) = Label::parse(raw_label) else {
                debug!("Skipping row {}: unknown label '{}'", report.rows, raw_label);
                report.skipped_label += 1;
                continue;
            };

            match Document::new(sentence, label) {
                Some(doc) => {
                    documents.push(doc);
                    report.kept += 1;
                }
                None => report.skipped_empty += 1,
            }
        }

        if documents.is_empty() {
            return Err(CorpusError::Empty { rows: report.rows });
        }

        Ok((documents, report))
    }
}
