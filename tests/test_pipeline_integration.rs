//! End-to-end classification over the two-sentence scenario corpus
//!
//! Corpus loading, index build, retrieval, prompt assembly and answer
//! parsing run for real; only the embedding and generation services are
//! replaced by in-memory fakes.

mod common;

use std::io::Write;
use std::sync::Arc;

use common::*;
use subjectivity::chain::{AnswerOutcome, Classifier, Stage, StageError, GENERATION_TEMPERATURE};
use subjectivity::config::Config;
use subjectivity::context::Context;
use subjectivity::corpus::{CorpusError, CorpusLoader, Label};
use subjectivity::embedding::{BuildOptions, VectorIndex, VectorIndexError};
use subjectivity::error::AppError;
use subjectivity::retrieval::RetrievalError;
use tempfile::NamedTempFile;

#[test]
fn test_scenario_top_match_is_subjective_example() {
    let embedder = Arc::new(TableEmbedder::scenario());
    let model = Arc::new(ScriptedModel::answering(&[]));
    let ctx = scenario_context(embedder, model, 1);

    let results = ctx.chain().retriever().retrieve(QUERY_SENTENCE).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].document.content(), SUBJECTIVE_SENTENCE);
    assert_eq!(results[0].document.label(), Label::Subjective);
}

#[test]
fn test_scenario_canonical_answer_is_recognized() {
    let embedder = Arc::new(TableEmbedder::scenario());
    let model = Arc::new(ScriptedModel::answering(&["Öznel"]));
    let ctx = scenario_context(embedder, model.clone(), 1);

    let classification = ctx.chain().classify(QUERY_SENTENCE).unwrap();
    assert_eq!(
        classification.answer.outcome(),
        AnswerOutcome::Recognized(Label::Subjective)
    );
    assert_eq!(classification.sources.len(), 1);

    let prompts = model.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("\"Bu film harika!\" → Öznel"));
    assert!(!prompts[0].contains(OBJECTIVE_SENTENCE));
    assert!(prompts[0].contains(QUERY_SENTENCE));

    let temperatures = model.temperatures.lock().unwrap();
    assert_eq!(temperatures.as_slice(), &[GENERATION_TEMPERATURE]);
}

#[test]
fn test_scenario_free_text_is_unrecognized() {
    let embedder = Arc::new(TableEmbedder::scenario());
    let model = Arc::new(ScriptedModel::answering(&["Muhtemelen Öznel"]));
    let ctx = scenario_context(embedder, model, 1);

    let classification = ctx.chain().classify(QUERY_SENTENCE).unwrap();
    assert_eq!(classification.answer.outcome(), AnswerOutcome::Unrecognized);
    assert_eq!(classification.answer.raw_text, "Muhtemelen Öznel");
    assert_eq!(classification.answer.label, None);
}

#[test]
fn test_examples_rendered_in_retrieval_order() {
    let embedder = Arc::new(TableEmbedder::scenario());
    let model = Arc::new(ScriptedModel::answering(&["Öznel"]));
    let ctx = scenario_context(embedder, model.clone(), 3);

    let classification = ctx.chain().classify(QUERY_SENTENCE).unwrap();
    assert_eq!(classification.sources.len(), 2);

    let prompts = model.prompts.lock().unwrap();
    let first = prompts[0].find(SUBJECTIVE_SENTENCE).unwrap();
    let second = prompts[0].find(OBJECTIVE_SENTENCE).unwrap();
    assert!(first < second);
}

#[test]
fn test_generation_failure_names_stage() {
    let embedder = Arc::new(TableEmbedder::scenario());
    let model = Arc::new(ScriptedModel::new(vec![Err(generation_failure())]));
    let ctx = scenario_context(embedder, model, 1);

    let err = ctx.chain().classify(QUERY_SENTENCE).unwrap_err();
    assert_eq!(err.stage, Stage::Generate);
    assert!(matches!(err.source, StageError::Generation(_)));
}

#[test]
fn test_embedding_failure_stops_before_generation() {
    let embedder = Arc::new(TableEmbedder::scenario());
    let model = Arc::new(ScriptedModel::answering(&["Öznel"]));
    let ctx = scenario_context(embedder, model.clone(), 1);

    let err = ctx.chain().classify("tabloda olmayan bir cümle").unwrap_err();
    assert_eq!(err.stage, Stage::Retrieve);
    assert!(matches!(
        err.source,
        StageError::Retrieval(RetrievalError::Embedding(_))
    ));
    assert_eq!(model.calls(), 0);
}

#[test]
fn test_corpus_from_file_feeds_index() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Cümle,Tür").unwrap();
    writeln!(file, "{},öznel", SUBJECTIVE_SENTENCE).unwrap();
    writeln!(file, "{},NESNEL", OBJECTIVE_SENTENCE).unwrap();
    writeln!(file, "Etiketsiz cümle,").unwrap();
    writeln!(file, "Garip etiket,Belki").unwrap();
    file.flush().unwrap();

    let documents = CorpusLoader::load_path(file.path()).unwrap();
    assert_eq!(documents.len(), 2);

    let embedder = TableEmbedder::scenario();
    let index = VectorIndex::build(documents, &embedder, &BuildOptions::default()).unwrap();
    assert_eq!(index.len(), 2);
    assert_eq!(index.dimension(), 3);
}

#[test]
fn test_index_build_batches_documents() {
    let embedder = TableEmbedder::new(2, Vec::new()).with_fallback(&[1.0, 0.0]);
    let csv: String = std::iter::once("sentence,label\n".to_string())
        .chain((0..10).map(|i| format!("cümle {},Nesnel\n", i)))
        .collect();
    let documents = CorpusLoader::load_reader(csv.as_bytes()).unwrap();

    let options = BuildOptions {
        batch_size: 3,
        expected_dimension: None,
    };
    let index = VectorIndex::build(documents, &embedder, &options).unwrap();
    assert_eq!(index.len(), 10);
}

#[test]
fn test_configured_dimension_mismatch_is_fatal() {
    let embedder = Arc::new(TableEmbedder::scenario());
    let model = Arc::new(ScriptedModel::answering(&[]));

    let mut config = Config::default();
    config.embedding.dimension = Some(1536);

    let result = Context::assemble(config, scenario_documents(), embedder, model);
    assert!(matches!(
        result,
        Err(AppError::Index(VectorIndexError::InvalidDimension {
            expected: 1536,
            actual: 3
        }))
    ));
}

#[test]
fn test_inconsistent_provider_dimension_is_fatal() {
    // declares 3 dimensions but returns 2 for one document
    let embedder = TableEmbedder::new(
        3,
        vec![
            (SUBJECTIVE_SENTENCE, vec![1.0, 0.0, 0.0]),
            (OBJECTIVE_SENTENCE, vec![1.0, 0.0]),
        ],
    );
    let result = VectorIndex::build(scenario_documents(), &embedder, &BuildOptions::default());
    assert!(matches!(
        result,
        Err(VectorIndexError::InvalidDimension { .. })
    ));
}

#[test]
fn test_empty_corpus_is_setup_error() {
    let result = CorpusLoader::load_reader("Cümle,Tür\nBir şey,Belki\n".as_bytes());
    assert!(matches!(result, Err(CorpusError::Empty { .. })));

    let setup: AppError = result.unwrap_err().into();
    assert!(setup.to_string().contains("No valid documents"));
}
