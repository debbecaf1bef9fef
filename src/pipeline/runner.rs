//! Pipeline runner: orchestrates the stages and writes the exports.
//!
//! The brown pass runs load → count → rank → sentences and writes three
//! files; the gutenberg pass is independent and writes one. Each stage fully
//! materializes its table before the next one starts.

use crate::config::PipelineConfig;
use crate::corpus::{CorpusReader, CorpusStore, PlaintextCorpusReader, TaggedCorpusReader};
use crate::errors::{
    ErrorCode, PipelineError, Result, STAGE_COUNT, STAGE_EXPORT, STAGE_FETCH, STAGE_LOAD,
    STAGE_RANK, STAGE_SENTENCES,
};
use crate::nlp::Tokenizer;
use crate::pipeline::count::tokenize_and_count;
use crate::pipeline::export::{write_gutenberg, write_ranked, write_sentences};
use crate::pipeline::gutenberg::gutenberg_records;
use crate::pipeline::sentences::{extract_sentences, SentenceTable};
use crate::types::{GutenbergRecord, RankedTable};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// Enter a tracing span for a pipeline stage.
macro_rules! trace_stage {
    ($name:expr) => {
        let _span = tracing::info_span!("pipeline_stage", stage = $name).entered();
    };
}

/// Summary of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    /// Documents in the ranked table
    pub documents: usize,
    /// Documents kept as the top-N prefix
    pub top_documents: usize,
    /// Sentences written to the sentence table
    pub sentences: usize,
    /// Gutenberg documents exported (`None` when skipped)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gutenberg_documents: Option<usize>,
    /// Files written, in write order
    pub files: Vec<PathBuf>,
}

impl PipelineReport {
    /// Pretty-printed JSON form of the report.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            PipelineError::new(ErrorCode::ExportWriteFailure, STAGE_EXPORT, e.to_string())
        })
    }
}

/// The configured corpus pipeline.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    tokenizer: Tokenizer,
}

impl Pipeline {
    /// Build a pipeline; the config is validated here.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            tokenizer: Tokenizer::new(),
        })
    }

    /// Replace the tokenizer
    pub fn with_tokenizer(mut self, tokenizer: Tokenizer) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Ensure both corpora are present locally without running any stage.
    pub fn fetch(&self, store: &mut CorpusStore) -> Result<(PathBuf, Option<PathBuf>)> {
        trace_stage!(STAGE_FETCH);
        let brown = store.ensure_available(&self.config.brown_corpus)?;
        let gutenberg = if self.config.skip_gutenberg {
            None
        } else {
            Some(store.ensure_available(&self.config.gutenberg_corpus)?)
        };
        Ok((brown, gutenberg))
    }

    /// Run the brown pass, then fetch and export gutenberg.
    ///
    /// The gutenberg corpus is only fetched once the brown files are
    /// written, so a gutenberg outage leaves the brown exports in place.
    pub fn run(&self, store: &mut CorpusStore) -> Result<PipelineReport> {
        let brown_dir = {
            trace_stage!(STAGE_FETCH);
            store.ensure_available(&self.config.brown_corpus)?
        };
        let mut report = self.run_brown(&TaggedCorpusReader::brown(brown_dir))?;

        if !self.config.skip_gutenberg {
            let gutenberg_dir = {
                trace_stage!(STAGE_FETCH);
                store.ensure_available(&self.config.gutenberg_corpus)?
            };
            self.run_gutenberg(&PlaintextCorpusReader::gutenberg(gutenberg_dir), &mut report)?;
        }

        log_finished(&report);
        Ok(report)
    }

    /// Run every stage over already-available readers.
    pub fn run_with_readers(
        &self,
        brown: &dyn CorpusReader,
        gutenberg: Option<&dyn CorpusReader>,
    ) -> Result<PipelineReport> {
        let mut report = self.run_brown(brown)?;
        if let Some(reader) = gutenberg {
            self.run_gutenberg(reader, &mut report)?;
        }
        log_finished(&report);
        Ok(report)
    }

    /// Count, rank and split brown, then write its three tables.
    fn run_brown(&self, brown: &dyn CorpusReader) -> Result<PipelineReport> {
        self.prepare_output_dir()?;
        let mut report = PipelineReport::default();

        let ranked = self.rank(brown)?;
        let top = ranked.top(self.config.top_n);
        report.documents = ranked.len();
        report.top_documents = top.len();

        let sentences = self.sentences(&ranked);
        report.sentences = sentences.len();

        trace_stage!(STAGE_EXPORT);
        let sorted_path = self.config.sorted_path();
        write_ranked(&sorted_path, ranked.documents())?;
        report.files.push(sorted_path);

        let top_path = self.config.top_path();
        write_ranked(&top_path, top)?;
        report.files.push(top_path);

        let sentences_path = self.config.sentences_path();
        write_sentences(&sentences_path, &sentences.records)?;
        report.files.push(sentences_path);

        Ok(report)
    }

    fn run_gutenberg(&self, reader: &dyn CorpusReader, report: &mut PipelineReport) -> Result<()> {
        let records = self.gutenberg(reader)?;
        trace_stage!(STAGE_EXPORT);
        let path = self.config.gutenberg_path();
        write_gutenberg(&path, &records)?;
        report.gutenberg_documents = Some(records.len());
        report.files.push(path);
        Ok(())
    }

    /// Load, tokenize and count every document, then rank by count.
    pub fn rank(&self, reader: &dyn CorpusReader) -> Result<RankedTable> {
        let documents = {
            trace_stage!(STAGE_COUNT);
            tokenize_and_count(reader, &self.tokenizer)?
        };
        info!(corpus = reader.name(), documents = documents.len(), "counted corpus");

        trace_stage!(STAGE_RANK);
        Ok(RankedTable::from_documents(documents))
    }

    /// Numbered sentences from the top-N prefix of `ranked`.
    pub fn sentences(&self, ranked: &RankedTable) -> SentenceTable {
        trace_stage!(STAGE_SENTENCES);
        extract_sentences(&self.tokenizer, ranked.top(self.config.top_n))
    }

    /// Joined-text records for every gutenberg document.
    pub fn gutenberg(&self, reader: &dyn CorpusReader) -> Result<Vec<GutenbergRecord>> {
        trace_stage!(STAGE_LOAD);
        let records = gutenberg_records(reader)?;
        info!(corpus = reader.name(), documents = records.len(), "joined corpus");
        Ok(records)
    }

    fn prepare_output_dir(&self) -> Result<()> {
        let dir = &self.config.output_dir;
        std::fs::create_dir_all(dir).map_err(|e| {
            PipelineError::export_write(dir.display().to_string(), e.to_string())
                .with_hint("Check that --output-dir is writable")
        })
    }
}

fn log_finished(report: &PipelineReport) {
    info!(
        documents = report.documents,
        top = report.top_documents,
        sentences = report.sentences,
        "pipeline finished"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    /// In-memory corpus for stage tests.
    struct MemoryCorpus {
        docs: FxHashMap<String, Vec<String>>,
    }

    impl MemoryCorpus {
        fn new(docs: &[(&str, &str)]) -> Self {
            Self {
                docs: docs
                    .iter()
                    .map(|(id, text)| {
                        (id.to_string(), text.split(' ').map(str::to_string).collect())
                    })
                    .collect(),
            }
        }
    }

    impl CorpusReader for MemoryCorpus {
        fn name(&self) -> &str {
            "memory"
        }

        fn fileids(&self) -> Result<Vec<String>> {
            let mut ids: Vec<String> = self.docs.keys().cloned().collect();
            ids.sort();
            Ok(ids)
        }

        fn words(&self, fileid: &str) -> Result<Vec<String>> {
            self.docs
                .get(fileid)
                .cloned()
                .ok_or_else(|| PipelineError::corpus_format(fileid, "no such document"))
        }
    }

    #[test]
    fn test_rank_orders_by_token_count() {
        // a: 5 words → 5 tokens; b: 20 words with two contractions → 22 tokens
        let corpus = MemoryCorpus::new(&[
            ("a", "The jury met today ."),
            (
                "b",
                "They don't say it and we can't say it either so the jury went home \
                 at noon on Friday .",
            ),
        ]);
        let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
        let ranked = pipeline.rank(&corpus).unwrap();

        let order: Vec<(&str, usize)> = ranked
            .documents()
            .iter()
            .map(|d| (d.id.as_str(), d.word_count()))
            .collect();
        assert_eq!(order, vec![("b", 22), ("a", 5)]);
        assert_eq!(ranked.documents()[0].words.len(), 20);
    }

    #[test]
    fn test_sentences_only_from_top_n() {
        let corpus = MemoryCorpus::new(&[
            ("a", "Short one ."),
            ("b", "A much longer document here . It has two sentences ."),
        ]);
        let pipeline = Pipeline::new(PipelineConfig::default().with_top_n(1)).unwrap();
        let ranked = pipeline.rank(&corpus).unwrap();
        let sentences = pipeline.sentences(&ranked);

        assert_eq!(sentences.len(), 2);
        assert!(sentences.records.iter().all(|r| r.text_id == "b"));
    }

    #[test]
    fn test_missing_document_propagates() {
        struct Broken;
        impl CorpusReader for Broken {
            fn name(&self) -> &str {
                "broken"
            }
            fn fileids(&self) -> Result<Vec<String>> {
                Ok(vec!["ghost".to_string()])
            }
            fn words(&self, fileid: &str) -> Result<Vec<String>> {
                Err(PipelineError::corpus_format(fileid, "unreadable"))
            }
        }

        let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
        let err = pipeline.rank(&Broken).unwrap_err();
        assert_eq!(err.doc_id.as_deref(), Some("ghost"));
    }

    #[test]
    fn test_run_with_readers_writes_all_files() {
        let dir = tempfile::tempdir().unwrap();
        let brown = MemoryCorpus::new(&[("ca01", "Hello world . Bye ."), ("ca02", "One .")]);
        let gutenberg = MemoryCorpus::new(&[("austen-emma.txt", "Emma Woodhouse , handsome")]);

        let config = PipelineConfig::default().with_output_dir(dir.path().join("out"));
        let pipeline = Pipeline::new(config).unwrap();
        let report = pipeline.run_with_readers(&brown, Some(&gutenberg)).unwrap();

        assert_eq!(report.documents, 2);
        assert_eq!(report.top_documents, 2);
        assert_eq!(report.sentences, 3);
        assert_eq!(report.gutenberg_documents, Some(1));
        assert_eq!(report.files.len(), 4);
        assert!(report.files.iter().all(|p| p.is_file()));
    }

    #[test]
    fn test_custom_tokenizer_abbreviations() {
        let dir = tempfile::tempdir().unwrap();
        let brown = MemoryCorpus::new(&[("ca01", "John Doe Esq. Arrived late .")]);
        let config = PipelineConfig::default().with_output_dir(dir.path());

        let plain = Pipeline::new(config.clone()).unwrap();
        assert_eq!(plain.run_with_readers(&brown, None).unwrap().sentences, 2);

        let with_esq = Pipeline::new(config)
            .unwrap()
            .with_tokenizer(Tokenizer::new().with_abbreviations(["Esq."]));
        let report = with_esq.run_with_readers(&brown, None).unwrap();
        assert_eq!(report.sentences, 1);
        assert_eq!(report.gutenberg_documents, None);
    }

    #[test]
    fn test_report_json() {
        let report = PipelineReport {
            documents: 3,
            top_documents: 2,
            sentences: 5,
            gutenberg_documents: None,
            files: vec![PathBuf::from("out/a.csv")],
        };
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["documents"], 3);
        assert_eq!(value["files"][0], "out/a.csv");
        assert!(value.get("gutenberg_documents").is_none());
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(Pipeline::new(PipelineConfig::default().with_top_n(0)).is_err());
    }
}
