//! Pipeline configuration
//!
//! All knobs live in [`PipelineConfig`]. The configuration can be built in
//! code with the `with_*` builder methods, or loaded from a JSON file where
//! every field is optional and falls back to its default.

use crate::errors::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default number of top documents kept for sentence extraction.
pub const DEFAULT_TOP_N: usize = 12;

/// Remote package index the NLTK downloader uses.
pub const DEFAULT_BASE_URL: &str =
    "https://raw.githubusercontent.com/nltk/nltk_data/gh-pages/packages";

/// Name of the full ranked table export.
pub const SORTED_FILE_NAME: &str = "brown_corpus_with_tokens_and_count_sorted.csv";

/// Name of the gutenberg export.
pub const GUTENBERG_FILE_NAME: &str = "gutenberg_corpus.csv";

/// Configuration for a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Number of highest-count documents kept for sentence extraction
    pub top_n: usize,
    /// Directory the CSV files are written to
    pub output_dir: PathBuf,
    /// Root of the local corpus store (`<data_dir>/corpora/<name>`).
    /// `None` uses the platform data directory.
    pub data_dir: Option<PathBuf>,
    /// Base URL of the package index
    pub base_url: String,
    /// Extra download attempts after the first failure
    pub fetch_retries: u32,
    /// HTTP timeout per download attempt, in seconds
    pub fetch_timeout_secs: u64,
    /// Never touch the network; missing corpora are fatal
    pub offline: bool,
    /// Corpus ranked and split into sentences
    pub brown_corpus: String,
    /// Corpus exported as plain joined text
    pub gutenberg_corpus: String,
    /// Skip the gutenberg export entirely
    pub skip_gutenberg: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            output_dir: PathBuf::from("."),
            data_dir: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            fetch_retries: 2,
            fetch_timeout_secs: 120,
            offline: false,
            brown_corpus: "brown".to_string(),
            gutenberg_corpus: "gutenberg".to_string(),
            skip_gutenberg: false,
        }
    }
}

impl PipelineConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::invalid_config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(PipelineError::invalid_config("top_n must be > 0")
                .with_hint("Set top_n to a value >= 1"));
        }

        if self.brown_corpus.trim().is_empty() || self.gutenberg_corpus.trim().is_empty() {
            return Err(PipelineError::invalid_config("corpus names must not be empty"));
        }

        if self.fetch_timeout_secs == 0 {
            return Err(PipelineError::invalid_config("fetch_timeout_secs must be > 0"));
        }

        if !self.offline && self.base_url.trim().is_empty() {
            return Err(PipelineError::invalid_config("base_url must not be empty")
                .with_hint("Pass --offline to disable downloads"));
        }

        Ok(())
    }

    /// Set number of top documents
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Set the output directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the corpus data directory
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Set the package index base URL
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the number of download retries
    pub fn with_fetch_retries(mut self, retries: u32) -> Self {
        self.fetch_retries = retries;
        self
    }

    /// Enable or disable offline mode
    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Enable or disable the gutenberg export
    pub fn with_skip_gutenberg(mut self, skip: bool) -> Self {
        self.skip_gutenberg = skip;
        self
    }

    /// Name of the top-N table export.
    pub fn top_file_name(&self) -> String {
        format!("top_{}_token_count.csv", self.top_n)
    }

    /// Name of the sentence table export.
    pub fn sentences_file_name(&self) -> String {
        format!("brown_corpus_top_{}_token_count.csv", self.top_n)
    }

    /// Full path of the ranked table export.
    pub fn sorted_path(&self) -> PathBuf {
        self.output_dir.join(SORTED_FILE_NAME)
    }

    /// Full path of the top-N table export.
    pub fn top_path(&self) -> PathBuf {
        self.output_dir.join(self.top_file_name())
    }

    /// Full path of the sentence table export.
    pub fn sentences_path(&self) -> PathBuf {
        self.output_dir.join(self.sentences_file_name())
    }

    /// Full path of the gutenberg export.
    pub fn gutenberg_path(&self) -> PathBuf {
        self.output_dir.join(GUTENBERG_FILE_NAME)
    }
}
