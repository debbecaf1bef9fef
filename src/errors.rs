//! Error types for corpus_tally
//!
//! Every failure is reported as a [`PipelineError`] carrying a stable
//! [`ErrorCode`], the name of the stage that failed, the document being
//! processed (when there is one), a human-readable message, and an optional
//! hint.
//!
//! # Display format
//!
//! ```text
//! [tokenization_failure] count (doc: ca01): tokenizer produced no output
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Stage names used in error reports and tracing spans.
pub const STAGE_CONFIG: &str = "config";
pub const STAGE_FETCH: &str = "fetch";
pub const STAGE_LOAD: &str = "load";
pub const STAGE_COUNT: &str = "count";
pub const STAGE_RANK: &str = "rank";
pub const STAGE_SENTENCES: &str = "sentences";
pub const STAGE_EXPORT: &str = "export";

/// Stable error codes for programmatic matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The corpus package is missing locally and could not be fetched.
    CorpusUnavailable,
    /// The corpus package exists but its layout or contents are unreadable.
    CorpusFormat,
    /// Tokenization of a document failed.
    TokenizationFailure,
    /// A CSV export could not be written.
    ExportWriteFailure,
    /// Configuration validation failed.
    InvalidConfig,
}

impl ErrorCode {
    /// The snake_case name, identical to the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::CorpusUnavailable => "corpus_unavailable",
            ErrorCode::CorpusFormat => "corpus_format",
            ErrorCode::TokenizationFailure => "tokenization_failure",
            ErrorCode::ExportWriteFailure => "export_write_failure",
            ErrorCode::InvalidConfig => "invalid_config",
        }
    }

    /// Only a missing corpus is worth retrying (the fetch may be transient).
    pub fn is_retriable(&self) -> bool {
        matches!(self, ErrorCode::CorpusUnavailable)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure in one of the pipeline stages.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("[{code}] {stage}{}: {message}", doc_suffix(.doc_id))]
pub struct PipelineError {
    /// Stable error code for programmatic matching.
    pub code: ErrorCode,

    /// Name of the stage that failed (e.g. `"fetch"`, `"export"`).
    pub stage: String,

    /// Identifier of the document (or corpus, or file) being processed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<String>,

    /// Human-readable description of the failure.
    pub message: String,

    /// Optional suggestion for how to fix or work around the failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

fn doc_suffix(doc_id: &Option<String>) -> String {
    match doc_id {
        Some(id) => format!(" (doc: {})", id),
        None => String::new(),
    }
}

impl PipelineError {
    /// Create a new error.
    pub fn new(code: ErrorCode, stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            stage: stage.into(),
            doc_id: None,
            message: message.into(),
            hint: None,
        }
    }

    /// Create a corpus unavailable error
    pub fn corpus_unavailable(corpus: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::CorpusUnavailable, STAGE_FETCH, message).with_doc(corpus)
    }

    /// Create a corpus format error
    pub fn corpus_format(doc_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::CorpusFormat, STAGE_LOAD, message).with_doc(doc_id)
    }

    /// Create a tokenization failure error
    pub fn tokenization(doc_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::TokenizationFailure, STAGE_COUNT, message).with_doc(doc_id)
    }

    /// Create an export write failure error; `target` is the output path.
    pub fn export_write(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ExportWriteFailure, STAGE_EXPORT, message).with_doc(target)
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidConfig, STAGE_CONFIG, message)
    }

    /// Attach the identifier of the failing document.
    pub fn with_doc(mut self, doc_id: impl Into<String>) -> Self {
        self.doc_id = Some(doc_id.into());
        self
    }

    /// Attach a hint suggesting how to fix or work around the failure.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Check if this error may succeed on a retry.
    pub fn is_retriable(&self) -> bool {
        self.code.is_retriable()
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        Self::invalid_config(err.to_string())
    }
}
