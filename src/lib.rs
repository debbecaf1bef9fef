//! # corpus_tally
//!
//! Token counting, ranking and sentence extraction over the NLTK `brown` and
//! `gutenberg` corpora.
//!
//! The pipeline loads every brown document, joins its words with single
//! spaces, re-tokenizes the text with a Treebank-style tokenizer, ranks the
//! documents by token count, and splits the longest ones into numbered
//! sentences. The gutenberg corpus is exported as joined text. All tables are
//! written as CSV.
//!
//! ## Features
//!
//! - **Self-provisioning**: corpus packages are downloaded and unpacked on
//!   first use, or picked up from an existing `nltk_data` directory
//! - **Unicode-aware**: sentence boundaries follow UAX #29
//! - **Structured errors**: every failure names its stage and document

pub mod config;
pub mod corpus;
pub mod errors;
pub mod nlp;
pub mod pipeline;
pub mod types;

// Re-export commonly used types
pub use config::PipelineConfig;
pub use errors::{ErrorCode, PipelineError, Result};
pub use types::{join_words, Document, GutenbergRecord, RankedTable, SentenceRecord};

// Re-export main functionality
pub use corpus::{
    ensure_corpus_available, CorpusReader, CorpusStore, PlaintextCorpusReader, TaggedCorpusReader,
};
pub use nlp::{has_no_word_chars, is_single_punctuation, Tokenizer};
pub use pipeline::{Pipeline, PipelineReport, SentenceTable};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
