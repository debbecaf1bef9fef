//! Pipeline stages and orchestration.
//!
//! ## Submodules
//!
//! - [`count`] — tokenize-and-count over a corpus
//! - [`sentences`] — sentence extraction with the two punctuation filters
//! - [`gutenberg`] — joined-text records for the second corpus
//! - [`export`] — CSV writers
//! - [`runner`] — the [`Pipeline`] threading tables between stages

pub mod count;
pub mod export;
pub mod gutenberg;
pub mod runner;
pub mod sentences;

pub use count::{count_document, tokenize_and_count};
pub use export::{python_list_repr, write_gutenberg, write_ranked, write_sentences};
pub use gutenberg::gutenberg_records;
pub use runner::{Pipeline, PipelineReport};
pub use sentences::{extract_sentences, SentenceTable};
