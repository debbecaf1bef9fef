//! Corpus acquisition and reading
//!
//! [`CorpusStore`] makes sure a corpus package is unpacked on local disk,
//! downloading it on first use. The readers expose the unpacked files as
//! sorted document ids and per-document word sequences.

pub mod reader;
pub mod store;

pub use reader::{CorpusReader, PlaintextCorpusReader, TaggedCorpusReader};
pub use store::{ensure_corpus_available, CorpusStore};
