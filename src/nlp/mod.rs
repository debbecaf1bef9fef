//! Natural language processing utilities
//!
//! Treebank-style word tokenization, sentence splitting, and the punctuation
//! predicates used by the sentence extractor.

pub mod filters;
pub mod tokenizer;

pub use filters::{has_no_word_chars, is_single_punctuation};
pub use tokenizer::{wordpunct_tokenize, Tokenizer};
