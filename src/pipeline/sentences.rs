//! Sentence extraction stage
//!
//! Splits the top documents into sentences and drops punctuation-only ones
//! in two passes: [`is_single_punctuation`] per sentence while collecting,
//! then [`has_no_word_chars`] over the collected table. Line numbers are
//! assigned last, so they run 1..=n over the surviving rows.

use crate::nlp::{has_no_word_chars, is_single_punctuation, Tokenizer};
use crate::types::{Document, SentenceRecord};
use tracing::debug;

/// Result of sentence extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentenceTable {
    /// Surviving sentences, numbered from 1
    pub records: Vec<SentenceRecord>,
    /// Sentences dropped by the single-character filter
    pub dropped_single_punctuation: usize,
    /// Rows dropped by the no-word-character filter
    pub dropped_no_word_chars: usize,
}

impl SentenceTable {
    /// Number of surviving sentences
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Extract numbered sentences from `documents`, in the given order.
pub fn extract_sentences(tokenizer: &Tokenizer, documents: &[Document]) -> SentenceTable {
    let mut dropped_single_punctuation = 0;
    let mut candidates: Vec<(&str, String)> = Vec::new();

    for document in documents {
        for sentence in tokenizer.sent_tokenize(&document.text) {
            if is_single_punctuation(&sentence) {
                dropped_single_punctuation += 1;
                continue;
            }
            candidates.push((document.id.as_str(), sentence));
        }
    }

    let before = candidates.len();
    candidates.retain(|(_, text)| !has_no_word_chars(text));
    let dropped_no_word_chars = before - candidates.len();

    let records: Vec<SentenceRecord> = candidates
        .into_iter()
        .enumerate()
        .map(|(i, (text_id, text))| SentenceRecord {
            text_id: text_id.to_string(),
            text,
            linenumber: i + 1,
        })
        .collect();

    debug!(
        sentences = records.len(),
        dropped_single_punctuation,
        dropped_no_word_chars,
        "extracted sentences"
    );

    SentenceTable {
        records,
        dropped_single_punctuation,
        dropped_no_word_chars,
    }
}
