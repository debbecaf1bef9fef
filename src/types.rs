//! Core types for corpus_tally
//!
//! The tables produced by each pipeline stage. Every table is built once by
//! its stage, returned by value, and never mutated afterwards.

use serde::Serialize;

// ============================================================================
// Document
// ============================================================================

/// One corpus entry after tokenize-and-count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Identifier, unique within its corpus (e.g. `"ca01"`)
    pub id: String,
    /// Words as segmented by the corpus annotation
    pub words: Vec<String>,
    /// Words joined with single spaces
    pub text: String,
    /// Tokens produced by re-tokenizing `text`
    pub tokens: Vec<String>,
}

impl Document {
    /// Build a document from its id, raw words and re-tokenized text.
    pub fn new(id: impl Into<String>, words: Vec<String>, tokens: Vec<String>) -> Self {
        let text = join_words(&words);
        Self {
            id: id.into(),
            words,
            text,
            tokens,
        }
    }

    /// Number of tokens; always `tokens.len()`.
    pub fn word_count(&self) -> usize {
        self.tokens.len()
    }
}

/// Join corpus words into one text blob with single-space separators.
///
/// This is lossy: original spacing and punctuation adjacency are gone.
pub fn join_words<S: AsRef<str>>(words: &[S]) -> String {
    let mut text = String::with_capacity(words.iter().map(|w| w.as_ref().len() + 1).sum());
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            text.push(' ');
        }
        text.push_str(word.as_ref());
    }
    text
}

// ============================================================================
// Ranked table
// ============================================================================

/// Documents ordered by token count, highest first.
///
/// Ties keep corpus order (the sort is stable).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankedTable {
    documents: Vec<Document>,
}

impl RankedTable {
    /// Rank documents by descending token count.
    pub fn from_documents(mut documents: Vec<Document>) -> Self {
        documents.sort_by(|a, b| b.word_count().cmp(&a.word_count()));
        Self { documents }
    }

    /// All rows, in ranked order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// The first `n` rows (fewer if the table is shorter).
    pub fn top(&self, n: usize) -> &[Document] {
        &self.documents[..n.min(self.documents.len())]
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

// ============================================================================
// Output rows
// ============================================================================

/// A sentence kept by the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentenceRecord {
    /// Parent document identifier
    pub text_id: String,
    /// Sentence text
    pub text: String,
    /// 1-based position in the final table
    pub linenumber: usize,
}

/// One gutenberg document as joined text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GutenbergRecord {
    pub text_id: String,
    pub text: String,
}
