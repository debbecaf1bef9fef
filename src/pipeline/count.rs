//! Tokenize-and-count stage
//!
//! Loads every document of a corpus, joins its words with single spaces,
//! re-tokenizes the joined text, and records the token count.

use crate::corpus::CorpusReader;
use crate::errors::{PipelineError, Result};
use crate::nlp::Tokenizer;
use crate::types::{join_words, Document};
use tracing::debug;

/// Tokenize one document's words into a [`Document`].
///
/// The re-tokenization may merge or split differently from the corpus's own
/// segmentation, so the count need not equal `words.len()`.
pub fn count_document(tokenizer: &Tokenizer, id: &str, words: Vec<String>) -> Result<Document> {
    let text = join_words(&words);
    let tokens = tokenizer.word_tokenize(&text);

    if tokens.is_empty() && !text.trim().is_empty() {
        return Err(PipelineError::tokenization(
            id,
            format!("no tokens produced from {} bytes of text", text.len()),
        ));
    }

    Ok(Document {
        id: id.to_string(),
        words,
        text,
        tokens,
    })
}

/// Tokenize and count every document of `reader`, in corpus order.
pub fn tokenize_and_count(
    reader: &dyn CorpusReader,
    tokenizer: &Tokenizer,
) -> Result<Vec<Document>> {
    let fileids = reader.fileids()?;
    let mut documents = Vec::with_capacity(fileids.len());

    for fileid in &fileids {
        let words = reader.words(fileid)?;
        let document = count_document(tokenizer, fileid, words)?;
        debug!(
            corpus = reader.name(),
            doc = %fileid,
            words = document.words.len(),
            tokens = document.word_count(),
            "counted document"
        );
        documents.push(document);
    }

    Ok(documents)
}
