//! Gutenberg export stage: every document as one space-joined string.

use crate::corpus::CorpusReader;
use crate::errors::Result;
use crate::types::{join_words, GutenbergRecord};
use tracing::debug;

/// Build one record per document with its full joined text.
///
/// No tokenization, ranking, or filtering is applied.
pub fn gutenberg_records(reader: &dyn CorpusReader) -> Result<Vec<GutenbergRecord>> {
    let fileids = reader.fileids()?;
    let mut records = Vec::with_capacity(fileids.len());

    for fileid in fileids {
        let words = reader.words(&fileid)?;
        debug!(corpus = reader.name(), doc = %fileid, words = words.len(), "joined document");
        records.push(GutenbergRecord {
            text: join_words(&words),
            text_id: fileid,
        });
    }

    Ok(records)
}
