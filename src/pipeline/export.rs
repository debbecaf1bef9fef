//! CSV export
//!
//! All files are UTF-8, comma-delimited, `\n`-terminated, quoted only where
//! needed, and always start with a header row (even when there are no data
//! rows). The token column of the ranked tables is written as a Python list
//! literal, e.g. `['The', 'jury', "n't"]`.

use crate::errors::{PipelineError, Result};
use crate::types::{Document, GutenbergRecord, SentenceRecord};
use serde::Serialize;
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Header of the ranked and top-N tables.
pub const RANKED_HEADER: [&str; 4] = ["text_id", "text", "word", "word_count"];

/// Header of the sentence table.
pub const SENTENCE_HEADER: [&str; 3] = ["text_id", "text", "linenumber"];

/// Header of the gutenberg table.
pub const GUTENBERG_HEADER: [&str; 2] = ["text_id", "text"];

#[derive(Debug, Serialize)]
struct RankedRow<'a> {
    text_id: &'a str,
    text: &'a str,
    word: String,
    word_count: usize,
}

impl<'a> From<&'a Document> for RankedRow<'a> {
    fn from(document: &'a Document) -> Self {
        Self {
            text_id: &document.id,
            text: &document.text,
            word: python_list_repr(&document.tokens),
            word_count: document.word_count(),
        }
    }
}

/// Render a string the way Python's `repr` does.
///
/// Single quotes are used unless the string contains a single quote and no
/// double quote.
pub fn python_str_repr(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Render a token list the way Python's `repr` renders a list of strings.
pub fn python_list_repr<S: AsRef<str>>(items: &[S]) -> String {
    let inner: Vec<String> = items.iter().map(|s| python_str_repr(s.as_ref())).collect();
    format!("[{}]", inner.join(", "))
}

/// Write `header` then every row to `path`. Returns the number of data rows.
fn write_rows<T, I>(path: &Path, header: &[&str], rows: I) -> Result<usize>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let target = path.display().to_string();
    let failed = |e: csv::Error| PipelineError::export_write(target.clone(), e.to_string());

    let file = File::create(path)
        .map_err(|e| PipelineError::export_write(target.clone(), e.to_string()))?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(file);

    writer.write_record(header).map_err(failed)?;
    let mut count = 0;
    for row in rows {
        writer.serialize(row).map_err(failed)?;
        count += 1;
    }
    writer
        .flush()
        .map_err(|e| PipelineError::export_write(target.clone(), e.to_string()))?;

    info!(path = %target, rows = count, "wrote csv");
    Ok(count)
}

/// Write documents with their tokens and counts, in the given order.
pub fn write_ranked(path: &Path, documents: &[Document]) -> Result<usize> {
    write_rows(path, &RANKED_HEADER, documents.iter().map(RankedRow::from))
}

/// Write the numbered sentence table.
pub fn write_sentences(path: &Path, records: &[SentenceRecord]) -> Result<usize> {
    write_rows(path, &SENTENCE_HEADER, records)
}

/// Write the gutenberg table.
pub fn write_gutenberg(path: &Path, records: &[GutenbergRecord]) -> Result<usize> {
    write_rows(path, &GUTENBERG_HEADER, records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_python_str_repr_quotes() {
        assert_eq!(python_str_repr("The"), "'The'");
        assert_eq!(python_str_repr("n't"), "\"n't\"");
        assert_eq!(python_str_repr("``"), "'``'");
        assert_eq!(python_str_repr("both ' and \""), "'both \\' and \"'");
        assert_eq!(python_str_repr("back\\slash"), "'back\\\\slash'");
    }

    #[test]
    fn test_python_list_repr() {
        assert_eq!(python_list_repr(&["The", "jury", "n't"]), "['The', 'jury', \"n't\"]");
        assert_eq!(python_list_repr::<&str>(&[]), "[]");
    }

    #[test]
    fn test_write_ranked_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ranked.csv");
        let doc = Document::new(
            "ca01",
            vec!["Yes".into(), ",".into(), "don't".into()],
            vec!["Yes".into(), ",".into(), "do".into(), "n't".into()],
        );

        assert_eq!(write_ranked(&path, &[doc]).unwrap(), 1);
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "text_id,text,word,word_count\n\
             ca01,\"Yes , don't\",\"['Yes', ',', 'do', \"\"n't\"\"]\",4\n"
        );
    }

    #[test]
    fn test_empty_table_still_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sentences.csv");
        assert_eq!(write_sentences(&path, &[]).unwrap(), 0);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "text_id,text,linenumber\n");
    }

    #[test]
    fn test_write_sentences_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sentences.csv");
        let records = vec![SentenceRecord {
            text_id: "ca01".into(),
            text: "Hello world.".into(),
            linenumber: 1,
        }];
        write_sentences(&path, &records).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "text_id,text,linenumber\nca01,Hello world.,1\n"
        );
    }

    #[test]
    fn test_unwritable_path_is_export_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        let err = write_gutenberg(&path, &[]).unwrap_err();
        assert_eq!(err.code, ErrorCode::ExportWriteFailure);
        assert_eq!(err.stage, "export");
        assert!(err.doc_id.unwrap().ends_with("out.csv"));
    }
}
