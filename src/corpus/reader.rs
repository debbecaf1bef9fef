//! Readers for unpacked corpus directories
//!
//! Two layouts are supported:
//!
//! - **Tagged** (brown): files named like `ca01`, containing whitespace
//!   separated `word/TAG` tokens, one sentence per line.
//! - **Plaintext** (gutenberg): `*.txt` files in Latin-1, split into words
//!   with the word-punct rule.

use crate::errors::{PipelineError, Result};
use crate::nlp::tokenizer::wordpunct_tokenize;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Read access to a corpus: document ids and their words.
pub trait CorpusReader {
    /// Corpus name, used in logs and error reports.
    fn name(&self) -> &str;

    /// Sorted document identifiers.
    fn fileids(&self) -> Result<Vec<String>>;

    /// The corpus-native word sequence of one document.
    fn words(&self, fileid: &str) -> Result<Vec<String>>;
}

/// List files under `root` whose names fully match `pattern`, sorted.
fn list_fileids(root: &Path, corpus: &str, pattern: &Regex) -> Result<Vec<String>> {
    let entries = std::fs::read_dir(root).map_err(|e| {
        PipelineError::corpus_format(corpus, format!("cannot list {}: {}", root.display(), e))
    })?;

    let mut ids = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PipelineError::corpus_format(corpus, e.to_string()))?;
        if !entry.path().is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if pattern.is_match(name) {
                ids.push(name.to_string());
            }
        }
    }
    ids.sort();

    debug!(corpus, count = ids.len(), "listed corpus files");
    Ok(ids)
}

fn read_bytes(root: &Path, fileid: &str) -> Result<Vec<u8>> {
    let path = root.join(fileid);
    std::fs::read(&path).map_err(|e| {
        PipelineError::corpus_format(fileid, format!("cannot read {}: {}", path.display(), e))
    })
}

// ============================================================================
// Tagged corpus
// ============================================================================

/// Reader for `word/TAG` corpora such as brown.
#[derive(Debug, Clone)]
pub struct TaggedCorpusReader {
    name: String,
    root: PathBuf,
    fileid_pattern: Regex,
    separator: char,
}

impl TaggedCorpusReader {
    /// Reader over `root` accepting brown-style file names (`c[a-z]\d\d`).
    pub fn brown(root: impl Into<PathBuf>) -> Self {
        Self {
            name: "brown".to_string(),
            root: root.into(),
            fileid_pattern: Regex::new(r"^c[a-z]\d\d$").expect("brown fileid pattern compiles"),
            separator: '/',
        }
    }

    /// Reader with a custom name and file id pattern (full-match regex).
    pub fn new(
        name: impl Into<String>,
        root: impl Into<PathBuf>,
        fileid_pattern: &str,
    ) -> Result<Self> {
        let name = name.into();
        let fileid_pattern = Regex::new(&format!("^(?:{})$", fileid_pattern))
            .map_err(|e| PipelineError::invalid_config(format!("bad fileid pattern: {}", e)))?;
        Ok(Self {
            name,
            root: root.into(),
            fileid_pattern,
            separator: '/',
        })
    }

    /// Split a tagged token into its word (text before the last separator).
    pub fn untag<'a>(&self, token: &'a str) -> &'a str {
        match token.rfind(self.separator) {
            Some(idx) => &token[..idx],
            None => token,
        }
    }
}

impl CorpusReader for TaggedCorpusReader {
    fn name(&self) -> &str {
        &self.name
    }

    fn fileids(&self) -> Result<Vec<String>> {
        list_fileids(&self.root, &self.name, &self.fileid_pattern)
    }

    fn words(&self, fileid: &str) -> Result<Vec<String>> {
        let bytes = read_bytes(&self.root, fileid)?;
        let content = String::from_utf8(bytes)
            .map_err(|e| PipelineError::corpus_format(fileid, format!("not valid UTF-8: {}", e)))?;

        Ok(content
            .split_whitespace()
            .map(|token| self.untag(token).to_string())
            .collect())
    }
}

// ============================================================================
// Plaintext corpus
// ============================================================================

/// Reader for plain `*.txt` corpora such as gutenberg.
#[derive(Debug, Clone)]
pub struct PlaintextCorpusReader {
    name: String,
    root: PathBuf,
    fileid_pattern: Regex,
}

impl PlaintextCorpusReader {
    /// Reader over `root` accepting every `*.txt` file.
    pub fn gutenberg(root: impl Into<PathBuf>) -> Self {
        Self {
            name: "gutenberg".to_string(),
            root: root.into(),
            fileid_pattern: Regex::new(r"^[^.].*\.txt$").expect("txt fileid pattern compiles"),
        }
    }
}

/// Decode Latin-1 bytes; every byte maps to the code point of the same value.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

impl CorpusReader for PlaintextCorpusReader {
    fn name(&self) -> &str {
        &self.name
    }

    fn fileids(&self) -> Result<Vec<String>> {
        list_fileids(&self.root, &self.name, &self.fileid_pattern)
    }

    fn words(&self, fileid: &str) -> Result<Vec<String>> {
        let bytes = read_bytes(&self.root, fileid)?;
        Ok(wordpunct_tokenize(&decode_latin1(&bytes)))
    }
}
