//! Sentence splitting and Treebank-style word tokenization
//!
//! Sentences are found with UAX #29 sentence boundaries, then segments that
//! end in a known abbreviation or a single-letter initial are glued back onto
//! the following segment. Words are produced per sentence by the Penn
//! Treebank rule cascade: quotes become `` `` `` / `''`, punctuation is split
//! off, and clitics such as `n't`, `'s` and `'ll` become tokens of their own.

use regex::{Captures, Regex};
use rustc_hash::FxHashSet;
use std::sync::OnceLock;
use unicode_segmentation::UnicodeSegmentation;

/// Abbreviations that end with a period without ending the sentence.
///
/// Dotted letter runs such as `U.S.` or `N.Y.` are recognized by shape and
/// need no entry here.
const DEFAULT_ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "st", "jr", "sr", "mt", "ft", "gen", "gov", "sen", "rep", "rev",
    "prof", "lt", "col", "capt", "sgt", "maj", "cmdr", "adm", "hon", "messrs", "inc", "co",
    "corp", "ltd", "bros", "vs", "no", "nos", "vol", "ch", "fig", "ave", "blvd", "jan", "feb",
    "mar", "apr", "aug", "sept", "sep", "oct", "nov", "dec", "ca", "cf",
    // US states, AP style
    "ala", "ariz", "calif", "colo", "conn", "fla", "ga", "kan", "kans", "ky", "md", "mass",
    "mich", "minn", "mont", "neb", "nev", "okla", "tenn", "tex", "va", "vt", "wis", "wyo",
];

type Rule = (Regex, &'static str);

fn compile(rules: &[(&str, &'static str)]) -> Vec<Rule> {
    rules
        .iter()
        .map(|(pattern, replacement)| {
            let regex = Regex::new(pattern).unwrap_or_else(|e| {
                panic!("tokenizer pattern '{}' failed to compile: {}", pattern, e)
            });
            (regex, *replacement)
        })
        .collect()
}

fn starting_quotes() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();
    RULES.get_or_init(|| {
        compile(&[
            (r"([«“‘„]|`+)", " ${1} "),
            (r#"^""#, "``"),
            (r"(``)", " ${1} "),
            (r#"([ (\[{<])("|'{2})"#, "${1} `` "),
        ])
    })
}

fn punctuation() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();
    RULES.get_or_init(|| {
        compile(&[
            (r#"([^.])(\.)([\])}>"']*)\s*$"#, "${1} ${2} ${3} "),
            (r"([:,])([^\d])", " ${1} ${2}"),
            (r"([:,])$", " ${1} "),
            (r"\.{2,}", " ${0} "),
            (r"[;@#$%&]", " ${0} "),
            (r"[?!]", " ${0} "),
            (r"([^'])' ", "${1} ' "),
            (r"[*]", " ${0} "),
        ])
    })
}

fn brackets() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();
    RULES.get_or_init(|| compile(&[(r"[\]\[(){}<>]", " ${0} "), (r"--", " -- ")]))
}

fn ending_quotes() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();
    RULES.get_or_init(|| {
        compile(&[
            (r"([»”’])", " ${1} "),
            (r"''", " '' "),
            (r#"""#, " '' "),
            (r"([^' ])('[sS]|'[mM]|'[dD]|') ", "${1} ${2} "),
            (r"([^' ])('ll|'LL|'re|'RE|'ve|'VE|n't|N'T) ", "${1} ${2} "),
        ])
    })
}

fn contractions() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();
    RULES.get_or_init(|| {
        compile(&[
            (r"(?i)\b(can)(not)\b", " ${1} ${2} "),
            (r"(?i)\b(d)('ye)\b", " ${1} ${2} "),
            (r"(?i)\b(gim)(me)\b", " ${1} ${2} "),
            (r"(?i)\b(gon)(na)\b", " ${1} ${2} "),
            (r"(?i)\b(got)(ta)\b", " ${1} ${2} "),
            (r"(?i)\b(lem)(me)\b", " ${1} ${2} "),
            (r"(?i)\b(more)('n)\b", " ${1} ${2} "),
            (r"(?i)\b(wan)(na)(\s)", " ${1} ${2} ${3}"),
            (r"(?i) ('t)(is)\b", " ${1} ${2} "),
            (r"(?i) ('t)(was)\b", " ${1} ${2} "),
        ])
    })
}

fn quoted_letter_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"'(\w)\b").expect("quoted letter pattern compiles"))
}

fn dotted_abbreviation_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\p{L}(\.\p{L})+$").expect("dotted pattern compiles"))
}

/// Detach an opening `'` from a one-letter word (`'x` → `' x`), leaving
/// clitic letters such as `'s` and `'t` attached.
fn split_quoted_letter(text: String) -> String {
    quoted_letter_pattern()
        .replace_all(&text, |caps: &Captures| {
            let letter = &caps[1];
            match letter.to_lowercase().as_str() {
                "m" | "t" | "s" | "d" | "n" => caps[0].to_string(),
                _ => format!("' {}", letter),
            }
        })
        .into_owned()
}

fn wordpunct_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\w+|[^\w\s]+").expect("wordpunct pattern compiles"))
}

fn apply(rules: &[Rule], text: String) -> String {
    rules.iter().fold(text, |acc, (regex, replacement)| {
        regex.replace_all(&acc, *replacement).into_owned()
    })
}

/// Split text into runs of word characters and runs of punctuation.
///
/// `"Emma Woodhouse, handsome"` → `["Emma", "Woodhouse", ",", "handsome"]`
pub fn wordpunct_tokenize(text: &str) -> Vec<String> {
    wordpunct_pattern()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// English sentence splitter and word tokenizer.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    /// Lowercased abbreviations without their final period
    abbreviations: FxHashSet<String>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    /// Create a new tokenizer with the default English abbreviation list
    pub fn new() -> Self {
        Self {
            abbreviations: DEFAULT_ABBREVIATIONS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Add extra abbreviations (with or without the trailing period)
    pub fn with_abbreviations<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for abbrev in extra {
            let abbrev = abbrev.as_ref().trim_end_matches('.').to_lowercase();
            if !abbrev.is_empty() {
                self.abbreviations.insert(abbrev);
            }
        }
        self
    }

    /// Split text into trimmed sentences.
    pub fn sent_tokenize(&self, text: &str) -> Vec<String> {
        let mut sentences: Vec<String> = Vec::new();
        let mut pending = String::new();

        for (start, end) in self.sentence_boundaries(text) {
            let segment = text[start..end].trim();
            if !pending.is_empty() {
                pending.push(' ');
            }
            pending.push_str(segment);

            if !self.ends_with_abbreviation(segment) {
                sentences.push(std::mem::take(&mut pending));
            }
        }

        if !pending.is_empty() {
            sentences.push(pending);
        }

        sentences
    }

    /// Tokenize text into Treebank-style word tokens.
    ///
    /// The text is split into sentences first, so a period is only detached
    /// as a separate token where it ends a sentence.
    pub fn word_tokenize(&self, text: &str) -> Vec<String> {
        self.sent_tokenize(text)
            .iter()
            .flat_map(|sentence| self.treebank_tokenize(sentence))
            .collect()
    }

    /// Tokenize a single sentence with the Treebank rule cascade.
    pub fn treebank_tokenize(&self, sentence: &str) -> Vec<String> {
        let mut text = apply(starting_quotes(), sentence.to_string());
        text = split_quoted_letter(text);
        text = apply(punctuation(), text);
        text = apply(brackets(), text);
        text = format!(" {} ", text);
        text = apply(ending_quotes(), text);
        text = apply(contractions(), text);

        text.split_whitespace().map(str::to_string).collect()
    }

    /// Find sentence boundaries in text
    fn sentence_boundaries(&self, text: &str) -> Vec<(usize, usize)> {
        let mut boundaries = Vec::new();
        let mut start = 0;

        for (idx, _) in text.split_sentence_bound_indices() {
            if idx > start {
                let segment = &text[start..idx];
                // Skip empty segments
                if !segment.trim().is_empty() {
                    boundaries.push((start, idx));
                }
            }
            start = idx;
        }

        // Handle last segment
        if start < text.len() {
            let segment = &text[start..];
            if !segment.trim().is_empty() {
                boundaries.push((start, text.len()));
            }
        }

        boundaries
    }

    /// Does this segment end in an abbreviation or initial like `"Mr."`,
    /// `"J."` or `"N.Y."`?
    fn ends_with_abbreviation(&self, segment: &str) -> bool {
        let Some(last) = segment.split_whitespace().last() else {
            return false;
        };
        let Some(stem) = last.strip_suffix('.') else {
            return false;
        };
        if stem.is_empty() || stem.ends_with('.') && !stem.contains(char::is_alphabetic) {
            return false;
        }

        let mut chars = stem.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_uppercase() {
                return true;
            }
        }

        dotted_abbreviation_pattern().is_match(stem)
            || self.abbreviations.contains(&stem.to_lowercase())
    }
}
