//! Punctuation predicates for extracted sentences
//!
//! Two predicates with deliberately different scope:
//!
//! - [`is_single_punctuation`] matches a whole string that is exactly one
//!   non-word, non-space character, or a lone underscore. `"..."` does not
//!   match.
//! - [`has_no_word_chars`] matches a whole string with no letter or digit in
//!   it (underscores count as non-word here). `"..."` and `""` match.
//!
//! The extractor applies the first per sentence and the second over the
//! accumulated table.

use regex::Regex;
use std::sync::OnceLock;

fn single_punctuation_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:[^\w\s]|_)$").expect("single punctuation pattern compiles")
    })
}

fn no_word_chars_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[\W_]*$").expect("no word chars pattern compiles"))
}

/// Full-string match of `[^\w\s]|_`.
pub fn is_single_punctuation(text: &str) -> bool {
    single_punctuation_pattern().is_match(text)
}

/// Full-string match of `[\W_]*`.
pub fn has_no_word_chars(text: &str) -> bool {
    no_word_chars_pattern().is_match(text)
}
