//! Text normalization and word tokenization.

use std::sync::LazyLock;

use regex::Regex;

/// Word characters are letters, numbers and `_`. Combining marks and other
/// connector punctuation are not, so a decomposed accent splits its word.
pub const WORD_CLASS: &str = r"\p{L}\p{N}_";

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"[{WORD_CLASS}]+|[^{WORD_CLASS}\s]")).expect("word pattern is valid")
});

static BLANK_LINES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("blank line pattern is valid"));

/// Unify line endings to `\n`, cap blank-line runs at one empty line and trim.
pub fn normalize_text(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    BLANK_LINES_RE.replace_all(&unified, "\n\n").trim().to_string()
}

/// Split text into maximal runs of word characters and single punctuation
/// characters. Whitespace only separates tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    WORD_RE.find_iter(text).map(|m| m.as_str().to_string()).collect()
}
