use crate::config::IndexerConfig;
use crate::error::{Error, Result};

/// One window produced by the chunker. `end_word` is inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    pub text: String,
    pub start_word: usize,
    pub end_word: usize,
}

/// Fixed-size word windows with overlap.
///
/// Each window after the first starts `overlap` tokens before the end of the
/// previous one; the last window may be short and iteration stops as soon as a
/// window reaches the final token.
#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    chunk_size: usize,
    overlap: usize,
}

impl Chunker {
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::Configuration("chunk_size must be positive".to_string()));
        }
        if overlap >= chunk_size {
            return Err(Error::Configuration(format!(
                "overlap ({overlap}) must be smaller than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self { chunk_size, overlap })
    }

    pub fn from_config(config: &IndexerConfig) -> Result<Self> {
        Self::new(config.chunk_size, config.overlap)
    }

    pub fn windows<'a, S: AsRef<str>>(&self, tokens: &'a [S]) -> Windows<'a, S> {
        Windows {
            tokens,
            chunk_size: self.chunk_size,
            overlap: self.overlap,
            next_start: Some(0),
        }
    }

    pub fn chunk_tokens<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<Window> {
        self.windows(tokens).collect()
    }
}

pub struct Windows<'a, S> {
    tokens: &'a [S],
    chunk_size: usize,
    overlap: usize,
    next_start: Option<usize>,
}

impl<S: AsRef<str>> Iterator for Windows<'_, S> {
    type Item = Window;

    fn next(&mut self) -> Option<Window> {
        let start = self.next_start?;
        let n = self.tokens.len();
        if start >= n {
            self.next_start = None;
            return None;
        }
        let end = (start + self.chunk_size).min(n);
        let text =
            self.tokens[start..end].iter().map(|t| t.as_ref()).collect::<Vec<&str>>().join(" ");
        // overlap < chunk_size keeps the next start strictly ahead of this one
        self.next_start = if end == n { None } else { Some(end.saturating_sub(self.overlap)) };
        Some(Window { text, start_word: start, end_word: end - 1 })
    }
}
