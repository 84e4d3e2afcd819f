//! Domain types shared by the indexer and the retriever.

use serde::{Deserialize, Serialize};

pub type ChunkId = usize;

/// A window of consecutive tokens from one source document.
///
/// - `file`: path of the source document relative to the corpus root
/// - `chunk_id`: position of the chunk in the build, starting at 0
/// - `text`: the window's tokens joined by single spaces
/// - `start_word`/`end_word`: inclusive token range within the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub file: String,
    pub chunk_id: ChunkId,
    pub text: String,
    pub start_word: usize,
    pub end_word: usize,
}

impl Chunk {
    /// Locator string `"<file>:words[<start>-<end>]"`.
    pub fn citation(&self) -> String {
        citation(&self.file, self.start_word, self.end_word)
    }
}

pub fn citation(file: &str, start_word: usize, end_word: usize) -> String {
    format!("{file}:words[{start_word}-{end_word}]")
}

/// One ranked hit returned for a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievalResult {
    pub chunk: Chunk,
    pub score: f64,
    pub citation: String,
}

impl RetrievalResult {
    pub fn new(chunk: Chunk, score: f64) -> Self {
        let citation = chunk.citation();
        Self { chunk, score, citation }
    }
}

/// Outcome of a query: ranked hits, or nothing relevant enough.
#[derive(Debug, Clone, PartialEq)]
pub enum Retrieval {
    Matches(Vec<RetrievalResult>),
    NoMatch { top_score: f64 },
}

impl Retrieval {
    pub fn is_no_match(&self) -> bool {
        matches!(self, Retrieval::NoMatch { .. })
    }

    /// Hits in rank order; empty for `NoMatch`.
    pub fn results(&self) -> &[RetrievalResult] {
        match self {
            Retrieval::Matches(results) => results,
            Retrieval::NoMatch { .. } => &[],
        }
    }

    pub fn into_results(self) -> Option<Vec<RetrievalResult>> {
        match self {
            Retrieval::Matches(results) => Some(results),
            Retrieval::NoMatch { .. } => None,
        }
    }
}

/// Sparse weight vector with strictly increasing column indices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    pub indices: Vec<usize>,
    pub values: Vec<f64>,
}

impl SparseVector {
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn norm(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Scale to unit L2 norm; an all-zero vector is left untouched.
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for v in &mut self.values {
                *v /= norm;
            }
        }
    }

}
