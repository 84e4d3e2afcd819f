use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use lexrag_core::text::WORD_CLASS;
use lexrag_core::traits::Vectorizer;
use lexrag_core::types::SparseVector;

use crate::matrix::CsrMatrix;

/// Maximal runs of two or more word characters.
static TERM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"[{WORD_CLASS}]{{2,}}")).expect("term pattern is valid")
});

/// Lowercase, then extract terms. Single characters and punctuation never
/// become terms.
pub fn analyze(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TERM_RE.find_iter(&lowered).map(|m| m.as_str().to_string()).collect()
}

/// Smoothed TF-IDF model fitted over a collection of chunk texts.
///
/// Column `j` is the `j`-th term in lexicographic order and
/// `idf = ln((1 + n) / (1 + df)) + 1`. Vectors are raw counts scaled by
/// idf and normalized to unit length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    pub fn fit<S: AsRef<str>>(texts: &[S]) -> Self {
        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();
        for text in texts {
            let mut terms = analyze(text.as_ref());
            terms.sort_unstable();
            terms.dedup();
            for term in terms {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }
        let n = texts.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(document_frequency.len());
        for (column, (term, df)) in document_frequency.into_iter().enumerate() {
            idf.push(((1.0 + n) / (1.0 + df as f64)).ln() + 1.0);
            vocabulary.insert(term, column);
        }
        Self { vocabulary, idf }
    }

    /// Fit on `texts` and return the model with the matrix of their vectors,
    /// one row per text in input order.
    pub fn fit_transform<S: AsRef<str>>(texts: &[S]) -> (Self, CsrMatrix) {
        let model = Self::fit(texts);
        let rows: Vec<SparseVector> = texts.iter().map(|t| model.transform(t.as_ref())).collect();
        let matrix = CsrMatrix::from_rows(&rows, model.vocabulary_size());
        (model, matrix)
    }

    pub fn column(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.column(term).map(|c| self.idf[c])
    }

    /// Structural consistency of a deserialized model.
    pub fn check(&self) -> Result<(), String> {
        if self.idf.len() != self.vocabulary.len() {
            return Err(format!(
                "model has {} idf weights for {} vocabulary terms",
                self.idf.len(),
                self.vocabulary.len()
            ));
        }
        let mut seen = vec![false; self.idf.len()];
        for (term, &column) in &self.vocabulary {
            match seen.get_mut(column) {
                Some(slot) if !*slot => *slot = true,
                _ => return Err(format!("term {term:?} maps to invalid column {column}")),
            }
        }
        if let Some(w) = self.idf.iter().find(|w| !w.is_finite()) {
            return Err(format!("model contains non-finite idf weight {w}"));
        }
        Ok(())
    }
}

impl Vectorizer for TfidfVectorizer {
    fn transform(&self, text: &str) -> SparseVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in analyze(text) {
            if let Some(&column) = self.vocabulary.get(&term) {
                *counts.entry(column).or_insert(0.0) += 1.0;
            }
        }
        let mut entries: Vec<(usize, f64)> = counts.into_iter().collect();
        entries.sort_unstable_by_key(|&(column, _)| column);
        let mut vector = SparseVector {
            indices: entries.iter().map(|&(c, _)| c).collect(),
            values: entries.iter().map(|&(c, tf)| tf * self.idf[c]).collect(),
        };
        vector.normalize();
        vector
    }

    fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }
}
