use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use tracing::info;

use lexrag_core::config::IndexerConfig;
use lexrag_core::data_processor::DataProcessor;
use lexrag_core::error::{Error, Result};
use lexrag_core::traits::Vectorizer;
use lexrag_core::types::{Chunk, SparseVector};

use crate::matrix::CsrMatrix;
use crate::tfidf::TfidfVectorizer;

/// Fitted model, chunk vectors and chunk metadata. Row `i` of `matrix`
/// belongs to `chunks[i]`. Built once and never updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    pub model: TfidfVectorizer,
    pub matrix: CsrMatrix,
    pub chunks: Vec<Chunk>,
}

impl Index {
    /// Fit the model over `chunks` and vectorize each of them.
    /// `corpus` only labels the error raised for an empty chunk list.
    pub fn build(chunks: Vec<Chunk>, corpus: &Path) -> Result<Self> {
        if chunks.is_empty() {
            return Err(Error::EmptyCorpus(corpus.to_path_buf()));
        }
        info!("Building TF-IDF index for {} chunks", chunks.len());
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let model = TfidfVectorizer::fit(&texts);

        let pb = ProgressBar::new(chunks.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar().template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%)",
        ) {
            pb.set_style(style.progress_chars("#>-"));
        }
        let mut rows: Vec<SparseVector> = Vec::with_capacity(chunks.len());
        for text in &texts {
            rows.push(model.transform(text));
            pb.inc(1);
        }
        pb.finish_and_clear();

        let matrix = CsrMatrix::from_rows(&rows, model.vocabulary_size());
        info!(
            "Index ready: {} chunks, {} terms, {} non-zero weights",
            chunks.len(),
            model.vocabulary_size(),
            matrix.nnz()
        );
        Ok(Self { model, matrix, chunks })
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Structural invariants a loaded index must satisfy before it serves
    /// queries.
    pub fn check(&self) -> std::result::Result<(), String> {
        self.model.check()?;
        self.matrix.check()?;
        if self.is_empty() {
            return Err("index contains no chunks".to_string());
        }
        if self.matrix.n_rows() != self.chunks.len() {
            return Err(format!(
                "matrix has {} rows but index has {} chunks",
                self.matrix.n_rows(),
                self.chunks.len()
            ));
        }
        if self.matrix.n_cols() != self.model.vocabulary_size() {
            return Err(format!(
                "matrix has {} columns but model has {} terms",
                self.matrix.n_cols(),
                self.model.vocabulary_size()
            ));
        }
        for c in &self.chunks {
            if c.start_word > c.end_word {
                return Err(format!(
                    "chunk {} has start_word {} > end_word {}",
                    c.chunk_id, c.start_word, c.end_word
                ));
            }
        }
        Ok(())
    }
}

/// Load, chunk and index the corpus described by `config`.
pub fn build_index(config: &IndexerConfig) -> Result<Index> {
    let processor = DataProcessor::new(config.clone())?;
    let docs_dir = config.docs_dir();
    info!("Reading documents from {}", docs_dir.display());
    let chunks = processor.process_directory(&docs_dir)?;
    Index::build(chunks, &docs_dir)
}
