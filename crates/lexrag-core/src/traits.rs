use crate::types::SparseVector;

/// A fitted term-weighting model.
///
/// Terms the model was not fitted on contribute nothing to the output
/// vector; transforming never fails.
pub trait Vectorizer: Send + Sync {
    fn transform(&self, text: &str) -> SparseVector;
    fn vocabulary_size(&self) -> usize;
}
