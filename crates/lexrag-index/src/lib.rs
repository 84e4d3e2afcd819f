//! lexrag-index
//!
//! TF-IDF term weighting over chunk texts, a compressed sparse row matrix of
//! chunk vectors, and persistence of the resulting index. See `index` for the
//! build entry point and `store` for the load/save contract.

pub mod index;
pub mod matrix;
pub mod store;
pub mod tfidf;

pub use index::{build_index, Index};
pub use matrix::CsrMatrix;
pub use store::{IndexStore, JsonIndexStore};
pub use tfidf::TfidfVectorizer;
