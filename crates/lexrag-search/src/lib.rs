//! lexrag-search
//!
//! Query-time side of the pipeline: ranked retrieval with a rejection
//! threshold, answer text assembled from retrieved chunks, and an evaluation
//! harness over gold question sets.

pub mod answer;
pub mod eval;
pub mod retriever;

pub use answer::AnswerGenerator;
pub use eval::{evaluate, load_questions, EvalReport, Question};
pub use retriever::Retriever;
