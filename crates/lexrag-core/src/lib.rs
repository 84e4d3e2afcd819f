//! lexrag-core
//!
//! Shared building blocks for the lexical retrieval pipeline: configuration,
//! the error taxonomy, chunk and result types, text normalization and
//! tokenization, the overlapping word-window chunker and the corpus loader.

#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod chunker;
pub mod config;
pub mod data_processor;
pub mod error;
pub mod text;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
