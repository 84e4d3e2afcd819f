use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("No chunks produced from corpus at {}", .0.display())]
    EmptyCorpus(PathBuf),

    #[error("Failed to read {} as text: {source}", .path.display())]
    FileDecode {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk corpus directory: {0}")]
    CorpusWalk(#[from] walkdir::Error),

    #[error("Failed to load index from {}: {reason}", .path.display())]
    IndexLoad { path: PathBuf, reason: String },

    #[error("Failed to save index to {}: {reason}", .path.display())]
    IndexSave { path: PathBuf, reason: String },
}

impl Error {
    pub fn index_load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::IndexLoad { path: path.into(), reason: reason.to_string() }
    }

    pub fn index_save(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::IndexSave { path: path.into(), reason: reason.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
