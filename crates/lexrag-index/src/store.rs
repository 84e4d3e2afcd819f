//! Persistence of a built [`Index`].
//!
//! The index is stored whole: one load reads everything, one save replaces
//! everything. [`JsonIndexStore`] writes through a temporary file in the
//! destination directory and renames it into place, so readers see either the
//! old index or the new one.

use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use lexrag_core::error::{Error, Result};

use crate::index::Index;

pub trait IndexStore: Send + Sync {
    fn load(&self) -> Result<Index>;
    fn save(&self, index: &Index) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct JsonIndexStore {
    path: PathBuf,
}

impl JsonIndexStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IndexStore for JsonIndexStore {
    fn load(&self) -> Result<Index> {
        let file = fs::File::open(&self.path).map_err(|e| Error::index_load(&self.path, e))?;
        let index: Index = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| Error::index_load(&self.path, e))?;
        index.check().map_err(|reason| Error::index_load(&self.path, reason))?;
        info!("Loaded index from {} ({} chunks)", self.path.display(), index.len());
        Ok(index)
    }

    fn save(&self, index: &Index) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| Error::index_save(&self.path, e))?;
        let mut tmp =
            tempfile::NamedTempFile::new_in(&dir).map_err(|e| Error::index_save(&self.path, e))?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer(&mut writer, index)
                .map_err(|e| Error::index_save(&self.path, e))?;
            writer.flush().map_err(|e| Error::index_save(&self.path, e))?;
        }
        tmp.persist(&self.path).map_err(|e| Error::index_save(&self.path, e.error))?;
        info!("Index saved to {}", self.path.display());
        Ok(())
    }
}
