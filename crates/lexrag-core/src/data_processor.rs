use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::chunker::Chunker;
use crate::config::IndexerConfig;
use crate::error::{Error, Result};
use crate::text::{normalize_text, tokenize};
use crate::types::Chunk;

/// A source document after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Path relative to the corpus root, `/`-separated.
    pub file: String,
    pub text: String,
}

/// Walks a corpus directory and turns every recognized file into chunks.
pub struct DataProcessor {
    config: IndexerConfig,
    chunker: Chunker,
}

impl DataProcessor {
    pub fn new(config: IndexerConfig) -> Result<Self> {
        config.validate()?;
        let chunker = Chunker::from_config(&config)?;
        Ok(Self { config, chunker })
    }

    /// Chunk every document under `data_dir`. `chunk_id`s are assigned in
    /// sorted path order, so rebuilding an unchanged corpus is reproducible.
    pub fn process_directory(&self, data_dir: &Path) -> Result<Vec<Chunk>> {
        let files = self.list_doc_files(data_dir)?;
        if files.is_empty() {
            info!("No recognized documents found under {}", data_dir.display());
            return Ok(vec![]);
        }
        let mut all_chunks = Vec::new();
        for (file_index, file_path) in files.iter().enumerate() {
            let document = self.read_document(data_dir, file_path)?;
            let before = all_chunks.len();
            self.chunk_document(&document, &mut all_chunks);
            debug!(
                "Processed file {}/{}: {} ({} chunks)",
                file_index + 1,
                files.len(),
                document.file,
                all_chunks.len() - before
            );
        }
        info!("Processed {} files into {} chunks", files.len(), all_chunks.len());
        Ok(all_chunks)
    }

    /// Recursively list files whose extension is on the allow-list, ordered
    /// by their `/`-joined path relative to `root`.
    pub fn list_doc_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if !root.is_dir() {
            return Err(Error::Configuration(format!(
                "docs_dir {} is not a directory",
                root.display()
            )));
        }
        let mut files = Vec::new();
        for entry in walkdir::WalkDir::new(root) {
            let entry = entry?;
            if is_document_entry(&entry) && self.config.accepts(entry.path()) {
                files.push(entry.into_path());
            }
        }
        // String order, not component order: "a-b/x.txt" sorts before "a/x.txt".
        files.sort_by_cached_key(|path| relative_name(root, path));
        Ok(files)
    }

    pub fn read_document(&self, root: &Path, file_path: &Path) -> Result<Document> {
        let raw = fs::read_to_string(file_path)
            .map_err(|source| Error::FileDecode { path: file_path.to_path_buf(), source })?;
        Ok(Document { file: relative_name(root, file_path), text: normalize_text(&raw) })
    }

    /// Append the document's windows to `out`, numbering them after the
    /// chunks already present.
    pub fn chunk_document(&self, document: &Document, out: &mut Vec<Chunk>) {
        let tokens = tokenize(&document.text);
        for window in self.chunker.windows(&tokens) {
            out.push(Chunk {
                file: document.file.clone(),
                chunk_id: out.len(),
                text: window.text,
                start_word: window.start_word,
                end_word: window.end_word,
            });
        }
    }
}

/// Regular files, and symlinks that do not point at a directory. Linked
/// directories are not descended into; a dangling link is kept so that
/// reading it fails loudly.
fn is_document_entry(entry: &walkdir::DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && !entry.path().is_dir())
}

fn relative_name(root: &Path, file_path: &Path) -> String {
    let relative = file_path.strip_prefix(root).unwrap_or(file_path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_names_use_forward_slashes() {
        let root = Path::new("/corpus");
        assert_eq!(relative_name(root, Path::new("/corpus/a/b.md")), "a/b.md");
        assert_eq!(relative_name(root, Path::new("/corpus/top.txt")), "top.txt");
    }

    #[test]
    fn chunk_ids_continue_across_documents() {
        let config = IndexerConfig { chunk_size: 2, overlap: 0, ..IndexerConfig::default() };
        let processor = DataProcessor::new(config).unwrap();
        let mut out = Vec::new();
        let a = Document { file: "a.txt".into(), text: "one two three".into() };
        let b = Document { file: "b.txt".into(), text: "four".into() };
        processor.chunk_document(&a, &mut out);
        processor.chunk_document(&b, &mut out);
        let ids: Vec<_> =
            out.iter().map(|c| (c.file.as_str(), c.chunk_id, c.start_word, c.end_word)).collect();
        assert_eq!(ids, vec![("a.txt", 0, 0, 1), ("a.txt", 1, 2, 2), ("b.txt", 2, 0, 0)]);
    }
}
