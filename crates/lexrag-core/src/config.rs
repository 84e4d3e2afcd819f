//! Typed configuration with layered loading.
//!
//! Uses Figment to merge struct defaults + `config.toml` + `config.<env>.toml`
//! + `APP_*` env vars (sections separated by `__`, e.g.
//! `APP_RETRIEVER__TOP_K=5`). Library constructors take the typed sections
//! directly; only binaries call [`AppConfig::load`].

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const DEFAULT_DOCS_DIR: &str = "./docs";
pub const DEFAULT_INDEX_PATH: &str = "./index.json";
pub const DEFAULT_CHUNK_SIZE: usize = 150;
pub const DEFAULT_CHUNK_OVERLAP: usize = 50;
pub const DEFAULT_TOP_K: usize = 3;
pub const DEFAULT_THRESHOLD: f64 = 0.42;
pub const DEFAULT_EXTENSIONS: [&str; 3] = ["md", "txt", "markdown"];
pub const DEFAULT_MODEL_NAME: &str = "stub";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub indexer: IndexerConfig,
    pub retriever: RetrieverConfig,
    pub answer: AnswerConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexerConfig {
    pub docs_dir: String,
    pub index_path: String,
    pub chunk_size: usize,
    pub overlap: usize,
    /// Lowercase file extensions (without the dot) picked up by the loader.
    pub extensions: Vec<String>,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            docs_dir: DEFAULT_DOCS_DIR.to_string(),
            index_path: DEFAULT_INDEX_PATH.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_CHUNK_OVERLAP,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl IndexerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::Configuration("indexer.chunk_size must be positive".to_string()));
        }
        if self.overlap >= self.chunk_size {
            return Err(Error::Configuration(format!(
                "indexer.overlap ({}) must be smaller than indexer.chunk_size ({})",
                self.overlap, self.chunk_size
            )));
        }
        if self.extensions.is_empty() {
            return Err(Error::Configuration("indexer.extensions must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn docs_dir(&self) -> PathBuf {
        expand_path(&self.docs_dir)
    }

    pub fn index_path(&self) -> PathBuf {
        expand_path(&self.index_path)
    }

    /// Case-insensitive match of the file's extension against the allow-list.
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrieverConfig {
    pub index_path: String,
    pub top_k: usize,
    pub threshold: f64,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            index_path: DEFAULT_INDEX_PATH.to_string(),
            top_k: DEFAULT_TOP_K,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl RetrieverConfig {
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(Error::Configuration("retriever.top_k must be positive".to_string()));
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(Error::Configuration(format!(
                "retriever.threshold ({}) must lie in [0, 1]",
                self.threshold
            )));
        }
        Ok(())
    }

    pub fn index_path(&self) -> PathBuf {
        expand_path(&self.index_path)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerMode {
    Extractive,
    #[default]
    Summary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerConfig {
    pub mode: AnswerMode,
    pub model_name: String,
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self { mode: AnswerMode::default(), model_name: DEFAULT_MODEL_NAME.to_string() }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_for_env(&env_name)
    }

    pub fn load_for_env(env_name: &str) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file("config.toml"));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));
        Self::from_figment(&figment)
    }

    pub fn from_figment(figment: &Figment) -> Result<Self> {
        let config: AppConfig = figment.extract().map_err(|e| Error::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.indexer.validate()?;
        self.retriever.validate()
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
