//! Boundary to whatever supplies raw corpus text.
//!
//! Cloning repositories, resolving release tags and reading directories all
//! happen behind [`CorpusSource`]; the store only ever sees file names and text.

use indexmap::IndexMap;
use thiserror::Error;

/// One file of a corpus, as raw CoNLL-U text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusFile {
    pub filename: String,
    pub content: String,
}

impl CorpusFile {
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }
}

pub trait CorpusSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Every file of corpus `name`, pinned to `version` when one is given.
    fn fetch(&self, name: &str, version: Option<&str>) -> Result<Vec<CorpusFile>, Self::Error>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no corpus '{name}' at version {version:?}")]
pub struct CorpusNotFound {
    pub name: String,
    pub version: Option<String>,
}

/// Corpora held in memory, keyed by name and version.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    corpora: IndexMap<(String, Option<String>), Vec<CorpusFile>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, version: Option<&str>, files: Vec<CorpusFile>) -> &mut Self {
        self.corpora
            .insert((name.to_string(), version.map(str::to_string)), files);
        self
    }
}

impl CorpusSource for MemorySource {
    type Error = CorpusNotFound;

    fn fetch(&self, name: &str, version: Option<&str>) -> Result<Vec<CorpusFile>, Self::Error> {
        self.corpora
            .get(&(name.to_string(), version.map(str::to_string)))
            .cloned()
            .ok_or_else(|| CorpusNotFound {
                name: name.to_string(),
                version: version.map(str::to_string),
            })
    }
}
