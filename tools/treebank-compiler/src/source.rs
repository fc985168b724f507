use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use treebank_store::{CorpusFile, CorpusSource};

const CONLLU_EXTENSION: &str = "conllu";

/// Reads corpus `name` from `<root>/<name>/*.conllu`, sorted by file name.
///
/// The directory is expected to already hold the wanted release; a requested
/// version is only recorded, not checked out.
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn corpus_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == CONLLU_EXTENSION) {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }
}

impl CorpusSource for DirectorySource {
    type Error = io::Error;

    fn fetch(&self, name: &str, version: Option<&str>) -> Result<Vec<CorpusFile>, Self::Error> {
        let dir = self.root.join(name);
        debug!(dir = %dir.display(), ?version, "reading corpus directory");

        Self::corpus_files(&dir)?
            .into_iter()
            .map(|path| {
                let filename = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                Ok(CorpusFile::new(filename, fs::read_to_string(&path)?))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_conllu_files_in_name_order() {
        let root = tempfile::tempdir().unwrap();
        let corpus = root.path().join("UD_Test");
        fs::create_dir(&corpus).unwrap();
        fs::write(corpus.join("b-train.conllu"), "B").unwrap();
        fs::write(corpus.join("a-dev.conllu"), "A").unwrap();
        fs::write(corpus.join("README.md"), "ignored").unwrap();

        let files = DirectorySource::new(root.path()).fetch("UD_Test", None).unwrap();
        let names: Vec<_> = files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["a-dev.conllu", "b-train.conllu"]);
        assert_eq!(files[0].content, "A");
    }

    #[test]
    fn test_missing_corpus_is_an_io_error() {
        let root = tempfile::tempdir().unwrap();
        let err = DirectorySource::new(root.path()).fetch("nope", Some("2.13")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
