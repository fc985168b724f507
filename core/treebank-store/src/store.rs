use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::{debug, info, warn};
use treebank_parser::{parse_sentence, split_blocks, Diagnostic, ParseError, ParsedSentence};
use treebank_protocol::{CorpusSnapshot, Sentence};

use crate::error::StoreError;
use crate::source::CorpusSource;

/// Tuning for bulk loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Parse blocks on the rayon pool.
    pub parallel: bool,
    /// Loads with fewer blocks than this are parsed on the calling thread.
    pub min_parallel_blocks: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            min_parallel_blocks: 64,
        }
    }
}

impl LoadOptions {
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }
}

/// Outcome of one or more bulk loads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Non-empty blocks seen.
    pub blocks: usize,
    /// Blocks that produced a sentence.
    pub loaded: usize,
    /// Everything that was skipped, in document order.
    pub diagnostics: Vec<Diagnostic>,
}

impl LoadReport {
    pub fn skipped(&self) -> usize {
        self.blocks - self.loaded
    }

    fn absorb(&mut self, other: LoadReport) {
        self.blocks += other.blocks;
        self.loaded += other.loaded;
        self.diagnostics.extend(other.diagnostics);
    }
}

/// A named collection of sentences keyed by `sent_id`.
///
/// Adding a sentence whose `sent_id` is already present replaces the stored
/// one in place (last write wins); use [`TreebankStore::strict_add`] to refuse
/// duplicates instead. Sentences without a `sent_id` share a single slot.
#[derive(Debug, Clone, Default)]
pub struct TreebankStore {
    name: String,
    version: Option<String>,
    sentences: IndexMap<Option<String>, Sentence>,
}

impl TreebankStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// Sentences in mapping order.
    pub fn iter(&self) -> impl Iterator<Item = &Sentence> {
        self.sentences.values()
    }

    pub fn get(&self, sent_id: &str) -> Option<&Sentence> {
        self.sentences.get(&Some(sent_id.to_string()))
    }

    /// Inserts `sentence`, returning the sentence it replaced, if any.
    pub fn add(&mut self, sentence: Sentence) -> Option<Sentence> {
        let previous = self.sentences.insert(sentence.sent_id.clone(), sentence);
        if let Some(previous) = &previous {
            debug!(store = %self.name, sent_id = ?previous.sent_id, "sentence replaced");
        }
        previous
    }

    /// Inserts `sentence` only if its `sent_id` is not yet present.
    pub fn strict_add(&mut self, sentence: Sentence) -> Result<(), StoreError> {
        if self.sentences.contains_key(&sentence.sent_id) {
            return Err(StoreError::DuplicateSentence {
                sent_id: sentence.sent_id,
            });
        }
        self.sentences.insert(sentence.sent_id.clone(), sentence);
        Ok(())
    }

    /// Removes a sentence, keeping the order of the rest.
    pub fn remove(&mut self, sent_id: &str) -> Option<Sentence> {
        self.sentences.shift_remove(&Some(sent_id.to_string()))
    }

    pub fn load(&mut self, raw: &str) -> LoadReport {
        self.load_with(raw, &LoadOptions::default())
    }

    /// Parses every block of `raw` and merges the sentences into the store.
    ///
    /// Blocks may be parsed in parallel, but they are merged in document
    /// order, so the last block with a given `sent_id` always wins.
    pub fn load_with(&mut self, raw: &str, options: &LoadOptions) -> LoadReport {
        let blocks = split_blocks(raw);
        let results: Vec<Result<ParsedSentence, ParseError>> =
            if options.parallel && blocks.len() >= options.min_parallel_blocks {
                blocks.par_iter().map(|block| parse_sentence(block)).collect()
            } else {
                blocks.iter().map(|block| parse_sentence(block)).collect()
            };

        let mut report = LoadReport {
            blocks: blocks.len(),
            ..LoadReport::default()
        };
        for result in results {
            match result {
                Ok(parsed) => {
                    report.loaded += 1;
                    report.diagnostics.extend(parsed.diagnostics);
                    self.add(parsed.sentence);
                }
                Err(err) => report.diagnostics.push(err.diagnostic()),
            }
        }

        debug!(
            store = %self.name,
            blocks = report.blocks,
            loaded = report.loaded,
            diagnostics = report.diagnostics.len(),
            "load finished"
        );
        report
    }

    /// Loads every file `source` provides for this store's name.
    ///
    /// A `version` given here is recorded on the store.
    pub fn load_source<S: CorpusSource>(
        &mut self,
        source: &S,
        version: Option<&str>,
        options: &LoadOptions,
    ) -> Result<LoadReport, StoreError> {
        let files = source.fetch(&self.name, version).map_err(|err| StoreError::Source {
            name: self.name.clone(),
            source: Box::new(err),
        })?;
        if let Some(version) = version {
            self.version = Some(version.to_string());
        }

        let mut report = LoadReport::default();
        for file in files {
            let file_report = self.load_with(&file.content, options);
            if file_report.skipped() > 0 {
                warn!(store = %self.name, file = %file.filename, skipped = file_report.skipped(), "blocks skipped");
            }
            info!(store = %self.name, file = %file.filename, sentences = file_report.loaded, "file loaded");
            report.absorb(file_report);
        }
        Ok(report)
    }

    /// Canonical CoNLL-U for every sentence, in mapping order.
    pub fn save(&self) -> String {
        self.sentences.values().map(Sentence::to_string).collect()
    }

    pub fn snapshot(&self) -> CorpusSnapshot {
        CorpusSnapshot::new(self.name.clone(), self.version.clone(), self.sentences.values())
    }

    pub fn from_snapshot(snapshot: CorpusSnapshot) -> Result<Self, StoreError> {
        let mut store = Self {
            name: snapshot.name.clone(),
            version: snapshot.version.clone(),
            ..Self::default()
        };
        for sentence in snapshot.into_sentences()? {
            store.add(sentence);
        }
        Ok(store)
    }
}

impl<'a> IntoIterator for &'a TreebankStore {
    type Item = &'a Sentence;
    type IntoIter = indexmap::map::Values<'a, Option<String>, Sentence>;

    fn into_iter(self) -> Self::IntoIter {
        self.sentences.values()
    }
}
