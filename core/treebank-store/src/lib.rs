//! Named, queryable collections of CoNLL-U sentences.

pub mod error;
pub mod source;
pub mod store;

pub use error::StoreError;
pub use source::{CorpusFile, CorpusNotFound, CorpusSource, MemorySource};
pub use store::{LoadOptions, LoadReport, TreebankStore};

// Parsing and model types callers need alongside the store
pub use treebank_parser::{Diagnostic, DiagnosticKind};
pub use treebank_protocol::{Sentence, TokenRecord};
