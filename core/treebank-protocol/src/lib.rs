pub mod error;
pub mod features;
pub mod fields;
pub mod format;
pub mod ids;
pub mod sentence;
pub mod snapshot;
pub mod token;

// Re-export core types for convenience
pub use error::ModelError;
pub use features::{Features, ParsedFeatures};
pub use format::{to_conllu, write_sentence, ROOT_HEAD};
pub use ids::{TokenHandle, TokenId};
pub use sentence::Sentence;
pub use snapshot::{CorpusSnapshot, SentenceRecord, TokenRow};
pub use token::TokenRecord;
