use thiserror::Error;
use treebank_protocol::ModelError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sentence {} is already in the store", .sent_id.as_deref().unwrap_or("without sent_id"))]
    DuplicateSentence { sent_id: Option<String> },

    #[error("could not fetch corpus '{name}': {source}")]
    Source {
        name: String,
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error(transparent)]
    Model(#[from] ModelError),
}
