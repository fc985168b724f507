use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("invalid token id '{id}'")]
    InvalidTokenId { id: String },

    #[error("token id '{id}' already exists in this sentence")]
    DuplicateTokenId { id: String },

    #[error("no token '{id}' in this sentence")]
    UnknownToken { id: String },

    #[error("multiword span '{id}' cannot take part in a dependency")]
    SpanInDependency { id: String },

    #[error("snapshot error: {reason}")]
    Snapshot { reason: String },
}
