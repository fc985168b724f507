//! Structured reports for recoverable parse problems.

use std::fmt;

use thiserror::Error;

const UNKNOWN_SENTENCE: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A token id did not match `N` or `N-M`; the whole block was dropped.
    InvalidTokenId,
    /// A FEATS segment without exactly one `=`; only that pair was dropped.
    MalformedFeaturePair,
}

/// Column of the token line a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Id,
    Feats,
}

impl Column {
    pub fn name(self) -> &'static str {
        match self {
            Column::Id => "ID",
            Column::Feats => "FEATS",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// The sentence's `sent_id` as known when the problem was found.
    pub sent_id: Option<String>,
    /// Id of the offending token, when it had a valid one.
    pub token_id: Option<String>,
    pub column: Column,
    /// The offending raw text.
    pub raw: String,
}

impl Diagnostic {
    pub fn sentence_label(&self) -> &str {
        self.sent_id.as_deref().unwrap_or(UNKNOWN_SENTENCE)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DiagnosticKind::InvalidTokenId => write!(
                f,
                "invalid token id '{}' in sentence {}; sentence skipped",
                self.raw,
                self.sentence_label()
            ),
            DiagnosticKind::MalformedFeaturePair => write!(
                f,
                "malformed feature '{}' on token {} in sentence {}; pair skipped",
                self.raw,
                self.token_id.as_deref().unwrap_or("?"),
                self.sentence_label()
            ),
        }
    }
}

/// A block-level failure: the block contributes no sentence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid token id '{id}' in sentence {}", .sent_id.as_deref().unwrap_or(UNKNOWN_SENTENCE))]
    InvalidTokenId { id: String, sent_id: Option<String> },
}

impl ParseError {
    pub fn diagnostic(&self) -> Diagnostic {
        match self {
            ParseError::InvalidTokenId { id, sent_id } => Diagnostic {
                kind: DiagnosticKind::InvalidTokenId,
                sent_id: sent_id.clone(),
                token_id: None,
                column: Column::Id,
                raw: id.clone(),
            },
        }
    }
}
