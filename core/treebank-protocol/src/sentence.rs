use indexmap::IndexMap;

use crate::error::ModelError;
use crate::ids::{TokenHandle, TokenId};
use crate::token::TokenRecord;

/// One sentence block: comment metadata plus its tokens in source order.
///
/// Tokens live in an insertion-ordered arena keyed by their textual id. Head
/// links are [`TokenHandle`]s into that arena, so every link points at a token
/// of the same sentence or is absent.
#[derive(Debug, Clone, Default)]
pub struct Sentence {
    pub sent_id: Option<String>,
    pub text: Option<String>,
    /// Comment keys other than `sent_id` and `text`, in first-seen order.
    pub metadata: IndexMap<String, String>,
    tokens: IndexMap<TokenId, TokenRecord>,
}

impl Sentence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sent_id(mut self, sent_id: impl Into<String>) -> Self {
        self.sent_id = Some(sent_id.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Tokens in stored order.
    pub fn tokens(&self) -> impl Iterator<Item = &TokenRecord> {
        self.tokens.values()
    }

    /// Tokens in stored order, paired with their handles.
    pub fn handles(&self) -> impl Iterator<Item = (TokenHandle, &TokenRecord)> {
        self.tokens.values().enumerate().map(|(i, token)| (handle_at(i), token))
    }

    pub fn token(&self, id: &str) -> Option<&TokenRecord> {
        self.tokens.get(id)
    }

    pub fn token_mut(&mut self, id: &str) -> Option<&mut TokenRecord> {
        self.tokens.get_mut(id)
    }

    pub fn handle(&self, id: &str) -> Option<TokenHandle> {
        self.tokens.get_index_of(id).map(handle_at)
    }

    pub fn get(&self, handle: TokenHandle) -> Option<&TokenRecord> {
        self.tokens.get_index(handle.index()).map(|(_, token)| token)
    }

    /// The token governing `token`, if it has one.
    pub fn head_of(&self, token: &TokenRecord) -> Option<&TokenRecord> {
        token.head.and_then(|head| self.get(head))
    }

    /// Tokens whose head is `handle`, in stored order.
    pub fn dependents(&self, handle: TokenHandle) -> impl Iterator<Item = &TokenRecord> {
        self.tokens.values().filter(move |token| token.head == Some(handle))
    }

    /// Appends a token. Its head starts out absent; link it with [`Self::link`].
    pub fn push_token(&mut self, mut token: TokenRecord) -> Result<TokenHandle, ModelError> {
        if self.tokens.contains_key(token.id()) {
            return Err(ModelError::DuplicateTokenId {
                id: token.id().to_string(),
            });
        }
        token.head = None;
        let (index, _) = self.tokens.insert_full(token.id().clone(), token);
        Ok(handle_at(index))
    }

    /// Inserts a token, replacing any token with the same id in place.
    ///
    /// The replaced token keeps its position and the links other tokens hold
    /// to it; the new token's own head starts out absent.
    pub fn upsert_token(&mut self, mut token: TokenRecord) -> (TokenHandle, Option<TokenRecord>) {
        token.head = None;
        let (index, previous) = self.tokens.insert_full(token.id().clone(), token);
        (handle_at(index), previous)
    }

    /// Points `dependent` at `head`, or clears its head when `head` is `None`.
    ///
    /// Multiword spans may be neither dependent nor head.
    pub fn link(&mut self, dependent: TokenHandle, head: Option<TokenHandle>) -> Result<(), ModelError> {
        if let Some(head) = head {
            let target = self.get(head).ok_or_else(|| unknown_handle(head))?;
            if target.is_multiword() {
                return Err(ModelError::SpanInDependency {
                    id: target.id().to_string(),
                });
            }
        }

        let (_, token) = self
            .tokens
            .get_index_mut(dependent.index())
            .ok_or_else(|| unknown_handle(dependent))?;
        if token.is_multiword() && head.is_some() {
            return Err(ModelError::SpanInDependency {
                id: token.id().to_string(),
            });
        }
        token.head = head;
        Ok(())
    }

    /// Id-based form of [`Self::link`].
    pub fn set_head(&mut self, dependent: &str, head: Option<&str>) -> Result<(), ModelError> {
        let dependent = self.handle(dependent).ok_or_else(|| ModelError::UnknownToken {
            id: dependent.to_string(),
        })?;
        let head = match head {
            Some(id) => Some(self.handle(id).ok_or_else(|| ModelError::UnknownToken { id: id.to_string() })?),
            None => None,
        };
        self.link(dependent, head)
    }

    /// Removes a token. Tokens that were headed by it lose their head; the
    /// remaining handles are renumbered so every link stays valid.
    pub fn remove_token(&mut self, id: &str) -> Option<TokenRecord> {
        let (removed, _, mut token) = self.tokens.shift_remove_full(id)?;
        token.head = None;

        for other in self.tokens.values_mut() {
            other.head = match other.head {
                Some(head) if head.index() == removed => None,
                Some(head) if head.index() > removed => Some(TokenHandle::new(head.0 - 1)),
                head => head,
            };
        }
        Some(token)
    }
}

fn handle_at(index: usize) -> TokenHandle {
    TokenHandle::new(index as u32)
}

fn unknown_handle(handle: TokenHandle) -> ModelError {
    ModelError::UnknownToken {
        id: format!("#{}", handle.0),
    }
}

/// Field-for-field equality, sensitive to metadata and token order.
impl PartialEq for Sentence {
    fn eq(&self, other: &Self) -> bool {
        self.sent_id == other.sent_id
            && self.text == other.text
            && self.metadata.iter().eq(other.metadata.iter())
            && self.tokens.values().eq(other.tokens.values())
    }
}

impl Eq for Sentence {}
