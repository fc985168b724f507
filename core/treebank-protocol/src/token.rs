use core::fmt;

use crate::features::Features;
use crate::fields::SENTINEL;
use crate::ids::{TokenHandle, TokenId};

/// One annotated token line.
///
/// The head link is owned by the enclosing [`crate::Sentence`]: it is a handle
/// into that sentence's token arena and can only be set through
/// [`crate::Sentence::link`] or [`crate::Sentence::set_head`], so it never
/// points outside the sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    id: TokenId,
    pub form: Option<String>,
    pub lemma: Option<String>,
    pub upos: Option<String>,
    pub xpos: Option<String>,
    pub feats: Option<Features>,
    pub(crate) head: Option<TokenHandle>,
    pub deprel: Option<String>,
    pub deps: Option<String>,
    pub misc: Option<String>,
}

impl TokenRecord {
    /// A token with every annotation column absent.
    pub fn new(id: TokenId) -> Self {
        Self {
            id,
            form: None,
            lemma: None,
            upos: None,
            xpos: None,
            feats: None,
            head: None,
            deprel: None,
            deps: None,
            misc: None,
        }
    }

    pub fn id(&self) -> &TokenId {
        &self.id
    }

    /// Handle of the governing token; `None` for the root and for multiword spans.
    pub fn head(&self) -> Option<TokenHandle> {
        self.head
    }

    pub fn is_multiword(&self) -> bool {
        self.id.is_multiword()
    }

    pub fn with_form(mut self, form: impl Into<String>) -> Self {
        self.form = Some(form.into());
        self
    }

    pub fn with_lemma(mut self, lemma: impl Into<String>) -> Self {
        self.lemma = Some(lemma.into());
        self
    }

    pub fn with_upos(mut self, upos: impl Into<String>) -> Self {
        self.upos = Some(upos.into());
        self
    }

    pub fn with_xpos(mut self, xpos: impl Into<String>) -> Self {
        self.xpos = Some(xpos.into());
        self
    }

    pub fn with_feats(mut self, feats: Features) -> Self {
        self.feats = Some(feats);
        self
    }

    pub fn with_deprel(mut self, deprel: impl Into<String>) -> Self {
        self.deprel = Some(deprel.into());
        self
    }

    pub fn with_deps(mut self, deps: impl Into<String>) -> Self {
        self.deps = Some(deps.into());
        self
    }

    pub fn with_misc(mut self, misc: impl Into<String>) -> Self {
        self.misc = Some(misc.into());
        self
    }
}

/// Writes the surface form.
impl fmt::Display for TokenRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.form.as_deref().unwrap_or(SENTINEL))
    }
}
