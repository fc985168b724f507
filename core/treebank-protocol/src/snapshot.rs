//! Flat, archivable mirror of a corpus.
//!
//! Tokens are stored as rows with their head as an arena index, which lets a
//! whole treebank be written with rkyv and mapped back without re-parsing text.

use rkyv::{Archive, Deserialize, Serialize};

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

use crate::error::ModelError;
use crate::features::Features;
use crate::ids::{TokenHandle, TokenId};
use crate::sentence::Sentence;
use crate::token::TokenRecord;

/// Bumped whenever the archived layout changes.
pub const SNAPSHOT_FORMAT: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct TokenRow {
    pub id: String,
    pub form: Option<String>,
    pub lemma: Option<String>,
    pub upos: Option<String>,
    pub xpos: Option<String>,
    pub feats: Option<Vec<(String, String)>>,
    pub head: Option<TokenHandle>,
    pub deprel: Option<String>,
    pub deps: Option<String>,
    pub misc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct SentenceRecord {
    pub sent_id: Option<String>,
    pub text: Option<String>,
    pub metadata: Vec<(String, String)>,
    pub tokens: Vec<TokenRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct CorpusSnapshot {
    pub format: u32,
    pub name: String,
    pub version: Option<String>,
    pub sentences: Vec<SentenceRecord>,
}

impl From<&Sentence> for SentenceRecord {
    fn from(sentence: &Sentence) -> Self {
        let tokens = sentence
            .tokens()
            .map(|token| TokenRow {
                id: token.id().to_string(),
                form: token.form.clone(),
                lemma: token.lemma.clone(),
                upos: token.upos.clone(),
                xpos: token.xpos.clone(),
                feats: token.feats.clone().map(Features::into_pairs),
                head: token.head(),
                deprel: token.deprel.clone(),
                deps: token.deps.clone(),
                misc: token.misc.clone(),
            })
            .collect();

        Self {
            sent_id: sentence.sent_id.clone(),
            text: sentence.text.clone(),
            metadata: sentence
                .metadata
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            tokens,
        }
    }
}

impl TryFrom<SentenceRecord> for Sentence {
    type Error = ModelError;

    fn try_from(record: SentenceRecord) -> Result<Self, Self::Error> {
        let mut sentence = Sentence::new();
        sentence.sent_id = record.sent_id;
        sentence.text = record.text;
        sentence.metadata = record.metadata.into_iter().collect();

        // 1. Rebuild the arena
        let mut heads = Vec::with_capacity(record.tokens.len());
        for row in record.tokens {
            let mut token = TokenRecord::new(TokenId::parse(&row.id)?);
            token.form = row.form;
            token.lemma = row.lemma;
            token.upos = row.upos;
            token.xpos = row.xpos;
            token.feats = row.feats.map(Features::from);
            token.deprel = row.deprel;
            token.deps = row.deps;
            token.misc = row.misc;
            heads.push((sentence.push_token(token)?, row.head));
        }

        // 2. Re-link heads now that every index exists
        for (dependent, head) in heads {
            sentence.link(dependent, head)?;
        }
        Ok(sentence)
    }
}

impl CorpusSnapshot {
    pub fn new<'a>(
        name: impl Into<String>,
        version: Option<String>,
        sentences: impl IntoIterator<Item = &'a Sentence>,
    ) -> Self {
        Self {
            format: SNAPSHOT_FORMAT,
            name: name.into(),
            version,
            sentences: sentences.into_iter().map(SentenceRecord::from).collect(),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ModelError> {
        let bytes = rkyv::to_bytes::<_, 4096>(self).map_err(|e| ModelError::Snapshot {
            reason: format!("{e:?}"),
        })?;
        Ok(bytes.to_vec())
    }

    /// Validates and decodes an archive written by [`Self::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ModelError> {
        // Archives must be read from an aligned buffer
        let mut aligned = rkyv::AlignedVec::with_capacity(bytes.len());
        aligned.extend_from_slice(bytes);

        let snapshot: Self = rkyv::from_bytes(&aligned).map_err(|e| ModelError::Snapshot {
            reason: format!("{e:?}"),
        })?;
        if snapshot.format != SNAPSHOT_FORMAT {
            return Err(ModelError::Snapshot {
                reason: format!("unsupported snapshot format {}", snapshot.format),
            });
        }
        Ok(snapshot)
    }

    pub fn into_sentences(self) -> Result<Vec<Sentence>, ModelError> {
        self.sentences.into_iter().map(Sentence::try_from).collect()
    }
}
