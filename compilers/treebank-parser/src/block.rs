//! Two-pass sentence block parser.
//!
//! Pass 1 classifies lines in order, filling the metadata and the token arena
//! while keeping every HEAD column as raw text. Pass 2 resolves those raw heads
//! against the finished arena, since a head may name a token that appears later
//! in the block.

use tracing::{debug, warn};
use treebank_protocol::{fields, Features, Sentence, TokenHandle, TokenId, TokenRecord, ROOT_HEAD};

use crate::diagnostic::{Column, Diagnostic, DiagnosticKind, ParseError};
use crate::lexer::{classify, Line, TokenColumns};

const SENT_ID_KEY: &str = "sent_id";
const TEXT_KEY: &str = "text";

/// A successfully parsed block and the field-level problems found in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSentence {
    pub sentence: Sentence,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parses one blank-line-free block of CoNLL-U.
///
/// An invalid token id fails the whole block. Malformed feature pairs are
/// skipped and reported in [`ParsedSentence::diagnostics`].
pub fn parse_sentence(block: &str) -> Result<ParsedSentence, ParseError> {
    let mut sentence = Sentence::new();
    // Raw HEAD text, indexed by token handle
    let mut raw_heads: Vec<Option<String>> = Vec::new();
    // (token id, segment)
    let mut malformed: Vec<(String, String)> = Vec::new();

    // Pass 1: classify lines
    for line in block.lines() {
        match classify(line) {
            Line::Comment { key, value } => match key {
                SENT_ID_KEY => sentence.sent_id = Some(value.to_string()),
                TEXT_KEY => sentence.text = Some(value.to_string()),
                _ => {
                    sentence
                        .metadata
                        .insert(key.trim().to_string(), value.trim().to_string());
                }
            },
            Line::Token(columns) => {
                let (token, raw_head, bad_pairs) = read_token(&columns, sentence.sent_id.as_deref())?;
                let token_id = token.id().to_string();

                let (handle, previous) = sentence.upsert_token(token);
                if previous.is_some() {
                    debug!(sent_id = ?sentence.sent_id, token_id = %token_id, "repeated token id replaces earlier line");
                }
                if handle.index() == raw_heads.len() {
                    raw_heads.push(raw_head);
                } else {
                    raw_heads[handle.index()] = raw_head;
                }
                malformed.extend(bad_pairs.into_iter().map(|segment| (token_id.clone(), segment)));
            }
            Line::Other => {}
        }
    }

    // Pass 2: resolve heads
    for (index, raw_head) in raw_heads.iter().enumerate() {
        let head = raw_head
            .as_deref()
            .filter(|head| *head != ROOT_HEAD)
            .and_then(|head| sentence.handle(head));
        if head.is_none() {
            continue;
        }
        // Multiword spans are never heads, so a HEAD naming one stays unresolved.
        if let Err(err) = sentence.link(TokenHandle::new(index as u32), head) {
            debug!(sent_id = ?sentence.sent_id, %err, "head left unresolved");
        }
    }

    let diagnostics = malformed
        .into_iter()
        .map(|(token_id, segment)| {
            let diagnostic = Diagnostic {
                kind: DiagnosticKind::MalformedFeaturePair,
                sent_id: sentence.sent_id.clone(),
                token_id: Some(token_id),
                column: Column::Feats,
                raw: segment,
            };
            warn!(
                sent_id = diagnostic.sentence_label(),
                field = diagnostic.column.name(),
                raw = %diagnostic.raw,
                "{diagnostic}"
            );
            diagnostic
        })
        .collect();

    Ok(ParsedSentence { sentence, diagnostics })
}

/// Decodes the columns of one token line. FORM and LEMMA are kept verbatim;
/// the other optional columns collapse the `_` sentinel to absence.
fn read_token(
    columns: &TokenColumns<'_>,
    sent_id: Option<&str>,
) -> Result<(TokenRecord, Option<String>, Vec<String>), ParseError> {
    let id = TokenId::parse(columns.id).map_err(|_| {
        let err = ParseError::InvalidTokenId {
            id: columns.id.to_string(),
            sent_id: sent_id.map(str::to_string),
        };
        warn!(
            sent_id = sent_id.unwrap_or("unknown"),
            field = Column::Id.name(),
            raw = columns.id,
            "{err}; sentence skipped"
        );
        err
    })?;

    let parsed = Features::parse(columns.feats);
    let mut token = TokenRecord::new(id);
    token.form = Some(columns.form.to_string());
    token.lemma = Some(columns.lemma.to_string());
    token.upos = fields::decode(columns.upos);
    token.xpos = fields::decode(columns.xpos);
    token.feats = parsed.features;
    token.deprel = fields::decode(columns.deprel);
    token.deps = fields::decode(columns.deps);
    token.misc = fields::decode(columns.misc);

    Ok((token, fields::decode(columns.head), parsed.malformed))
}
