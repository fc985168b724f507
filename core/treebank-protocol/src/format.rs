//! Canonical CoNLL-U writer.
//!
//! Output order is fixed: `sent_id`, `text`, the remaining metadata in stored
//! order, one line per token, then a single blank line.

use core::fmt::{self, Write};

use crate::features::Features;
use crate::fields::{self, SENTINEL};
use crate::sentence::Sentence;
use crate::token::TokenRecord;

/// HEAD value written for a syntactic word without a governing token.
pub const ROOT_HEAD: &str = "0";

pub fn write_sentence<W: Write>(out: &mut W, sentence: &Sentence) -> fmt::Result {
    if let Some(sent_id) = &sentence.sent_id {
        writeln!(out, "# sent_id = {sent_id}")?;
    }
    if let Some(text) = &sentence.text {
        writeln!(out, "# text = {text}")?;
    }
    for (key, value) in &sentence.metadata {
        writeln!(out, "# {key} = {value}")?;
    }
    for token in sentence.tokens() {
        write_token(out, sentence, token)?;
    }
    writeln!(out)
}

fn write_token<W: Write>(out: &mut W, sentence: &Sentence, token: &TokenRecord) -> fmt::Result {
    let head = if token.is_multiword() {
        SENTINEL
    } else {
        sentence
            .head_of(token)
            .map_or(ROOT_HEAD, |head| head.id().as_str())
    };

    writeln!(
        out,
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        token.id(),
        fields::encode(token.form.as_deref()),
        fields::encode(token.lemma.as_deref()),
        fields::encode(token.upos.as_deref()),
        fields::encode(token.xpos.as_deref()),
        Features::encode(token.feats.as_ref()),
        head,
        fields::encode(token.deprel.as_deref()),
        fields::encode(token.deps.as_deref()),
        fields::encode(token.misc.as_deref()),
    )
}

pub fn to_conllu(sentence: &Sentence) -> String {
    sentence.to_string()
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_sentence(f, self)
    }
}
