pub mod block;
pub mod diagnostic;
pub mod lexer;

pub use block::{parse_sentence, ParsedSentence};
pub use diagnostic::{Column, Diagnostic, DiagnosticKind, ParseError};
pub use lexer::{classify, split_blocks, Line, TokenColumns};

/// Parses every block of a document, in document order.
///
/// Blocks are independent: a failing block yields its error in place and does
/// not affect its neighbours.
pub fn parse_blocks(raw: &str) -> Vec<Result<ParsedSentence, ParseError>> {
    split_blocks(raw).into_iter().map(parse_sentence).collect()
}
