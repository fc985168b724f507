use nom::{
    bytes::complete::{take_till, take_till1},
    character::complete::{char, multispace0},
    combinator::all_consuming,
    error::{Error, ErrorKind},
    multi::separated_list1,
    sequence::{pair, preceded, separated_pair},
    IResult,
};

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Number of tab-separated columns on a token line.
pub const COLUMN_COUNT: usize = 10;

/// The ten raw columns of a token line, borrowed from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenColumns<'a> {
    pub id: &'a str,
    pub form: &'a str,
    pub lemma: &'a str,
    pub upos: &'a str,
    pub xpos: &'a str,
    pub feats: &'a str,
    pub head: &'a str,
    pub deprel: &'a str,
    pub deps: &'a str,
    pub misc: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// `# key = value`
    Comment { key: &'a str, value: &'a str },
    Token(TokenColumns<'a>),
    Other,
}

/// Optional indentation, `#`, a key free of whitespace and `=`, `=`, then a
/// non-empty value running to the end of the line.
fn comment(input: &str) -> IResult<&str, (&str, &str)> {
    preceded(
        pair(multispace0, char('#')),
        separated_pair(
            preceded(multispace0, take_till1(|c: char| c.is_whitespace() || c == '=')),
            preceded(multispace0, char('=')),
            comment_value,
        ),
    )(input)
}

/// Everything after the leading whitespace. A value made only of whitespace
/// keeps its last character.
fn comment_value(input: &str) -> IResult<&str, &str> {
    let value = input.trim_start();
    if !value.is_empty() {
        return Ok(("", value));
    }
    match input.char_indices().last() {
        Some((at, _)) => Ok(("", &input[at..])),
        None => Err(nom::Err::Error(Error::new(input, ErrorKind::NonEmpty))),
    }
}

fn columns(input: &str) -> IResult<&str, Vec<&str>> {
    all_consuming(separated_list1(char('\t'), take_till(|c: char| c == '\t')))(input)
}

fn token_columns(line: &str) -> Option<TokenColumns<'_>> {
    let (_, columns) = columns(line).ok()?;
    let [id, form, lemma, upos, xpos, feats, head, deprel, deps, misc]: [&str; COLUMN_COUNT] =
        columns.try_into().ok()?;
    Some(TokenColumns {
        id,
        form,
        lemma,
        upos,
        xpos,
        feats,
        head,
        deprel,
        deps,
        misc,
    })
}

/// Classifies one line of a sentence block.
pub fn classify(line: &str) -> Line<'_> {
    if let Ok((_, (key, value))) = comment(line) {
        return Line::Comment { key, value };
    }
    match token_columns(line) {
        Some(columns) => Line::Token(columns),
        None => Line::Other,
    }
}

/// Splits a document into sentence blocks at blank (whitespace-only) lines.
///
/// Blocks are returned as slices of `raw`, in document order, and are never
/// empty after trimming. A leading byte order mark is not part of any block.
pub fn split_blocks(raw: &str) -> Vec<&str> {
    let raw = raw.strip_prefix(BYTE_ORDER_MARK).unwrap_or(raw);
    let mut blocks = Vec::new();
    let mut start: Option<usize> = None;
    let mut end = 0;
    let mut offset = 0;

    for line in raw.split_inclusive('\n') {
        let line_end = offset + line.len();
        if line.trim().is_empty() {
            if let Some(block_start) = start.take() {
                blocks.push(&raw[block_start..end]);
            }
        } else {
            start.get_or_insert(offset);
            end = line_end;
        }
        offset = line_end;
    }

    if let Some(block_start) = start {
        blocks.push(&raw[block_start..end]);
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_lines() {
        assert_eq!(
            classify("# sent_id = train-s1"),
            Line::Comment { key: "sent_id", value: "train-s1" }
        );
        assert_eq!(
            classify("#text=Hello there."),
            Line::Comment { key: "text", value: "Hello there." }
        );
        assert_eq!(
            classify("# newpar id = p2"),
            Line::Other,
            "keys cannot contain whitespace"
        );
        assert_eq!(classify("# newdoc"), Line::Other);
        assert_eq!(classify("# text ="), Line::Other);
    }

    #[test]
    fn test_indented_comment_is_recognised() {
        assert_eq!(
            classify("  # sent_id = x"),
            Line::Comment { key: "sent_id", value: "x" }
        );
        assert_eq!(
            classify("\t#sent_id=y"),
            Line::Comment { key: "sent_id", value: "y" }
        );
    }

    #[test]
    fn test_whitespace_only_value_keeps_last_char() {
        assert_eq!(
            classify("# text = \t"),
            Line::Comment { key: "text", value: "\t" }
        );
        assert_eq!(
            classify("# text =  "),
            Line::Comment { key: "text", value: " " }
        );
    }

    #[test]
    fn test_comment_value_keeps_inner_equals() {
        assert_eq!(
            classify("# translit = a=b"),
            Line::Comment { key: "translit", value: "a=b" }
        );
    }

    #[test]
    fn test_token_line_needs_exactly_ten_columns() {
        let line = "1\tThe\tthe\tDET\tDT\tDefinite=Def\t2\tdet\t_\t_";
        match classify(line) {
            Line::Token(columns) => {
                assert_eq!(columns.id, "1");
                assert_eq!(columns.feats, "Definite=Def");
                assert_eq!(columns.misc, "_");
            }
            other => panic!("expected a token line, got {other:?}"),
        }

        assert_eq!(classify("1\tThe\tthe\tDET\tDT\t_\t2\tdet\t_"), Line::Other);
        assert_eq!(classify("1\tThe\tthe\tDET\tDT\t_\t2\tdet\t_\t_\t_"), Line::Other);
        assert_eq!(classify("just some text"), Line::Other);
    }

    #[test]
    fn test_empty_columns_are_kept() {
        match classify("1\t\tx\t_\t_\t_\t0\troot\t_\t") {
            Line::Token(columns) => {
                assert_eq!(columns.form, "");
                assert_eq!(columns.misc, "");
            }
            other => panic!("expected a token line, got {other:?}"),
        }
    }

    #[test]
    fn test_split_blocks() {
        let raw = "\n\n# sent_id = a\n1\tx\n\n  \n# sent_id = b\n2\ty\n\n\n# sent_id = c";
        assert_eq!(
            split_blocks(raw),
            vec!["# sent_id = a\n1\tx\n", "# sent_id = b\n2\ty\n", "# sent_id = c"]
        );
        assert!(split_blocks("\n \n\t\n").is_empty());
    }

    #[test]
    fn test_split_blocks_drops_byte_order_mark() {
        let raw = "\u{feff}# sent_id = a\n1\tx\n\n# sent_id = b\n";
        assert_eq!(split_blocks(raw), vec!["# sent_id = a\n1\tx\n", "# sent_id = b\n"]);
        assert_eq!(
            classify(split_blocks(raw)[0].lines().next().unwrap()),
            Line::Comment { key: "sent_id", value: "a" }
        );
    }
}
