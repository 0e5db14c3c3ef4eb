//! Lexer
//!
//!     The lexer classifies the maximal run of characters starting at a cursor and measures it.
//!     It keeps no state between calls: every call gets the source, a cursor and an end index,
//!     and answers with a [Lexeme], a category plus a byte length. The directive engine decides
//!     how far to move its own cursor.
//!
//! Categories
//!
//!     Whitespace: a run of spaces and tabs.
//!     Newline: one logical line break, at most one `\r` and at most one `\n` in either order.
//!     Word: a run of ASCII letters, digits and underscores.
//!     Operator: a run of `!`, `&`, `|`, `(` and `)`.
//!     String: one `"` delimited literal. A backslash skips the next character. Unterminated
//!         literals run to the end of the input.
//!     None: nothing recognised, which happens at the end of the input.
//!
//! Comments
//!
//!     `//` opens a line comment. The comment text is consumed but never classifies nor breaks
//!     the lexeme, so its length is folded into whatever lexeme ends the scan. In practice the
//!     newline after a comment absorbs it: `// note\n` lexes as a single Newline of length 8.
//!     A lone `/` is consumed silently as well.
//!
//!     Characters outside every category are skipped while no category is committed, and stop
//!     the scan once one is.
//!
//! The character classes come from the logos atoms in [atoms]; this module only implements the
//! scanning rules on top of them.

pub mod atoms;

use atoms::Atom;
use logos::Logos;
use serde::Serialize;
use std::fmt;

/// Lexeme categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LexKind {
    None,
    Whitespace,
    Newline,
    Word,
    Operator,
    String,
}

impl fmt::Display for LexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexKind::None => write!(f, "NONE"),
            LexKind::Whitespace => write!(f, "WHITESPACE"),
            LexKind::Newline => write!(f, "NEWLINE"),
            LexKind::Word => write!(f, "WORD"),
            LexKind::Operator => write!(f, "OPERATOR"),
            LexKind::String => write!(f, "STRING"),
        }
    }
}

/// One classified run of input, measured in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lexeme {
    pub kind: LexKind,
    pub len: usize,
}

impl Lexeme {
    pub fn new(kind: LexKind, len: usize) -> Self {
        Self { kind, len }
    }

    /// The empty lexeme produced at the end of the input.
    pub fn none() -> Self {
        Self::new(LexKind::None, 0)
    }
}

/// Result of [lex_next]: the significant lexeme after at most one whitespace run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextLexeme {
    pub kind: LexKind,
    /// Bytes to advance past the whitespace and the lexeme
    pub advance: usize,
    /// Byte index where the lexeme starts
    pub start: usize,
    pub len: usize,
}

impl NextLexeme {
    /// A line break or the end of the input
    pub fn is_line_end(&self) -> bool {
        matches!(self.kind, LexKind::Newline | LexKind::None)
    }

    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.start..self.start + self.len).unwrap_or("")
    }
}

/// Classify and measure the run starting at `cursor`, never reading at or past `end`.
pub fn lex(source: &str, cursor: usize, end: usize) -> Lexeme {
    let Some(text) = source.get(cursor..end) else {
        return Lexeme::none();
    };

    if text.starts_with('"') {
        return Lexeme::new(LexKind::String, string_len(text));
    }

    let mut kind = LexKind::None;
    let mut consumed = 0;
    let mut comment_opened = false;
    let mut in_comment = false;
    let mut seen_cr = false;
    let mut seen_lf = false;

    let mut atoms = Atom::lexer(text);
    while let Some(result) = atoms.next() {
        let atom = result.unwrap_or(Atom::Other);
        let span = atoms.span();

        if atom == Atom::Slash {
            if comment_opened {
                in_comment = true;
            } else {
                comment_opened = true;
            }
            consumed = span.end;
            continue;
        }

        if !in_comment {
            comment_opened = false;
        }

        match atom {
            Atom::CarriageReturn if seen_cr => break,
            Atom::LineFeed if seen_lf => break,
            Atom::CarriageReturn | Atom::LineFeed => {
                // A comment never crosses a line break
                in_comment = false;
                comment_opened = false;
                if atom == Atom::CarriageReturn {
                    seen_cr = true;
                } else {
                    seen_lf = true;
                }
            }
            _ if in_comment => {
                consumed = span.end;
                continue;
            }
            _ => {}
        }

        let class = atom.kind();
        if kind == LexKind::None {
            kind = class;
        } else if class != kind {
            break;
        }
        consumed = span.end;
    }

    Lexeme::new(kind, consumed)
}

/// Same as [lex], except that one leading whitespace run is skipped.
pub fn lex_next(source: &str, cursor: usize, end: usize) -> NextLexeme {
    let first = lex(source, cursor, end);
    if first.kind != LexKind::Whitespace {
        return NextLexeme {
            kind: first.kind,
            advance: first.len,
            start: cursor,
            len: first.len,
        };
    }

    let start = cursor + first.len;
    let second = lex(source, start, end);
    NextLexeme {
        kind: second.kind,
        advance: first.len + second.len,
        start,
        len: second.len,
    }
}

/// Length of the string literal opening `text`, delimiters included.
fn string_len(text: &str) -> usize {
    let mut chars = text.char_indices().skip(1);
    while let Some((index, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '"' => return index + 1,
            _ => {}
        }
    }
    text.len()
}
