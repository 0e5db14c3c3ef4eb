//! Atom definitions for the directive lexer
//!
//! Atoms are the character-class runs the logos lexer produces. They are finer than lexemes:
//! the lexeme scanner in [lexing](super) walks atoms and decides where a lexeme starts and
//! stops, including the `//` comment folding that logos alone cannot express.
//!
//! Every character of the input belongs to exactly one atom class, so the logos lexer never
//! produces an error for valid UTF-8 input.
use super::LexKind;
use logos::Logos;

#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Atom {
    // Spaces and tabs
    #[regex(r"[ \t]+")]
    Blank,

    // Line breaks are single atoms so the scanner can count them one at a time
    #[token("\r")]
    CarriageReturn,
    #[token("\n")]
    LineFeed,

    // Identifier characters
    #[regex(r"[A-Za-z0-9_]+")]
    Alnum,

    // Condition operators
    #[regex(r"[!&|()]+")]
    Operator,

    // Comment opener, one slash at a time
    #[token("/")]
    Slash,

    // Anything else, quotes included
    #[regex(r#"[^ \t\r\nA-Za-z0-9_!&|()/]+"#)]
    Other,
}

impl Atom {
    /// The lexeme category this atom commits to when it opens a lexeme.
    pub fn kind(self) -> LexKind {
        match self {
            Atom::Blank => LexKind::Whitespace,
            Atom::CarriageReturn | Atom::LineFeed => LexKind::Newline,
            Atom::Alnum => LexKind::Word,
            Atom::Operator => LexKind::Operator,
            Atom::Slash | Atom::Other => LexKind::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atoms(source: &str) -> Vec<Atom> {
        Atom::lexer(source).filter_map(|result| result.ok()).collect()
    }

    #[test]
    fn test_directive_line() {
        assert_eq!(
            atoms("#if A && !B\n"),
            vec![
                Atom::Other,
                Atom::Alnum,
                Atom::Blank,
                Atom::Alnum,
                Atom::Blank,
                Atom::Operator,
                Atom::Blank,
                Atom::Operator,
                Atom::Alnum,
                Atom::LineFeed,
            ]
        );
    }

    #[test]
    fn test_line_breaks_are_split() {
        assert_eq!(
            atoms("\r\n\n"),
            vec![Atom::CarriageReturn, Atom::LineFeed, Atom::LineFeed]
        );
    }

    #[test]
    fn test_slashes_are_split() {
        assert_eq!(atoms("//"), vec![Atom::Slash, Atom::Slash]);
    }

    #[test]
    fn test_non_ascii_is_other() {
        assert_eq!(atoms("é\"ü"), vec![Atom::Other]);
    }
}
