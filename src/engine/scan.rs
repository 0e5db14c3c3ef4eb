//! Per-call scan state and the main loop
//!
//! A [Scan] lives for exactly one `process` call. It walks the source once, left to right,
//! recording blank ranges instead of writing, and hands them back with the number of scopes
//! left open.

use super::{Preprocessor, DIRECTIVE_MARKER};
use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::lexing::{self, LexKind, Lexeme, NextLexeme};
use crate::rewrite::Blanks;
use crate::scope::Scope;

pub(super) struct ScanOutcome {
    pub blanks: Blanks,
    pub unclosed_scopes: usize,
}

pub(super) struct Scan<'p, 's> {
    pub(super) pp: &'p mut Preprocessor,
    pub(super) source: &'s str,
    pub(super) end: usize,
    pub(super) cursor: usize,
    pub(super) line: usize,
    pub(super) column: usize,
    pub(super) stack: Vec<Scope>,
    blanks: Blanks,
}

impl<'p, 's> Scan<'p, 's> {
    pub fn new(pp: &'p mut Preprocessor, source: &'s str) -> Self {
        Self {
            pp,
            source,
            end: source.len(),
            cursor: 0,
            line: 1,
            column: 0,
            stack: Vec::new(),
            blanks: Blanks::new(),
        }
    }

    pub fn run(mut self) -> ScanOutcome {
        while self.cursor < self.end {
            let top = self.top();
            let Some(c) = self.current_char() else {
                break;
            };

            if c == '\n' {
                self.cursor += 1;
                self.new_line();
                continue;
            }

            let at_line_start = self.column == 0;
            self.column += 1;

            if !at_line_start || c != DIRECTIVE_MARKER {
                let width = c.len_utf8();
                if top.is_erasing() && c != '\r' {
                    self.blanks.push(self.cursor..self.cursor + width);
                }
                self.cursor += width;
                continue;
            }

            let start = self.cursor;
            self.cursor += DIRECTIVE_MARKER.len_utf8();

            // An abandoned directive leaves what it consumed untouched
            if self.directive(top).is_some() {
                self.blanks.push(start..self.cursor);
            }
        }

        let unclosed_scopes = self.stack.len();
        if unclosed_scopes > 0 {
            self.warn(
                DiagnosticCode::UnclosedScope,
                format!(
                    "{} preprocessor scope(s) left unclosed at end of input (did you forget \"#endif\"?)",
                    unclosed_scopes
                ),
            );
        }

        ScanOutcome {
            blanks: self.blanks,
            unclosed_scopes,
        }
    }

    /// Innermost scope, or the passing top level
    pub(super) fn top(&self) -> Scope {
        self.stack.last().copied().unwrap_or_default()
    }

    pub(super) fn replace_top(&mut self, scope: Scope) {
        if let Some(top) = self.stack.last_mut() {
            *top = scope;
        }
    }

    fn current_char(&self) -> Option<char> {
        self.source.get(self.cursor..self.end)?.chars().next()
    }

    pub(super) fn new_line(&mut self) {
        self.line += 1;
        self.column = 0;
    }

    pub(super) fn lex(&self) -> Lexeme {
        lexing::lex(self.source, self.cursor, self.end)
    }

    /// Lex past one optional whitespace run and advance over both.
    pub(super) fn next_lexeme(&mut self) -> NextLexeme {
        let next = lexing::lex_next(self.source, self.cursor, self.end);
        self.cursor += next.advance;
        next
    }

    /// Consume one lexeme of the `expected` kind and return its text. On a mismatch, warn and
    /// consume nothing.
    pub(super) fn accept(&mut self, expected: LexKind) -> Option<&'s str> {
        let lexeme = self.lex();
        if lexeme.kind != expected {
            let message = format!(
                "Unexpected '{}' of type {}, was expecting a {}",
                self.char_text(),
                lexeme.kind,
                expected
            );
            self.warn(DiagnosticCode::UnexpectedToken, message);
            return None;
        }

        let text = self.source.get(self.cursor..self.cursor + lexeme.len)?;
        self.cursor += lexeme.len;
        Some(text)
    }

    /// Require the end of the line. The end of the input counts as one.
    pub(super) fn expect_eol(&mut self) {
        if self.cursor >= self.end {
            return;
        }
        if self.accept(LexKind::Newline).is_some() {
            self.new_line();
        }
    }

    /// Skip to just past the next line break, or to the end of the input. Returns the text
    /// skipped.
    pub(super) fn consume_line(&mut self) -> &'s str {
        let start = self.cursor;
        loop {
            let lexeme = self.lex();
            self.cursor += lexeme.len;
            if lexeme.kind == LexKind::Newline {
                self.new_line();
                break;
            }
            if lexeme.len == 0 {
                break;
            }
        }
        self.source.get(start..self.cursor).unwrap_or("")
    }

    /// The character under the cursor as shown in diagnostics
    fn char_text(&self) -> String {
        match self.source.as_bytes().get(self.cursor) {
            Some(byte) if self.cursor < self.end && byte.is_ascii_alphanumeric() => {
                char::from(*byte).to_string()
            }
            Some(byte) if self.cursor < self.end => format!("\\x{:02X}", byte),
            _ => "\\x00".to_string(),
        }
    }

    pub(super) fn warn(&mut self, code: DiagnosticCode, message: String) {
        self.warn_at(code, message, self.line);
    }

    pub(super) fn warn_at(&mut self, code: DiagnosticCode, message: String, line: usize) {
        tracing::warn!(line, code = %code, "{}", message);
        self.pp
            .diagnostics
            .push(Diagnostic::warning(code, message, line));
    }

    pub(super) fn error_at(&mut self, code: DiagnosticCode, message: String, line: usize) {
        tracing::error!(line, code = %code, "{}", message);
        self.pp.diagnostics.push(Diagnostic::error(code, message, line));
    }
}
