//! Directive handlers
//!
//! Every handler starts with the cursor right after the directive word. Returning `None`
//! abandons the directive: whatever was consumed so far is left as is and the main loop
//! resumes from the cursor. Returning `Some(())` makes the main loop blank the directive.

use super::scan::Scan;
use crate::condition::{Conditions, Match};
use crate::diagnostics::DiagnosticCode;
use crate::lexing::{self, LexKind, NextLexeme};
use crate::scope::Scope;
use tracing::{debug, trace};

impl<'p, 's> Scan<'p, 's> {
    pub(super) fn directive(&mut self, top: Scope) -> Option<()> {
        let command = self.accept(LexKind::Word)?;
        trace!(line = self.line, command, "directive");

        match command {
            "define" => self.define(top, true),
            "undef" => self.define(top, false),
            "if" => self.open_if(top),
            "else" => self.else_branch(top),
            "elif" => self.elif_branch(top),
            "endif" => self.endif(),
            "include" => self.include(top),
            "error" => self.error_directive(top),
            _ => self.command(top, command),
        }
    }

    /// `#define NAME` and `#undef NAME`
    fn define(&mut self, top: Scope, define: bool) -> Option<()> {
        if top.is_erasing() {
            self.consume_line();
            return Some(());
        }

        self.accept(LexKind::Whitespace)?;
        let name = self.accept(LexKind::Word)?;

        if define {
            debug!(name, "define");
            self.pp.defines.insert(name);
        } else {
            debug!(name, "undef");
            self.pp.defines.remove(name);
        }

        self.expect_eol();
        Some(())
    }

    /// `#if CONDITION`
    fn open_if(&mut self, top: Scope) -> Option<()> {
        if top.is_erasing() {
            // Nested in a dead branch: keep the nesting, never evaluate
            self.stack.push(Scope::dead());
            self.consume_line();
            return Some(());
        }

        self.accept(LexKind::Whitespace)?;
        let passed = self.test_condition();
        self.stack.push(Scope::branch(passed));
        debug!(depth = self.stack.len(), passed, "open scope");
        Some(())
    }

    /// `#else`
    fn else_branch(&mut self, top: Scope) -> Option<()> {
        if top.is_erasing() && top.is_deep() {
            self.consume_line();
            return Some(());
        }

        match self.stack.last().copied() {
            None => {
                self.warn(
                    DiagnosticCode::UnexpectedElse,
                    format!("Unexpected #else on line {}", self.line),
                );
                self.consume_line();
            }
            Some(scope) => {
                if scope.contains(Scope::ELSE) {
                    self.warn(
                        DiagnosticCode::UnexpectedElse,
                        format!("Unexpected #else on line {}", self.line),
                    );
                } else {
                    self.replace_top(scope.flipped_for_else());
                }
                self.expect_eol();
            }
        }
        Some(())
    }

    /// `#elif CONDITION`
    fn elif_branch(&mut self, top: Scope) -> Option<()> {
        if top.is_erasing() && top.is_deep() {
            self.consume_line();
            return Some(());
        }

        match self.stack.last().copied() {
            None => {
                self.warn(
                    DiagnosticCode::UnexpectedElif,
                    format!("Unexpected #elif on line {}", self.line),
                );
                self.consume_line();
            }
            Some(scope) if scope.contains(Scope::ELSE) => {
                self.warn(
                    DiagnosticCode::UnexpectedElif,
                    format!("Unexpected #elif on line {}", self.line),
                );
                self.consume_line();
            }
            Some(scope) if scope.contains(Scope::PASSING) => {
                // An earlier branch matched, every later sibling is dead
                self.replace_top(Scope::ERASING | Scope::ELSE_IF | Scope::DEEP);
                self.consume_line();
            }
            Some(_) => {
                self.accept(LexKind::Whitespace)?;
                let passed = self.test_condition();
                self.replace_top(Scope::branch(passed) | Scope::ELSE_IF);
            }
        }
        Some(())
    }

    /// `#endif`
    fn endif(&mut self) -> Option<()> {
        if self.stack.is_empty() {
            self.warn(
                DiagnosticCode::UnexpectedEndif,
                format!("Unexpected #endif on line {}", self.line),
            );
            self.consume_line();
        } else {
            self.expect_eol();
            self.stack.pop();
            debug!(depth = self.stack.len(), "close scope");
        }
        Some(())
    }

    /// `#include "path"`
    fn include(&mut self, top: Scope) -> Option<()> {
        if top.is_erasing() {
            self.consume_line();
            return Some(());
        }

        if self.pp.include_resolver.is_none() {
            self.warn(
                DiagnosticCode::MissingIncludeResolver,
                format!(
                    "No include resolver set up for #include on line {}",
                    self.line
                ),
            );
            self.consume_line();
            return Some(());
        }

        self.accept(LexKind::Whitespace)?;
        let literal = self.accept(LexKind::String)?;
        let path = unquote(literal);

        let included = self
            .pp
            .include_resolver
            .as_mut()
            .is_some_and(|resolve| resolve(path));
        if !included {
            self.warn(
                DiagnosticCode::IncludeFailed,
                format!("Failed to include \"{}\" on line {}", path, self.line),
            );
        }

        self.expect_eol();
        Some(())
    }

    /// `#error MESSAGE`
    fn error_directive(&mut self, top: Scope) -> Option<()> {
        let line = self.line;
        let message = self.consume_line().trim();
        if !top.is_erasing() {
            let message = if message.is_empty() {
                format!("#error on line {}", line)
            } else {
                message.to_string()
            };
            self.error_at(DiagnosticCode::ErrorDirective, message, line);
        }
        Some(())
    }

    /// Any other directive, offered to the command handler
    fn command(&mut self, top: Scope, name: &'s str) -> Option<()> {
        let line = self.line;
        let value_start = self.cursor;

        self.consume_line();
        if top.is_erasing() {
            return Some(());
        }

        let next = lexing::lex_next(self.source, value_start, self.end);
        let value = match next.kind {
            LexKind::Newline => "",
            _ => next.text(self.source),
        };

        let handled = self
            .pp
            .command_handler
            .as_mut()
            .is_some_and(|handle| handle(name, value));
        if !handled {
            self.warn_at(
                DiagnosticCode::UnrecognizedCommand,
                format!(
                    "Unrecognized preprocessor command \"{}\" on line {}",
                    name, line
                ),
                line,
            );
        }
        Some(())
    }

    /// Parse and evaluate the condition up to the end of the line.
    fn test_condition(&mut self) -> bool {
        let line = self.line;
        let mut conditions = Conditions::new();
        let mut operator = Match::empty();
        // Set between a binary operator and the atom it joins
        let mut dangling = false;

        loop {
            let mut next = self.next_lexeme();
            if dangling && next.is_line_end() {
                self.unexpected_condition_text(next, line);
            }
            if self.ends_condition(next) {
                break;
            }

            let mut must_equal = true;
            if next.kind == LexKind::Operator {
                let text = next.text(self.source);
                if text.starts_with('!') {
                    must_equal = false;
                } else if text == "&&" {
                    operator = Match::AND;
                    dangling = true;
                    continue;
                } else if text == "||" {
                    operator = Match::OR;
                    dangling = true;
                    continue;
                } else {
                    self.warn_at(
                        DiagnosticCode::UnexpectedOperator,
                        format!(
                            "Unexpected operator '{}' in condition on line {}",
                            text, line
                        ),
                        line,
                    );
                }
                next = self.next_lexeme();
            }

            dangling = false;
            if next.kind == LexKind::Word {
                let passed = self.pp.defines.contains(next.text(self.source)) == must_equal;
                conditions.push(operator, passed);
                continue;
            }

            self.unexpected_condition_text(next, line);
            conditions.push(operator, false);
            if self.ends_condition(next) {
                break;
            }
        }

        conditions.evaluate().unwrap_or_else(|| {
            self.warn_at(
                DiagnosticCode::MalformedCondition,
                format!("Malformed condition on line {}", line),
                line,
            );
            false
        })
    }

    fn unexpected_condition_text(&mut self, next: NextLexeme, line: usize) {
        let text = next.text(self.source);
        self.warn_at(
            DiagnosticCode::UnexpectedConditionText,
            format!(
                "Unexpected text '{}' of type {} in condition on line {}",
                text.escape_debug(),
                next.kind,
                line
            ),
            line,
        );
    }

    /// A line break or the end of the input ends a condition.
    fn ends_condition(&mut self, next: NextLexeme) -> bool {
        match next.kind {
            LexKind::Newline => {
                self.new_line();
                true
            }
            LexKind::None => true,
            _ => false,
        }
    }
}

/// Strip the delimiters of a string literal. An unterminated literal keeps everything after
/// the opening quote.
fn unquote(literal: &str) -> &str {
    let inner = literal.strip_prefix('"').unwrap_or(literal);
    inner.strip_suffix('"').unwrap_or(inner)
}
