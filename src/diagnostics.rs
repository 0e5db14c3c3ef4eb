//! Diagnostics reported while preprocessing
//!
//! Malformed input never stops the engine. Each problem becomes a [Diagnostic], the scan moves
//! on (usually discarding the rest of the offending line), and the caller reads the collected
//! list after the call. Every diagnostic is also emitted as a `tracing` event when recorded.

use serde::Serialize;
use std::fmt;

/// Diagnostic severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticSeverity::Error => write!(f, "error"),
            DiagnosticSeverity::Warning => write!(f, "warning"),
        }
    }
}

/// What went wrong, stable across message wording changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticCode {
    /// A directive token did not have the expected lexeme type
    UnexpectedToken,
    /// `#else` with no open scope, or after another `#else`
    UnexpectedElse,
    /// `#elif` with no open scope, or after `#else`
    UnexpectedElif,
    /// `#endif` with no open scope
    UnexpectedEndif,
    /// An operator other than `!`, `&&` or `||` in a condition
    UnexpectedOperator,
    /// A condition atom that is not a word
    UnexpectedConditionText,
    /// A condition that does not reduce to a single result
    MalformedCondition,
    /// `#include` without a resolver
    MissingIncludeResolver,
    /// The include resolver reported a failure
    IncludeFailed,
    /// A directive nobody handled
    UnrecognizedCommand,
    /// An `#error` directive
    ErrorDirective,
    /// Scopes still open at the end of the input
    UnclosedScope,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::UnexpectedToken => "unexpected-token",
            DiagnosticCode::UnexpectedElse => "unexpected-else",
            DiagnosticCode::UnexpectedElif => "unexpected-elif",
            DiagnosticCode::UnexpectedEndif => "unexpected-endif",
            DiagnosticCode::UnexpectedOperator => "unexpected-operator",
            DiagnosticCode::UnexpectedConditionText => "unexpected-condition-text",
            DiagnosticCode::MalformedCondition => "malformed-condition",
            DiagnosticCode::MissingIncludeResolver => "missing-include-resolver",
            DiagnosticCode::IncludeFailed => "include-failed",
            DiagnosticCode::UnrecognizedCommand => "unrecognized-command",
            DiagnosticCode::ErrorDirective => "error-directive",
            DiagnosticCode::UnclosedScope => "unclosed-scope",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reported problem, located by line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub code: DiagnosticCode,
    pub message: String,
    /// 1-based line the engine was on when the problem was found
    pub line: usize,
    pub source: String,
}

impl Diagnostic {
    pub fn new(
        severity: DiagnosticSeverity,
        code: DiagnosticCode,
        message: String,
        line: usize,
    ) -> Self {
        Self {
            severity,
            code,
            message,
            line,
            source: "condpp".to_string(),
        }
    }

    pub fn warning(code: DiagnosticCode, message: String, line: usize) -> Self {
        Self::new(DiagnosticSeverity::Warning, code, message, line)
    }

    pub fn error(code: DiagnosticCode, message: String, line: usize) -> Self {
        Self::new(DiagnosticSeverity::Error, code, message, line)
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}]: {} ({}:{})",
            self.severity, self.code, self.message, self.source, self.line
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let diagnostic = Diagnostic::warning(
            DiagnosticCode::UnexpectedEndif,
            "Unexpected #endif on line 3".to_string(),
            3,
        )
        .with_source("shader.glsl");
        insta::assert_snapshot!(
            diagnostic.to_string(),
            @"warning [unexpected-endif]: Unexpected #endif on line 3 (shader.glsl:3)"
        );
    }

    #[test]
    fn test_serializes_codes_in_kebab_case() {
        let diagnostic = Diagnostic::error(
            DiagnosticCode::ErrorDirective,
            "unsupported".to_string(),
            1,
        );
        let json = serde_json::to_value(&diagnostic).expect("diagnostic serializes");
        assert_eq!(json["severity"], "error");
        assert_eq!(json["code"], "error-directive");
        assert_eq!(json["line"], 1);
    }
}
