//! Directive engine
//!
//!     The [Preprocessor] runs C-preprocessor style conditional compilation over a text buffer
//!     that is already in memory. It recognises `#define`, `#undef`, `#if`, `#elif`, `#else`,
//!     `#endif`, `#include` and `#error` at the start of a line, and hands any other directive
//!     to an optional command handler.
//!
//! Output Contract
//!
//!     The buffer is rewritten in place and never changes length. Directive lines and the
//!     content of inactive branches are replaced by spaces, but their line breaks stay, so line
//!     numbers in the output match the input. Defined names are only tested for presence, they
//!     are never substituted in the text.
//!
//! Lifecycle
//!
//!     An instance keeps its symbol set and callbacks between calls. Everything else (cursor,
//!     line and column counters, the scope stack) lives in a scan value owned by a single call,
//!     so one instance can process any number of unrelated buffers in sequence. Diagnostics of
//!     the last call are available through [Preprocessor::diagnostics].
//!
//! Example
//!
//!     ```rust,ignore
//!     let mut pp = Preprocessor::with_defines("EDITOR");
//!     let out = pp.process("#if EDITOR\nshow_grid()\n#endif\n".to_string());
//!     assert_eq!(out.trim(), "show_grid()");
//!     ```

mod directives;
mod scan;

use crate::defines::Defines;
use crate::diagnostics::{Diagnostic, DiagnosticSeverity};
use crate::error::PreprocessError;
use crate::rewrite::Blanks;
use scan::Scan;
use std::fmt;

/// Character that opens a directive at column zero
pub const DIRECTIVE_MARKER: char = '#';

/// Called with the unquoted path of an `#include`. Returns whether the include succeeded.
pub type IncludeResolver = Box<dyn FnMut(&str) -> bool>;

/// Called with the name and the value of an unknown directive. Returns whether it was handled.
pub type CommandHandler = Box<dyn FnMut(&str, &str) -> bool>;

#[derive(Default)]
pub struct Preprocessor {
    defines: Defines,
    include_resolver: Option<IncludeResolver>,
    command_handler: Option<CommandHandler>,
    diagnostics: Vec<Diagnostic>,
    unclosed_scopes: usize,
}

impl Preprocessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a preprocessor with a comma-separated list of names already defined.
    pub fn with_defines(list: &str) -> Self {
        Self {
            defines: Defines::from_list(list),
            ..Self::default()
        }
    }

    pub fn add_define(&mut self, name: impl Into<String>) {
        self.defines.insert(name);
    }

    pub fn remove_define(&mut self, name: &str) {
        self.defines.remove(name);
    }

    pub fn has_define(&self, name: &str) -> bool {
        self.defines.contains(name)
    }

    /// Currently defined names, sorted
    pub fn defines(&self) -> impl Iterator<Item = &str> {
        self.defines.iter()
    }

    pub fn set_include_resolver<F>(&mut self, resolver: F)
    where
        F: FnMut(&str) -> bool + 'static,
    {
        self.include_resolver = Some(Box::new(resolver));
    }

    pub fn set_command_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&str, &str) -> bool + 'static,
    {
        self.command_handler = Some(Box::new(handler));
    }

    /// Process `buffer` and return it, same length, with directives and inactive branches
    /// blanked.
    pub fn process(&mut self, buffer: String) -> String {
        let blanks = self.scan(&buffer);
        if blanks.is_empty() {
            return buffer;
        }
        let mut bytes = buffer.into_bytes();
        blanks.apply(&mut bytes);
        // Blank ranges always cover whole characters, so the bytes stay valid UTF-8
        String::from_utf8(bytes)
            .unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned())
    }

    /// Process a caller-owned buffer without copying it. Fails only when the bytes are not
    /// UTF-8, in which case the buffer is left untouched.
    pub fn process_in_place(&mut self, buffer: &mut [u8]) -> Result<(), PreprocessError> {
        let blanks = self.scan(std::str::from_utf8(buffer)?);
        blanks.apply(buffer);
        Ok(())
    }

    /// Diagnostics recorded by the last call
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diagnostic| diagnostic.severity == DiagnosticSeverity::Error)
    }

    /// Number of `#if` scopes the last call left open
    pub fn unclosed_scopes(&self) -> usize {
        self.unclosed_scopes
    }

    fn scan(&mut self, source: &str) -> Blanks {
        self.diagnostics.clear();
        let outcome = Scan::new(self, source).run();
        self.unclosed_scopes = outcome.unclosed_scopes;
        outcome.blanks
    }
}

impl fmt::Debug for Preprocessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preprocessor")
            .field("defines", &self.defines)
            .field("include_resolver", &self.include_resolver.is_some())
            .field("command_handler", &self.command_handler.is_some())
            .field("diagnostics", &self.diagnostics.len())
            .finish()
    }
}
