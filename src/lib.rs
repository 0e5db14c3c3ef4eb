//! # condpp
//!
//! Conditional-compilation preprocessor for text that is already in memory.
//!
//! The crate runs `#define`, `#undef`, `#if`, `#elif`, `#else`, `#endif`, `#include` and
//! `#error` directives over a buffer in the spirit of the C preprocessor, rewriting the buffer
//! in place: directive lines and inactive branches become spaces, line breaks stay, and the
//! buffer never changes length.
//!
//! Layout
//!
//! src/
//!   ├── lexing       Stateless lexeme scanner on top of logos atoms
//!   ├── engine       The directive state machine and its public API
//!   ├── condition    `&&` / `||` / `!` evaluation
//!   ├── scope        Flags for open `#if` blocks
//!   ├── defines      The symbol set
//!   ├── rewrite      Blank ranges applied to the buffer
//!   └── diagnostics  Non-fatal problems reported by a run
//!
//! Configuration loading lives in `condpp-config`, the command-line driver in `condpp-cli`.

pub mod condition;
pub mod defines;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod lexing;
pub mod rewrite;
pub mod scope;

pub use diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSeverity};
pub use engine::{CommandHandler, IncludeResolver, Preprocessor, DIRECTIVE_MARKER};
pub use error::PreprocessError;
pub use lexing::{lex, lex_next, LexKind, Lexeme};
