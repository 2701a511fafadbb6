//! DSL front end: token model, lexer, AST, parser and script registry.
//!
//! The flow of a load is `source text -> Lexer -> tokens -> Parser ->
//! Program -> ScriptRegistry`. Everything here is pure and synchronous; the
//! registry is immutable once built and shared read-only across sessions.

mod ast;
mod error;
mod lexer;
mod parser;
mod registry;
mod token;

pub use ast::{Action, Program, Step, DEFAULT_REMINDER_SECS, DEFAULT_TOTAL_SILENCE_SECS};
pub use error::{DuplicateStepWarning, ScriptError};
pub use lexer::{tokenize, Lexer};
pub use parser::{parse_source, Parser};
pub use registry::{LoadedScript, ScriptRegistry};
pub use token::{Token, TokenKind, KEYWORDS};
