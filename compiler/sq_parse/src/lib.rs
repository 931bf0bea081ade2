//! Squiggle front end: source text to lowered [`Expression`].
//!
//! ```text
//! source ──tokenize──▶ tokens ──parse──▶ Ast ──lower──▶ Expression
//!        └──────────── parse_imports ──────────▶ Vec<ImportDecl>
//! ```
//!
//! Parsing fails with a [`SyntaxError`]; lowering performs the static
//! checks that need a whole tree and fails with a [`CompileError`]. Both
//! carry resolved locations so callers never need the source text to
//! report them.

mod lexer;
mod lower;
mod parser;

use std::sync::Arc;

use sq_ir::{ast::Node, LineIndex, LocationRange};

pub use lexer::{tokenize, Token};
pub use lower::lower;
pub use parser::{parse, parse_imports};

/// A parsed module: the syntax tree plus the index that resolves its spans.
#[derive(Clone, Debug)]
pub struct Ast {
    pub root: Node,
    pub line_index: LineIndex,
}

impl Ast {
    pub fn source_id(&self) -> &Arc<str> {
        self.line_index.source()
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SyntaxErrorKind {
    #[error("Unexpected character `{0}`")]
    UnexpectedCharacter(String),
    #[error("Unterminated block comment")]
    UnterminatedComment,
    #[error("Expected {expected}, found {found}")]
    Expected { expected: String, found: String },
    #[error("Only the last statement of a program may be an expression")]
    ExpressionBeforeEnd,
    #[error("A block must end with an expression")]
    BlockWithoutResult,
    #[error("Imports must appear before any other statement")]
    LateImport,
}

/// Parse failure with the module location it happened at.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{kind}")]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub location: LocationRange,
}

/// Static check failure found while lowering a well-formed tree.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct CompileError {
    pub message: String,
    pub location: Option<LocationRange>,
}

impl CompileError {
    pub fn new(message: impl Into<String>, location: Option<LocationRange>) -> Self {
        CompileError {
            message: message.into(),
            location,
        }
    }
}
