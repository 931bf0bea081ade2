//! Squiggle IR - syntax and expression types shared by every stage.
//!
//! This crate contains the data structures that flow between the parser,
//! the lowering pass and the reducer:
//! - [`Span`] byte ranges and [`LocationRange`] line/column locations
//! - the surface AST produced by the parser ([`ast`])
//! - the lowered [`Expression`] tree consumed by the reducer
//! - [`ImportDecl`] entries found by the static import scan
//!
//! The AST keeps compact byte spans; lowering resolves them once into
//! [`LocationRange`]s tagged with the module id so that stack traces and
//! diagnostics never need the source text again.

pub mod ast;
mod expression;
mod import;
mod span;

pub use expression::{Expression, ExpressionKind, Literal};
pub use import::ImportDecl;
pub use span::{LineIndex, LocationRange, Position, Span};
