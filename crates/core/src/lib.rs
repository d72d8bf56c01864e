//! ebnf-core: the EBNF grammar engine.
//!
//! Text flows strictly forward through the pipeline:
//!
//! source text -> [`tokenize`] -> tokens -> [`parse`] -> [`Grammar`]
//! -> [`build_index`] -> [`ReferenceIndex`]
//!
//! Every stage is a pure function. Malformed input never produces an
//! `Err`; it produces [`Diagnostic`]s alongside a best-effort grammar.
//! Semantic checks over the grammar live in the `ebnf-analyze` crate.
//!
//! # Public API
//!
//! - [`tokenize()`] -- total lexer
//! - [`parse()`] / [`parse_source()`] -- recursive-descent parser with
//!   per-rule error recovery
//! - [`build_index()`] -- name -> definition and name -> uses
//! - [`render()`] / [`render_grammar()`] -- canonical EBNF printing
//! - AST types: [`Grammar`], [`Rule`], [`Expression`], [`Term`],
//!   [`Factor`], [`Primary`], [`PrimaryKind`]

pub mod ast;
pub mod diagnostic;
pub mod index;
pub mod lexer;
pub mod parser;
pub mod render;
pub mod source;
pub mod visit;

// ── Convenience re-exports: key types ────────────────────────────────

pub use ast::{Expression, Factor, Grammar, NameUse, Primary, PrimaryKind, Rule, Term};
pub use diagnostic::{Diagnostic, DiagnosticKind, Severity};
pub use index::{Duplicate, ReferenceIndex, ReferenceSite};
pub use lexer::{Token, TokenKind};
pub use source::{LineCol, LineIndex, Span};

// ── Convenience re-exports: pipeline entry points ────────────────────

pub use index::build_index;
pub use lexer::tokenize;
pub use parser::{parse, parse_source};
pub use render::{render, render_grammar};
