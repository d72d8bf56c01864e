//! Grammar AST.
//!
//! The tree mirrors the EBNF production hierarchy: a [`Grammar`] holds
//! [`Rule`]s; a rule body is an [`Expression`] (alternation) of
//! [`Term`]s (concatenation) of [`Factor`]s, each wrapping a [`Primary`].
//! Nodes own their children; rules refer to each other only by name.
//! Every node keeps the byte span of the source it was parsed from.

use crate::diagnostic::Diagnostic;
use crate::source::{LineCol, LineIndex, Span};
use crate::visit::{self, Visitor};
use serde::Serialize;
use std::collections::BTreeMap;

// ──────────────────────────────────────────────
// Nodes
// ──────────────────────────────────────────────

/// `name = body ;`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    pub name: String,
    pub name_span: Span,
    pub body: Expression,
    /// From the name through the terminating `;`.
    pub span: Span,
}

/// Alternatives separated by `|`. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expression {
    pub alternatives: Vec<Term>,
    pub span: Span,
}

/// Factors separated by `,`. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Term {
    pub factors: Vec<Factor>,
    pub span: Span,
}

/// `[count *] primary [- exception]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Factor {
    /// Exact repetition count, as in `3 * "a"`.
    pub count: Option<u32>,
    pub primary: Primary,
    pub exception: Option<Primary>,
    pub span: Span,
}

impl Factor {
    /// A factor with neither a count nor an exception.
    pub fn is_plain(&self) -> bool {
        self.count.is_none() && self.exception.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Primary {
    pub kind: PrimaryKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PrimaryKind {
    /// A rule name.
    Reference { name: String },
    /// A quoted terminal. `text` excludes the quotes and keeps escapes as
    /// written.
    Literal { text: String, quote: char },
    /// `( ... )`
    Group { inner: Expression },
    /// `[ ... ]`
    Optional { inner: Expression },
    /// `{ ... }`
    Repetition { inner: Expression },
}

impl Primary {
    pub fn reference_name(&self) -> Option<&str> {
        match &self.kind {
            PrimaryKind::Reference { name } => Some(name),
            _ => None,
        }
    }

    /// The bracketed expression of a group, option or repetition.
    pub fn inner(&self) -> Option<&Expression> {
        match &self.kind {
            PrimaryKind::Group { inner }
            | PrimaryKind::Optional { inner }
            | PrimaryKind::Repetition { inner } => Some(inner),
            PrimaryKind::Reference { .. } | PrimaryKind::Literal { .. } => None,
        }
    }
}

// ──────────────────────────────────────────────
// Reference collection
// ──────────────────────────────────────────────

/// A rule name used inside some expression, with its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameUse<'a> {
    pub name: &'a str,
    pub span: Span,
}

struct NameCollector<'a> {
    uses: Vec<NameUse<'a>>,
}

impl<'a> Visitor<'a> for NameCollector<'a> {
    fn visit_primary(&mut self, primary: &'a Primary) {
        if let PrimaryKind::Reference { name } = &primary.kind {
            self.uses.push(NameUse {
                name,
                span: primary.span,
            });
        }
        visit::walk_primary(self, primary);
    }
}

impl Expression {
    /// Every rule reference in this expression, in source order.
    pub fn references(&self) -> Vec<NameUse<'_>> {
        let mut collector = NameCollector { uses: Vec::new() };
        collector.visit_expression(self);
        collector.uses
    }
}

impl Term {
    pub fn references(&self) -> Vec<NameUse<'_>> {
        let mut collector = NameCollector { uses: Vec::new() };
        collector.visit_term(self);
        collector.uses
    }
}

// ──────────────────────────────────────────────
// Grammar
// ──────────────────────────────────────────────

/// The result of one parse: rules in source order, the text they came
/// from, and syntax diagnostics. Immutable; edit the text and reparse.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grammar {
    pub rules: Vec<Rule>,
    pub source_text: String,
    pub diagnostics: Vec<Diagnostic>,
    /// Comment text immediately preceding a rule, keyed by rule start.
    comments: BTreeMap<usize, String>,
    #[serde(skip)]
    lines: LineIndex,
}

impl Grammar {
    pub(crate) fn new(
        rules: Vec<Rule>,
        source_text: String,
        diagnostics: Vec<Diagnostic>,
        comments: BTreeMap<usize, String>,
    ) -> Self {
        let lines = LineIndex::new(&source_text);
        Grammar {
            rules,
            source_text,
            diagnostics,
            comments,
            lines,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The first rule in source order, if any.
    pub fn start_rule(&self) -> Option<&Rule> {
        self.rules.first()
    }

    /// First definition of `name`.
    pub fn rule_named(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.name == name)
    }

    /// Rule names in source order, duplicates included.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name.as_str()).collect()
    }

    /// The comment directly above `rule`, without its delimiters.
    pub fn leading_comment(&self, rule: &Rule) -> Option<&str> {
        self.comments.get(&rule.span.start).map(String::as_str)
    }

    pub fn has_syntax_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn line_col(&self, offset: usize) -> LineCol {
        self.lines.line_col(&self.source_text, offset)
    }

    /// Source text under `span`.
    pub fn text(&self, span: Span) -> &str {
        span.slice(&self.source_text)
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::parse_source;

    #[test]
    fn references_in_source_order() {
        let g = parse_source("a = b, [c | { d }], (b - e) ;");
        let names: Vec<&str> = g.rules[0]
            .body
            .references()
            .iter()
            .map(|u| u.name)
            .collect();
        assert_eq!(names, vec!["b", "c", "d", "b", "e"]);
    }

    #[test]
    fn rule_queries() {
        let g = parse_source("a = b ; b = \"x\" ; a = \"y\" ;");
        assert_eq!(g.rule_names(), vec!["a", "b", "a"]);
        let a = g.rule_named("a").expect("a defined");
        assert_eq!(a.span.start, 0);
        assert!(g.rule_named("zzz").is_none());
        assert_eq!(g.start_rule().map(|r| r.name.as_str()), Some("a"));
    }

    #[test]
    fn text_of_span() {
        let g = parse_source("digit = \"0\" | \"1\" ;");
        assert_eq!(g.text(g.rules[0].name_span), "digit");
        assert_eq!(g.text(g.rules[0].body.span), "\"0\" | \"1\"");
    }

    #[test]
    fn factor_plainness() {
        let g = parse_source("a = x, 2 * y, z - w ;");
        let factors = &g.rules[0].body.alternatives[0].factors;
        assert!(factors[0].is_plain());
        assert!(!factors[1].is_plain());
        assert!(!factors[2].is_plain());
    }
}
