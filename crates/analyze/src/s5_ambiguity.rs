//! S5 -- Ambiguous prefixes.
//!
//! Within one alternation, terms whose first factor starts the same way
//! cannot be told apart with one token of lookahead. Every expression
//! with more than one alternative is checked, nested ones included.

use ebnf_core::visit::{self, Visitor};
use ebnf_core::{render, Diagnostic, DiagnosticKind, Expression, Grammar, PrimaryKind};
use ebnf_core::{ReferenceIndex, Term};
use std::collections::BTreeMap;

/// What a term starts with.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Prefix<'a> {
    Rule(&'a str),
    Terminal(&'a str),
    /// A bracketed construct, compared by its canonical rendering.
    Bracketed(String),
}

impl Prefix<'_> {
    fn of(term: &Term) -> Prefix<'_> {
        let primary = &term.factors[0].primary;
        match &primary.kind {
            PrimaryKind::Reference { name } => Prefix::Rule(name),
            PrimaryKind::Literal { text, .. } => Prefix::Terminal(text),
            PrimaryKind::Group { .. }
            | PrimaryKind::Optional { .. }
            | PrimaryKind::Repetition { .. } => Prefix::Bracketed(render(primary)),
        }
    }

    fn describe(&self) -> String {
        match self {
            Prefix::Rule(name) => format!("rule `{}`", name),
            Prefix::Terminal(text) => format!("terminal \"{}\"", text),
            Prefix::Bracketed(text) => format!("`{}`", text),
        }
    }
}

struct PrefixChecker {
    out: Vec<Diagnostic>,
}

impl<'ast> Visitor<'ast> for PrefixChecker {
    fn visit_expression(&mut self, expr: &'ast Expression) {
        if expr.alternatives.len() > 1 {
            check_expression(expr, &mut self.out);
        }
        visit::walk_expression(self, expr);
    }
}

fn check_expression(expr: &Expression, out: &mut Vec<Diagnostic>) {
    let mut groups: BTreeMap<Prefix<'_>, Vec<usize>> = BTreeMap::new();
    for (i, term) in expr.alternatives.iter().enumerate() {
        groups.entry(Prefix::of(term)).or_default().push(i + 1);
    }

    let mut collisions: Vec<(Prefix<'_>, Vec<usize>)> = groups
        .into_iter()
        .filter(|(_, members)| members.len() > 1)
        .collect();
    if collisions.is_empty() {
        return;
    }
    collisions.sort_by_key(|(_, members)| members[0]);

    let details: Vec<String> = collisions
        .iter()
        .map(|(prefix, members)| {
            let list: Vec<String> = members.iter().map(usize::to_string).collect();
            format!(
                "alternatives {} all start with {}",
                list.join(", "),
                prefix.describe()
            )
        })
        .collect();

    out.push(Diagnostic::new(
        DiagnosticKind::AmbiguousPrefix,
        expr.span,
        format!("ambiguous prefix: {}", details.join("; ")),
    ));
}

pub fn ambiguous_prefixes(grammar: &Grammar, _index: &ReferenceIndex<'_>) -> Vec<Diagnostic> {
    let mut checker = PrefixChecker { out: Vec::new() };
    for rule in &grammar.rules {
        checker.visit_rule(rule);
    }
    checker.out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ebnf_core::{build_index, parse_source};

    fn run(src: &str) -> Vec<Diagnostic> {
        let g = parse_source(src);
        let idx = build_index(&g);
        ambiguous_prefixes(&g, &idx)
    }

    #[test]
    fn shared_terminal_prefix() {
        let diags = run("s = \"if\", c | \"if\", c, \"else\" | x ;");
        assert_eq!(diags.len(), 1);
        assert_eq!(
            diags[0].message,
            "ambiguous prefix: alternatives 1, 2 all start with terminal \"if\""
        );
    }

    #[test]
    fn one_warning_per_expression() {
        let diags = run("s = a | a, b | \"x\" | \"x\", c ;");
        assert_eq!(diags.len(), 1);
        assert_eq!(
            diags[0].message,
            "ambiguous prefix: alternatives 1, 2 all start with rule `a`; \
             alternatives 3, 4 all start with terminal \"x\""
        );
    }

    #[test]
    fn distinct_prefixes_are_fine() {
        assert!(run("s = a | b | \"a\" ;").is_empty());
    }

    #[test]
    fn nested_expressions_are_checked() {
        let src = "s = x, ( y | y, z ) ;";
        let g = parse_source(src);
        let idx = build_index(&g);
        let diags = ambiguous_prefixes(&g, &idx);
        assert_eq!(diags.len(), 1);
        assert_eq!(g.text(diags[0].span), "y | y, z");
    }

    #[test]
    fn identical_brackets_collide() {
        assert_eq!(run("s = [ a ], b | [a], c ;").len(), 1);
        assert!(run("s = [ a ], b | { a }, c ;").is_empty());
    }

    #[test]
    fn quote_style_does_not_matter() {
        assert_eq!(run("s = 'k', a | \"k\", b ;").len(), 1);
    }
}
