//! S6 -- Redundant parentheses.
//!
//! A group holding a single factor adds nothing unless both the group's
//! own factor and the inner factor carry a count or exception; in that
//! case dropping the parentheses would not re-parse. Options and
//! repetitions are never flagged: their brackets carry meaning.

use ebnf_core::visit::{self, Visitor};
use ebnf_core::{render, Diagnostic, DiagnosticKind, Factor, Grammar, Primary, PrimaryKind};
use ebnf_core::ReferenceIndex;

/// The single factor inside `primary` when it is a group that can be
/// dropped. `outer_plain` says whether the factor holding the group has
/// neither a count nor an exception, with the group in primary position.
pub(crate) fn removable_group(primary: &Primary, outer_plain: bool) -> Option<&Factor> {
    let PrimaryKind::Group { inner } = &primary.kind else {
        return None;
    };
    let [term] = inner.alternatives.as_slice() else {
        return None;
    };
    let [factor] = term.factors.as_slice() else {
        return None;
    };
    (outer_plain || factor.is_plain()).then_some(factor)
}

struct ParenChecker {
    out: Vec<Diagnostic>,
}

impl ParenChecker {
    fn check(&mut self, primary: &Primary, outer_plain: bool) {
        if let Some(inner) = removable_group(primary, outer_plain) {
            self.out.push(Diagnostic::new(
                DiagnosticKind::RedundantParentheses,
                primary.span,
                format!("redundant parentheses around `{}`", render(inner)),
            ));
        }
    }
}

impl<'ast> Visitor<'ast> for ParenChecker {
    fn visit_factor(&mut self, factor: &'ast Factor) {
        self.check(&factor.primary, factor.is_plain());
        if let Some(exception) = &factor.exception {
            self.check(exception, false);
        }
        visit::walk_factor(self, factor);
    }
}

pub fn redundant_parentheses(grammar: &Grammar, _index: &ReferenceIndex<'_>) -> Vec<Diagnostic> {
    let mut checker = ParenChecker { out: Vec::new() };
    for rule in &grammar.rules {
        checker.visit_rule(rule);
    }
    checker.out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ebnf_core::{build_index, parse_source};

    fn flagged(src: &str) -> Vec<String> {
        let g = parse_source(src);
        assert!(g.diagnostics.is_empty(), "{:?}", g.diagnostics);
        let idx = build_index(&g);
        redundant_parentheses(&g, &idx)
            .iter()
            .map(|d| g.text(d.span).to_string())
            .collect()
    }

    #[test]
    fn single_literal_group() {
        assert_eq!(flagged("s = (\"a\") ;"), vec!["(\"a\")"]);
    }

    #[test]
    fn alternation_or_concatenation_needs_parentheses() {
        assert!(flagged("s = ( a | b ), c ;").is_empty());
        assert!(flagged("s = ( a, b ) | c ;").is_empty());
    }

    #[test]
    fn options_and_repetitions_are_never_flagged() {
        assert!(flagged("s = [ a ], { b } ;").is_empty());
    }

    #[test]
    fn nested_groups_are_each_flagged() {
        assert_eq!(flagged("s = ( ( a ) ) ;"), vec!["( ( a ) )", "( a )"]);
    }

    #[test]
    fn groups_inside_brackets() {
        assert_eq!(flagged("s = { ( a ) } ;"), vec!["( a )"]);
    }

    #[test]
    fn counted_group_around_plain_factor() {
        assert_eq!(flagged("s = 2 * ( a ) ;"), vec!["( a )"]);
    }

    #[test]
    fn needed_when_both_sides_carry_operators() {
        assert!(flagged("s = 2 * ( 3 * a ) ;").is_empty());
        assert!(flagged("s = ( a - b ) - c ;").is_empty());
        assert!(flagged("s = x - ( a - b ) ;").is_empty());
    }

    #[test]
    fn exception_group_around_plain_factor() {
        assert_eq!(flagged("s = x - ( a ) ;"), vec!["( a )"]);
    }
}
