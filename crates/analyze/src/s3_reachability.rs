//! S3 -- Unreachable rules.
//!
//! BFS over the rule-reference graph from the start rule. Edges go from a
//! rule to every name its first definition's body references; undefined
//! names are dead ends. Any rule whose name is never reached is reported.

use ebnf_core::{Diagnostic, DiagnosticKind, Grammar, ReferenceIndex, Rule};
use std::collections::{BTreeSet, VecDeque};

/// The rule reachability starts from: `start` when it names a defined rule,
/// otherwise the first rule in source order.
pub fn start_rule<'g>(
    grammar: &'g Grammar,
    index: &ReferenceIndex<'g>,
    start: Option<&str>,
) -> Option<&'g Rule> {
    if let Some(name) = start {
        match index.definition(name) {
            Some(rule) => return Some(rule),
            None => log::warn!(
                "start rule `{}` is not defined; using the first rule instead",
                name
            ),
        }
    }
    grammar.start_rule()
}

/// Names reachable from `start`, the start rule's own name included.
pub fn reachable_rules<'g>(index: &ReferenceIndex<'g>, start: &'g Rule) -> BTreeSet<&'g str> {
    let mut visited = BTreeSet::new();
    let mut queue = VecDeque::new();

    visited.insert(start.name.as_str());
    queue.push_back(start);

    while let Some(rule) = queue.pop_front() {
        for name in index.dependencies_of(rule) {
            if let Some(next) = index.definition(name) {
                if visited.insert(name) {
                    queue.push_back(next);
                }
            }
        }
    }
    visited
}

pub fn unreachable_rules(grammar: &Grammar, index: &ReferenceIndex<'_>) -> Vec<Diagnostic> {
    unreachable_rules_from(grammar, index, None)
}

pub fn unreachable_rules_from(
    grammar: &Grammar,
    index: &ReferenceIndex<'_>,
    start: Option<&str>,
) -> Vec<Diagnostic> {
    let Some(start) = start_rule(grammar, index, start) else {
        return Vec::new();
    };
    let reached = reachable_rules(index, start);

    grammar
        .rules
        .iter()
        .filter(|rule| !reached.contains(rule.name.as_str()))
        .map(|rule| {
            Diagnostic::new(
                DiagnosticKind::UnreachableRule,
                rule.name_span,
                format!(
                    "rule `{}` is not reachable from start rule `{}`",
                    rule.name, start.name
                ),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ebnf_core::{build_index, parse_source};

    fn names(src: &str, start: Option<&str>) -> Vec<String> {
        let g = parse_source(src);
        let idx = build_index(&g);
        unreachable_rules_from(&g, &idx, start)
            .iter()
            .map(|d| g.text(d.span).to_string())
            .collect()
    }

    #[test]
    fn unconnected_second_rule() {
        assert_eq!(names("a = \"x\" ; b = \"y\" ;", None), vec!["b"]);
    }

    #[test]
    fn reachability_is_transitive() {
        // `c` is referenced, but only by the unreachable `b`.
        assert_eq!(
            names("a = \"x\" ; b = c ; c = \"y\" ;", None),
            vec!["b", "c"]
        );
    }

    #[test]
    fn references_in_nested_brackets_count() {
        assert!(names("a = [ { ( b ) } ] ; b = \"x\" - c ; c = \"y\" ;", None).is_empty());
    }

    #[test]
    fn cycles_terminate() {
        assert!(names("a = b ; b = a | \"x\" ;", None).is_empty());
    }

    #[test]
    fn configured_start_rule() {
        assert_eq!(names("a = b ; b = \"x\" ;", Some("b")), vec!["a"]);
    }

    #[test]
    fn undefined_start_rule_falls_back_to_first() {
        assert_eq!(names("a = \"x\" ; b = \"y\" ;", Some("zzz")), vec!["b"]);
    }

    #[test]
    fn message_names_the_start_rule() {
        let g = parse_source("top = \"x\" ; orphan = \"y\" ;");
        let idx = build_index(&g);
        let diags = unreachable_rules(&g, &idx);
        assert_eq!(
            diags[0].message,
            "rule `orphan` is not reachable from start rule `top`"
        );
    }

    #[test]
    fn empty_grammar_has_nothing_to_report() {
        assert!(names("", None).is_empty());
    }
}
