//! S4 -- Recursion without a base case.
//!
//! Rule R has a base case when one of its top-level alternatives can
//! finish deriving without passing through R again. An alternative
//! finishes when every factor does: terminals, options and repetitions
//! always can; a group can when one of its alternatives can; a reference
//! can when it is not R and the referenced rule itself has such an
//! alternative.
//!
//! The walk keeps one visited set per top-level alternative. A name seen
//! a second time is assumed to finish, which bounds the search on mutual
//! recursion at the cost of occasionally missing a cycle. Undefined names
//! are assumed to finish. Only the first definition of a name is checked.

use ebnf_core::{Diagnostic, DiagnosticKind, Expression, Grammar, Primary, PrimaryKind};
use ebnf_core::{ReferenceIndex, Term};
use std::collections::BTreeSet;

pub fn recursion_without_base_case(
    grammar: &Grammar,
    index: &ReferenceIndex<'_>,
) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    for rule in &grammar.rules {
        let is_first_definition = index
            .definition(&rule.name)
            .is_some_and(|first| std::ptr::eq(first, rule));
        if !is_first_definition {
            continue;
        }
        let has_base_case = rule.body.alternatives.iter().any(|term| {
            let mut search = BaseCaseSearch {
                index,
                target: &rule.name,
                visited: BTreeSet::new(),
            };
            search.term(term)
        });
        if !has_base_case {
            out.push(Diagnostic::new(
                DiagnosticKind::RecursiveWithoutBaseCase,
                rule.name_span,
                format!(
                    "every alternative of rule `{}` recurses back into `{}`; it has no base case",
                    rule.name, rule.name
                ),
            ));
        }
    }
    out
}

struct BaseCaseSearch<'a, 'g> {
    index: &'a ReferenceIndex<'g>,
    target: &'a str,
    visited: BTreeSet<&'g str>,
}

impl<'g> BaseCaseSearch<'_, 'g> {
    fn expression(&mut self, expr: &'g Expression) -> bool {
        expr.alternatives.iter().any(|term| self.term(term))
    }

    fn term(&mut self, term: &'g Term) -> bool {
        term.factors.iter().all(|factor| self.primary(&factor.primary))
    }

    fn primary(&mut self, primary: &'g Primary) -> bool {
        match &primary.kind {
            PrimaryKind::Literal { .. }
            | PrimaryKind::Optional { .. }
            | PrimaryKind::Repetition { .. } => true,
            PrimaryKind::Group { inner } => self.expression(inner),
            PrimaryKind::Reference { name } => self.name(name),
        }
    }

    fn name(&mut self, name: &'g str) -> bool {
        if name == self.target {
            return false;
        }
        if !self.visited.insert(name) {
            return true;
        }
        match self.index.definition(name) {
            Some(rule) => self.expression(&rule.body),
            None => true,
        }
    }
}
