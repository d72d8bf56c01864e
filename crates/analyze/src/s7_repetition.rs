//! S7 -- Simplifiable repetition.
//!
//! Inside one concatenation, a maximal run of two or more identical
//! adjacent factors (same canonical rendering) can be written once with a
//! count. One warning per run, spanning the whole run.

use ebnf_core::visit::{self, Visitor};
use ebnf_core::{render, Diagnostic, DiagnosticKind, Factor, Grammar, ReferenceIndex, Span, Term};

/// A run of identical adjacent factors within one term.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Run<'a> {
    pub factor: &'a Factor,
    pub len: usize,
    pub span: Span,
}

/// Every maximal run of length two or more in `term`, left to right.
pub(crate) fn repeated_runs(term: &Term) -> Vec<Run<'_>> {
    let rendered: Vec<String> = term.factors.iter().map(render).collect();
    let mut runs = Vec::new();
    let mut start = 0;
    while start < term.factors.len() {
        let mut end = start + 1;
        while end < term.factors.len() && rendered[end] == rendered[start] {
            end += 1;
        }
        if end - start >= 2 {
            runs.push(Run {
                factor: &term.factors[start],
                len: end - start,
                span: term.factors[start].span.join(term.factors[end - 1].span),
            });
        }
        start = end;
    }
    runs
}

/// `N * factor`, bracketing the factor when it has its own count or
/// exception.
pub(crate) fn counted(run: &Run<'_>) -> String {
    if run.factor.is_plain() {
        format!("{} * {}", run.len, render(run.factor))
    } else {
        format!("{} * ( {} )", run.len, render(run.factor))
    }
}

struct RunChecker {
    out: Vec<Diagnostic>,
}

impl<'ast> Visitor<'ast> for RunChecker {
    fn visit_term(&mut self, term: &'ast Term) {
        for run in repeated_runs(term) {
            self.out.push(Diagnostic::new(
                DiagnosticKind::SimplifiableRepetition,
                run.span,
                format!(
                    "`{}` is repeated {} times; write it once as `{}`",
                    render(run.factor),
                    run.len,
                    counted(&run)
                ),
            ));
        }
        visit::walk_term(self, term);
    }
}

pub fn simplifiable_repetitions(grammar: &Grammar, _index: &ReferenceIndex<'_>) -> Vec<Diagnostic> {
    let mut checker = RunChecker { out: Vec::new() };
    for rule in &grammar.rules {
        checker.visit_rule(rule);
    }
    checker.out
}
