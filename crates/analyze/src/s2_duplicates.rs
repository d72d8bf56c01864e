//! S2 -- Duplicate definitions.
//!
//! The index keeps the first definition of each name and lists the rest.
//! Each later definition is an error at its name.

use ebnf_core::{Diagnostic, DiagnosticKind, Grammar, ReferenceIndex};

pub fn duplicate_rules(grammar: &Grammar, index: &ReferenceIndex<'_>) -> Vec<Diagnostic> {
    index
        .duplicates
        .iter()
        .map(|dup| {
            let first = grammar.line_col(dup.first.name_span.start);
            Diagnostic::new(
                DiagnosticKind::DuplicateRule,
                dup.duplicate.name_span,
                format!(
                    "rule `{}` is already defined at line {}, column {}",
                    dup.name, first.line, first.column
                ),
            )
        })
        .collect()
}
