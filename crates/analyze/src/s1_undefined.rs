//! S1 -- Undefined references.
//!
//! Every `Reference` whose name has no definition is an error at the
//! reference itself, one diagnostic per occurrence.

use ebnf_core::diagnostic::sort_diagnostics;
use ebnf_core::{Diagnostic, DiagnosticKind, Grammar, ReferenceIndex};

pub fn undefined_references(_grammar: &Grammar, index: &ReferenceIndex<'_>) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    for (name, sites) in &index.references {
        if index.is_defined(name) {
            continue;
        }
        out.extend(sites.iter().map(|site| {
            Diagnostic::new(
                DiagnosticKind::UndefinedRule,
                site.span,
                format!("undefined rule `{}`", name),
            )
        }));
    }
    sort_diagnostics(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ebnf_core::{build_index, parse_source};

    fn run(src: &str) -> Vec<Diagnostic> {
        let g = parse_source(src);
        let idx = build_index(&g);
        undefined_references(&g, &idx)
    }

    #[test]
    fn one_diagnostic_per_occurrence() {
        let src = "number = digit, { digit } ;";
        let diags = run(src);
        assert_eq!(diags.len(), 2);
        assert!(diags.iter().all(|d| d.code == DiagnosticKind::UndefinedRule));
        assert_eq!(&src[diags[0].span.start..diags[0].span.end], "digit");
        assert_eq!(diags[0].span.start, 9);
        assert_eq!(diags[1].span.start, 18);
        assert_eq!(diags[0].message, "undefined rule `digit`");
    }

    #[test]
    fn defined_names_are_fine() {
        assert!(run("a = b ; b = \"x\" ;").is_empty());
    }

    #[test]
    fn references_inside_exceptions_count() {
        let diags = run("a = \"x\" - nope ;");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].message, "undefined rule `nope`");
    }
}
