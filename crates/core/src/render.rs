//! Canonical pretty-printing of AST nodes back to EBNF source.
//!
//! The output re-parses to the same tree (spans aside), which is what lets
//! callers build a fix as "render a new fragment, splice it in, reparse".
//! Two nodes render identically exactly when they are structurally equal.

use crate::ast::{Expression, Factor, Grammar, Primary, PrimaryKind, Rule, Term};
use std::fmt;

/// Render any node (anything `Display` in this module) to EBNF text.
pub fn render<N: fmt::Display + ?Sized>(node: &N) -> String {
    node.to_string()
}

/// Every rule on its own line.
pub fn render_grammar(grammar: &Grammar) -> String {
    let mut out = String::new();
    for rule in &grammar.rules {
        if let Some(comment) = grammar.leading_comment(rule) {
            out.push_str("(* ");
            out.push_str(comment);
            out.push_str(" *)\n");
        }
        out.push_str(&rule.to_string());
        out.push('\n');
    }
    out
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {} ;", self.name, self.body)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.alternatives.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{}", term)?;
        }
        Ok(())
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, factor) in self.factors.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", factor)?;
        }
        Ok(())
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(count) = self.count {
            write!(f, "{} * ", count)?;
        }
        write!(f, "{}", self.primary)?;
        if let Some(exception) = &self.exception {
            write!(f, " - {}", exception)?;
        }
        Ok(())
    }
}

impl fmt::Display for Primary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            PrimaryKind::Reference { name } => f.write_str(name),
            PrimaryKind::Literal { text, quote } => write!(f, "{q}{}{q}", text, q = quote),
            PrimaryKind::Group { inner } => write!(f, "( {} )", inner),
            PrimaryKind::Optional { inner } => write!(f, "[ {} ]", inner),
            PrimaryKind::Repetition { inner } => write!(f, "{{ {} }}", inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;

    fn roundtrip(src: &str) -> String {
        let g = parse_source(src);
        assert!(g.diagnostics.is_empty(), "{:?}", g.diagnostics);
        render(&g.rules[0])
    }

    #[test]
    fn canonical_spacing() {
        assert_eq!(
            roundtrip("number=digit,{digit};"),
            "number = digit, { digit } ;"
        );
    }

    #[test]
    fn all_primary_forms() {
        assert_eq!(
            roundtrip("a = ( b | 'c' ), [ d ], { e }, 2 * f, g - \"h\" ;"),
            "a = ( b | 'c' ), [ d ], { e }, 2 * f, g - \"h\" ;"
        );
    }

    #[test]
    fn escapes_are_preserved() {
        assert_eq!(roundtrip(r#"q = "\"" ;"#), r#"q = "\"" ;"#);
    }

    #[test]
    fn render_body_only() {
        let g = parse_source("digit = \"0\" | \"1\" ;");
        assert_eq!(render(&g.rules[0].body), "\"0\" | \"1\"");
    }

    #[test]
    fn grammar_keeps_leading_comments() {
        let g = parse_source("(* start *)\na = b ;\nb = \"x\" ;\n");
        assert_eq!(render_grammar(&g), "(* start *)\na = b ;\nb = \"x\" ;\n");
    }
}
