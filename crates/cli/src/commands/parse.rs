use std::path::Path;

use ebnf_core::visit::{self, Visitor};
use ebnf_core::{parse_source, Expression, Factor, Grammar, Primary, PrimaryKind, Rule, Term};

use super::{format_diagnostic, print_json, read_source, Status};
use crate::error::CliError;
use crate::OutputFormat;

pub(crate) fn cmd_parse(file: &Path, output: OutputFormat, quiet: bool) -> Result<Status, CliError> {
    let source = read_source(file)?;
    let grammar = parse_source(&source);

    if !quiet {
        match output {
            OutputFormat::Json => print_json(&grammar)?,
            OutputFormat::Text => {
                print!("{}", outline(&grammar));
                for d in &grammar.diagnostics {
                    eprintln!("{}", format_diagnostic(file, &grammar, d));
                }
            }
        }
    }

    Ok(if grammar.has_syntax_errors() {
        Status::Failure
    } else {
        Status::Success
    })
}

/// An indented tree, one node per line. Single-alternative expressions
/// and single-factor terms are elided.
fn outline(grammar: &Grammar) -> String {
    let mut printer = Outline {
        grammar,
        depth: 0,
        out: String::new(),
    };
    for rule in &grammar.rules {
        printer.visit_rule(rule);
    }
    printer.out
}

struct Outline<'g> {
    grammar: &'g Grammar,
    depth: usize,
    out: String,
}

impl Outline<'_> {
    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn nested(&mut self, f: impl FnOnce(&mut Self)) {
        self.depth += 1;
        f(self);
        self.depth -= 1;
    }
}

impl<'ast> Visitor<'ast> for Outline<'_> {
    fn visit_rule(&mut self, rule: &'ast Rule) {
        let pos = self.grammar.line_col(rule.span.start);
        self.line(&format!("rule {} @ {}", rule.name, pos));
        self.nested(|p| visit::walk_rule(p, rule));
    }

    fn visit_expression(&mut self, expr: &'ast Expression) {
        if expr.alternatives.len() > 1 {
            self.line("alternatives");
            self.nested(|p| visit::walk_expression(p, expr));
        } else {
            visit::walk_expression(self, expr);
        }
    }

    fn visit_term(&mut self, term: &'ast Term) {
        if term.factors.len() > 1 {
            self.line("sequence");
            self.nested(|p| visit::walk_term(p, term));
        } else {
            visit::walk_term(self, term);
        }
    }

    fn visit_factor(&mut self, factor: &'ast Factor) {
        if let Some(count) = factor.count {
            self.line(&format!("{} times", count));
            self.nested(|p| p.visit_primary(&factor.primary));
        } else {
            self.visit_primary(&factor.primary);
        }
        if let Some(exception) = &factor.exception {
            self.line("except");
            self.nested(|p| p.visit_primary(exception));
        }
    }

    fn visit_primary(&mut self, primary: &'ast Primary) {
        let label = match &primary.kind {
            PrimaryKind::Reference { name } => format!("ref {}", name),
            PrimaryKind::Literal { text, quote } => format!("literal {q}{}{q}", text, q = quote),
            PrimaryKind::Group { .. } => "group".to_string(),
            PrimaryKind::Optional { .. } => "optional".to_string(),
            PrimaryKind::Repetition { .. } => "repetition".to_string(),
        };
        self.line(&label);
        self.nested(|p| visit::walk_primary(p, primary));
    }
}
