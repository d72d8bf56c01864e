//! Quick fixes: a diagnostic plus the grammar it came from yields a text
//! replacement for one span. The grammar is never edited in place; apply
//! the replacement to the source and reparse.

use crate::s6_parentheses::removable_group;
use crate::s7_repetition::{counted, repeated_runs};
use ebnf_core::visit::{self, Visitor};
use ebnf_core::{
    render, tokenize, Diagnostic, DiagnosticKind, Factor, Grammar, Primary, Span, Term, TokenKind,
};
use serde::Serialize;

/// Replace `span` of the source with `replacement`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fix {
    pub title: String,
    pub span: Span,
    pub replacement: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FixError {
    #[error("{kind} diagnostic at {span} does not match any node of this grammar")]
    Stale { kind: DiagnosticKind, span: Span },

    #[error("fixes at {first} and {second} overlap")]
    Overlap { first: Span, second: Span },

    #[error("fix span {span} is outside the {len}-byte source or splits a character")]
    OutOfBounds { span: Span, len: usize },

    #[error("grammar has {count} syntax error(s); no fixes are offered until they are resolved")]
    SyntaxErrors { count: usize },
}

/// The fix for `diagnostic`, if its kind has one.
///
/// A grammar with syntax errors has no fixes: the rules that failed to
/// parse are missing, so anything they reference looks unreachable.
/// Rewrites that would drop a comment inside their span are not offered.
pub fn fix_for(diagnostic: &Diagnostic, grammar: &Grammar) -> Result<Option<Fix>, FixError> {
    if grammar.has_syntax_errors() {
        return Err(FixError::SyntaxErrors {
            count: grammar.diagnostics.len(),
        });
    }
    let stale = || FixError::Stale {
        kind: diagnostic.code,
        span: diagnostic.span,
    };
    let fix = match diagnostic.code {
        DiagnosticKind::UnreachableRule => {
            let rule = grammar
                .rules
                .iter()
                .find(|r| r.name_span == diagnostic.span)
                .ok_or_else(stale)?;
            Fix {
                title: format!("Remove unreachable rule `{}`", rule.name),
                span: with_trailing_line_break(&grammar.source_text, rule.span),
                replacement: String::new(),
            }
        }
        DiagnosticKind::RedundantParentheses => {
            let inner = find_group(grammar, diagnostic.span).ok_or_else(stale)?;
            if holds_comment(grammar, diagnostic.span) {
                return Ok(None);
            }
            Fix {
                title: "Remove redundant parentheses".to_string(),
                span: diagnostic.span,
                replacement: render(inner),
            }
        }
        DiagnosticKind::SimplifiableRepetition => {
            let replacement = find_run(grammar, diagnostic.span).ok_or_else(stale)?;
            if holds_comment(grammar, diagnostic.span) {
                return Ok(None);
            }
            Fix {
                title: format!("Replace with `{}`", replacement),
                span: diagnostic.span,
                replacement,
            }
        }
        DiagnosticKind::SyntaxError
        | DiagnosticKind::UndefinedRule
        | DiagnosticKind::DuplicateRule
        | DiagnosticKind::RecursiveWithoutBaseCase
        | DiagnosticKind::AmbiguousPrefix => return Ok(None),
    };
    Ok(Some(fix))
}

/// Every available fix for `diagnostics`, dropping any that overlaps an
/// earlier one. Nested redundant groups, for instance, are fixed one
/// layer per round.
pub fn fixes_for(diagnostics: &[Diagnostic], grammar: &Grammar) -> Result<Vec<Fix>, FixError> {
    let mut fixes: Vec<Fix> = Vec::new();
    for d in diagnostics {
        if let Some(fix) = fix_for(d, grammar)? {
            if fixes.iter().all(|f| !overlaps(f.span, fix.span)) {
                fixes.push(fix);
            } else {
                log::debug!("skipping overlapping fix at {}", fix.span);
            }
        }
    }
    Ok(fixes)
}

/// Splice non-overlapping fixes into `source`.
pub fn apply_fixes(source: &str, fixes: &[Fix]) -> Result<String, FixError> {
    let mut ordered: Vec<&Fix> = fixes.iter().collect();
    ordered.sort_by_key(|f| (f.span.start, f.span.end));

    for fix in &ordered {
        let span = fix.span;
        if span.end > source.len()
            || !source.is_char_boundary(span.start)
            || !source.is_char_boundary(span.end)
        {
            return Err(FixError::OutOfBounds {
                span,
                len: source.len(),
            });
        }
    }
    for pair in ordered.windows(2) {
        if overlaps(pair[0].span, pair[1].span) {
            return Err(FixError::Overlap {
                first: pair[0].span,
                second: pair[1].span,
            });
        }
    }

    let mut out = source.to_string();
    for fix in ordered.iter().rev() {
        out.replace_range(fix.span.start..fix.span.end, &fix.replacement);
    }
    Ok(out)
}

/// Two spans overlap when they share a byte. Two insertions at the same
/// point also conflict.
fn overlaps(a: Span, b: Span) -> bool {
    (a.start < b.end && b.start < a.end) || (a == b)
}

/// Extend `span` over trailing spaces and tabs and one line break.
fn with_trailing_line_break(source: &str, span: Span) -> Span {
    let rest = &source[span.end.min(source.len())..];
    let blanks = rest.len() - rest.trim_start_matches([' ', '\t']).len();
    let after = &rest[blanks..];
    let newline = if after.starts_with("\r\n") {
        2
    } else if after.starts_with('\n') {
        1
    } else {
        0
    };
    if newline == 0 {
        span
    } else {
        Span::new(span.start, span.end + blanks + newline)
    }
}

fn holds_comment(grammar: &Grammar, span: Span) -> bool {
    let found = tokenize(grammar.text(span))
        .iter()
        .any(|t| t.kind == TokenKind::CommentStart);
    if found {
        log::debug!("no fix at {}: it would drop a comment", span);
    }
    found
}

// ── Node lookup ──────────────────────────────────────────────────────

struct GroupFinder<'g> {
    span: Span,
    found: Option<&'g Factor>,
}

impl<'g> GroupFinder<'g> {
    fn check(&mut self, primary: &'g Primary, outer_plain: bool) {
        if self.found.is_none() && primary.span == self.span {
            self.found = removable_group(primary, outer_plain);
        }
    }
}

impl<'g> Visitor<'g> for GroupFinder<'g> {
    fn visit_factor(&mut self, factor: &'g Factor) {
        self.check(&factor.primary, factor.is_plain());
        if let Some(exception) = &factor.exception {
            self.check(exception, false);
        }
        visit::walk_factor(self, factor);
    }
}

fn find_group(grammar: &Grammar, span: Span) -> Option<&Factor> {
    let mut finder = GroupFinder { span, found: None };
    for rule in grammar.rules.iter().filter(|r| r.span.contains(span)) {
        finder.visit_rule(rule);
    }
    finder.found
}

struct RunFinder {
    span: Span,
    found: Option<String>,
}

impl<'g> Visitor<'g> for RunFinder {
    fn visit_term(&mut self, term: &'g Term) {
        if self.found.is_none() && term.span.contains(self.span) {
            self.found = repeated_runs(term)
                .iter()
                .find(|run| run.span == self.span)
                .map(counted);
        }
        visit::walk_term(self, term);
    }
}

fn find_run(grammar: &Grammar, span: Span) -> Option<String> {
    let mut finder = RunFinder { span, found: None };
    for rule in grammar.rules.iter().filter(|r| r.span.contains(span)) {
        finder.visit_rule(rule);
    }
    finder.found
}
