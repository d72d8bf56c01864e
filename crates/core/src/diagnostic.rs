//! Diagnostics: structured reports of syntactic and semantic problems.
//!
//! Diagnostics are plain data. Nothing in the engine acts on them; callers
//! print them, map them to editor markers, or ask for a fix.

use crate::source::Span;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DiagnosticKind {
    SyntaxError,
    UndefinedRule,
    DuplicateRule,
    UnreachableRule,
    RecursiveWithoutBaseCase,
    AmbiguousPrefix,
    RedundantParentheses,
    SimplifiableRepetition,
}

impl DiagnosticKind {
    /// Stable kebab-case code, used in text output.
    pub fn code(self) -> &'static str {
        match self {
            DiagnosticKind::SyntaxError => "syntax-error",
            DiagnosticKind::UndefinedRule => "undefined-rule",
            DiagnosticKind::DuplicateRule => "duplicate-rule",
            DiagnosticKind::UnreachableRule => "unreachable-rule",
            DiagnosticKind::RecursiveWithoutBaseCase => "recursive-without-base-case",
            DiagnosticKind::AmbiguousPrefix => "ambiguous-prefix",
            DiagnosticKind::RedundantParentheses => "redundant-parentheses",
            DiagnosticKind::SimplifiableRepetition => "simplifiable-repetition",
        }
    }

    /// Syntax errors and broken references are errors; everything else is
    /// advisory.
    pub fn severity(self) -> Severity {
        match self {
            DiagnosticKind::SyntaxError
            | DiagnosticKind::UndefinedRule
            | DiagnosticKind::DuplicateRule => Severity::Error,
            DiagnosticKind::UnreachableRule
            | DiagnosticKind::RecursiveWithoutBaseCase
            | DiagnosticKind::AmbiguousPrefix
            | DiagnosticKind::RedundantParentheses
            | DiagnosticKind::SimplifiableRepetition => Severity::Warning,
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub span: Span,
    pub code: DiagnosticKind,
}

impl Diagnostic {
    /// A diagnostic with the kind's default severity.
    pub fn new(code: DiagnosticKind, span: Span, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: code.severity(),
            message: message.into(),
            span,
            code,
        }
    }

    pub fn syntax(span: Span, message: impl Into<String>) -> Self {
        Diagnostic::new(DiagnosticKind::SyntaxError, span, message)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] at {}: {}",
            self.severity, self.code, self.span, self.message
        )
    }
}

/// Order diagnostics by position, then kind. Stable, so equal keys keep
/// their production order.
pub fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by_key(|d| (d.span.start, d.span.end, d.code));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_severities() {
        assert_eq!(DiagnosticKind::SyntaxError.severity(), Severity::Error);
        assert_eq!(DiagnosticKind::DuplicateRule.severity(), Severity::Error);
        assert_eq!(
            DiagnosticKind::UnreachableRule.severity(),
            Severity::Warning
        );
        assert_eq!(
            DiagnosticKind::SimplifiableRepetition.severity(),
            Severity::Warning
        );
    }

    #[test]
    fn display_includes_code_and_span() {
        let d = Diagnostic::syntax(Span::new(3, 4), "expected `;`, found `)`");
        assert_eq!(
            d.to_string(),
            "error[syntax-error] at 3..4: expected `;`, found `)`"
        );
    }

    #[test]
    fn sort_is_by_position() {
        let mut ds = vec![
            Diagnostic::new(DiagnosticKind::UnreachableRule, Span::new(10, 11), "b"),
            Diagnostic::new(DiagnosticKind::UndefinedRule, Span::new(2, 3), "a"),
        ];
        sort_diagnostics(&mut ds);
        assert_eq!(ds[0].message, "a");
    }
}
