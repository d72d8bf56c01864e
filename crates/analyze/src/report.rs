//! AnalysisReport: every diagnostic for one grammar plus summary counts.

use crate::config::PassKind;
use ebnf_core::diagnostic::sort_diagnostics;
use ebnf_core::{Diagnostic, DiagnosticKind, Severity};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// Syntax diagnostics from parsing, then pass diagnostics, sorted by
    /// position.
    pub diagnostics: Vec<Diagnostic>,
    /// Passes that ran, in execution order.
    pub passes_run: Vec<PassKind>,
    pub error_count: usize,
    pub warning_count: usize,
}

impl AnalysisReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    /// Sort diagnostics and recompute the counts.
    pub fn finish(&mut self) {
        sort_diagnostics(&mut self.diagnostics);
        self.error_count = self
            .diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count();
        self.warning_count = self.diagnostics.len() - self.error_count;
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.code == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ebnf_core::Span;

    #[test]
    fn finish_sorts_and_counts() {
        let mut report = AnalysisReport::new();
        report.extend([
            Diagnostic::new(DiagnosticKind::UnreachableRule, Span::new(10, 11), "b"),
            Diagnostic::new(DiagnosticKind::UndefinedRule, Span::new(4, 5), "x"),
            Diagnostic::new(DiagnosticKind::AmbiguousPrefix, Span::new(4, 9), "p"),
        ]);
        report.finish();

        assert_eq!(report.error_count, 1);
        assert_eq!(report.warning_count, 2);
        assert!(report.has_errors());
        let starts: Vec<usize> = report.diagnostics.iter().map(|d| d.span.start).collect();
        assert_eq!(starts, vec![4, 4, 10]);
        assert_eq!(report.of_kind(DiagnosticKind::UndefinedRule).count(), 1);
    }

    #[test]
    fn empty_report_has_no_errors() {
        let mut report = AnalysisReport::new();
        report.finish();
        assert!(!report.has_errors());
        assert_eq!(report.warning_count, 0);
    }
}
