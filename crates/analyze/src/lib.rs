//! ebnf-analyze: semantic checks over a parsed EBNF grammar.
//!
//! Each pass is a separate module with one entry point taking the grammar
//! and its reference index and returning diagnostics. Passes are
//! independent: running a subset yields a subset of the full result.
//! [`analyze`] runs all of them; [`analyze_with`] runs a configured
//! selection and folds in the grammar's syntax diagnostics.

pub mod config;
pub mod fixes;
pub mod report;
pub mod s1_undefined;
pub mod s2_duplicates;
pub mod s3_reachability;
pub mod s4_recursion;
pub mod s5_ambiguity;
pub mod s6_parentheses;
pub mod s7_repetition;

pub use config::{AnalysisConfig, ConfigError, PassKind};
pub use fixes::{apply_fixes, fix_for, fixes_for, Fix, FixError};
pub use report::AnalysisReport;
pub use s1_undefined::undefined_references;
pub use s2_duplicates::duplicate_rules;
pub use s3_reachability::{unreachable_rules, unreachable_rules_from};
pub use s4_recursion::recursion_without_base_case;
pub use s5_ambiguity::ambiguous_prefixes;
pub use s6_parentheses::redundant_parentheses;
pub use s7_repetition::simplifiable_repetitions;

use ebnf_core::diagnostic::sort_diagnostics;
use ebnf_core::{Diagnostic, Grammar, ReferenceIndex};

/// Run every pass. Syntax diagnostics stay on the grammar and are not
/// repeated here.
pub fn analyze(grammar: &Grammar, index: &ReferenceIndex<'_>) -> Vec<Diagnostic> {
    debug_assert!(
        index.belongs_to(grammar),
        "reference index was built from a different grammar"
    );
    let config = AnalysisConfig::default();
    let mut out: Vec<Diagnostic> = PassKind::ALL
        .into_iter()
        .flat_map(|pass| run_pass(pass, grammar, index, &config))
        .collect();
    sort_diagnostics(&mut out);
    out
}

/// Run the passes selected by `config`, in [`PassKind`] order.
///
/// The report carries the grammar's syntax diagnostics too, so it is the
/// complete picture for one source text.
pub fn analyze_with(
    grammar: &Grammar,
    index: &ReferenceIndex<'_>,
    config: &AnalysisConfig,
) -> AnalysisReport {
    debug_assert!(
        index.belongs_to(grammar),
        "reference index was built from a different grammar"
    );
    let mut report = AnalysisReport::new();
    report.extend(grammar.diagnostics.iter().cloned());

    for &pass in &config.passes {
        let found = run_pass(pass, grammar, index, config);
        log::debug!("pass {} produced {} diagnostic(s)", pass, found.len());
        report.extend(found);
        report.passes_run.push(pass);
    }

    report.finish();
    report
}

/// Run a single pass.
pub fn run_pass(
    pass: PassKind,
    grammar: &Grammar,
    index: &ReferenceIndex<'_>,
    config: &AnalysisConfig,
) -> Vec<Diagnostic> {
    match pass {
        PassKind::UndefinedRule => undefined_references(grammar, index),
        PassKind::DuplicateRule => duplicate_rules(grammar, index),
        PassKind::UnreachableRule => {
            unreachable_rules_from(grammar, index, config.start_rule.as_deref())
        }
        PassKind::Recursion => recursion_without_base_case(grammar, index),
        PassKind::AmbiguousPrefix => ambiguous_prefixes(grammar, index),
        PassKind::RedundantParentheses => redundant_parentheses(grammar, index),
        PassKind::SimplifiableRepetition => simplifiable_repetitions(grammar, index),
    }
}
