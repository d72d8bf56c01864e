use std::fs;
use std::path::Path;

use ebnf_analyze::{analyze, apply_fixes, fixes_for, Fix};
use ebnf_core::{build_index, parse_source, Grammar};

use super::{print_json, read_source, refuse_rewrite, Status};
use crate::error::CliError;
use crate::OutputFormat;

/// Fixes can expose further fixes (nested redundant groups); stop after
/// this many rounds.
const MAX_ROUNDS: usize = 8;

pub(crate) fn cmd_fix(
    file: &Path,
    write: bool,
    output: OutputFormat,
    quiet: bool,
) -> Result<Status, CliError> {
    let original = read_source(file)?;
    let grammar = parse_source(&original);
    if grammar.has_syntax_errors() {
        return Err(refuse_rewrite(file, &grammar, quiet));
    }
    let (fixed, applied) = fix_source(&original, grammar)?;

    if write && fixed != original {
        fs::write(file, &fixed).map_err(|source| CliError::Write {
            path: file.to_path_buf(),
            source,
        })?;
    }

    if !quiet {
        match (output, write) {
            (OutputFormat::Json, true) => print_json(&serde_json::json!({
                "applied": applied,
                "path": file.display().to_string(),
            }))?,
            (OutputFormat::Json, false) => print_json(&serde_json::json!({
                "applied": applied,
                "source": fixed,
            }))?,
            (OutputFormat::Text, true) => {
                println!("applied {} fix(es) to {}", applied, file.display())
            }
            (OutputFormat::Text, false) => print!("{}", fixed),
        }
    }
    Ok(Status::Success)
}

/// Apply fixes round by round until none remain. `grammar` is `source`
/// parsed, free of syntax errors. Returns the new text and the number of
/// fixes applied.
fn fix_source(source: &str, mut grammar: Grammar) -> Result<(String, usize), CliError> {
    let mut text = source.to_string();
    let mut applied = 0;
    for round in 1..=MAX_ROUNDS {
        let index = build_index(&grammar);
        let diagnostics = analyze(&grammar, &index);
        let fixes = fixes_for(&diagnostics, &grammar)?;
        if fixes.is_empty() {
            break;
        }
        log::debug!("fix round {}: {} fix(es)", round, fixes.len());
        let (next, reparsed) = apply_round(&text, &fixes, round)?;
        applied += fixes.len();
        text = next;
        grammar = reparsed;
    }
    Ok((text, applied))
}

/// Splice `fixes` into `text` and reparse. A result with syntax errors is
/// rejected.
fn apply_round(text: &str, fixes: &[Fix], round: usize) -> Result<(String, Grammar), CliError> {
    let next = apply_fixes(text, fixes)?;
    let grammar = parse_source(&next);
    if grammar.has_syntax_errors() {
        log::warn!("fix round {} produced unparsable text:\n{}", round, next);
        return Err(CliError::FixBrokeGrammar {
            round,
            count: grammar.diagnostics.len(),
        });
    }
    Ok((next, grammar))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ebnf_core::Span;

    fn fix_text(src: &str) -> (String, usize) {
        fix_source(src, parse_source(src)).unwrap()
    }

    #[test]
    fn nested_fixes_take_several_rounds() {
        let (text, applied) = fix_text("s = ( ( \"a\" ) ), b, b ;\nb = \"y\" ;\n");
        assert_eq!(text, "s = \"a\", 2 * b ;\nb = \"y\" ;\n");
        assert_eq!(applied, 3);
    }

    #[test]
    fn clean_source_is_untouched() {
        let src = "a = b ;\nb = \"x\" ;\n";
        assert_eq!(fix_text(src), (src.to_string(), 0));
    }

    #[test]
    fn broken_grammar_keeps_every_rule() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("g.ebnf");
        let src = "top = body ;\nbody = item item ;\nitem = \"x\" ;\n";
        fs::write(&path, src).unwrap();

        let result = cmd_fix(&path, true, OutputFormat::Text, true);
        assert!(matches!(
            result,
            Err(CliError::SyntaxErrors { count: 1, .. })
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), src);
    }

    #[test]
    fn round_that_breaks_the_grammar_is_rejected() {
        let src = "a = \"x\" ;\n";
        let fix = Fix {
            title: "drop the semicolon".to_string(),
            span: Span::new(8, 9),
            replacement: String::new(),
        };
        assert!(matches!(
            apply_round(src, &[fix], 2),
            Err(CliError::FixBrokeGrammar { round: 2, count: 1 })
        ));
    }
}
