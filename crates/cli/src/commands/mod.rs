mod check;
mod fix;
mod fmt;
mod parse;
mod tokens;

pub(crate) use check::cmd_check;
pub(crate) use fix::cmd_fix;
pub(crate) use fmt::cmd_fmt;
pub(crate) use parse::cmd_parse;
pub(crate) use tokens::cmd_tokens;

use std::fs;
use std::path::Path;

use ebnf_core::{Diagnostic, Grammar};
use serde::Serialize;

use crate::error::CliError;

/// How a command finished when it did not hit an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Status {
    Success,
    /// The command ran but found problems; exit code 1.
    Failure,
}

pub(crate) fn read_source(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// `file:line:col: severity[kind]: message`
pub(crate) fn format_diagnostic(file: &Path, grammar: &Grammar, d: &Diagnostic) -> String {
    let pos = grammar.line_col(d.span.start);
    format!(
        "{}:{}:{}: {}[{}]: {}",
        file.display(),
        pos.line,
        pos.column,
        d.severity,
        d.code,
        d.message
    )
}

/// Print the syntax diagnostics of `grammar` to stderr and build the error
/// for a command that will not rewrite a file it cannot fully parse.
pub(crate) fn refuse_rewrite(file: &Path, grammar: &Grammar, quiet: bool) -> CliError {
    if !quiet {
        for d in &grammar.diagnostics {
            eprintln!("{}", format_diagnostic(file, grammar, d));
        }
    }
    CliError::SyntaxErrors {
        path: file.to_path_buf(),
        count: grammar.diagnostics.len(),
    }
}
