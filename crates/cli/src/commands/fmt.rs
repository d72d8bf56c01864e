use std::path::Path;

use ebnf_core::{parse_source, render_grammar};

use super::{print_json, read_source, refuse_rewrite, Status};
use crate::error::CliError;
use crate::OutputFormat;

pub(crate) fn cmd_fmt(file: &Path, output: OutputFormat, quiet: bool) -> Result<Status, CliError> {
    let source = read_source(file)?;
    let grammar = parse_source(&source);

    if grammar.has_syntax_errors() {
        return Err(refuse_rewrite(file, &grammar, quiet));
    }

    let formatted = render_grammar(&grammar);
    if !quiet {
        match output {
            OutputFormat::Json => print_json(&serde_json::json!({ "formatted": formatted }))?,
            OutputFormat::Text => print!("{}", formatted),
        }
    }
    Ok(Status::Success)
}
