use std::path::Path;

use ebnf_core::{tokenize, LineIndex};

use super::{print_json, read_source, Status};
use crate::error::CliError;
use crate::OutputFormat;

pub(crate) fn cmd_tokens(file: &Path, output: OutputFormat, quiet: bool) -> Result<Status, CliError> {
    let source = read_source(file)?;
    let tokens = tokenize(&source);

    if quiet {
        return Ok(Status::Success);
    }
    match output {
        OutputFormat::Json => print_json(&tokens)?,
        OutputFormat::Text => {
            let lines = LineIndex::new(&source);
            for token in &tokens {
                let pos = lines.line_col(&source, token.span.start);
                println!(
                    "{:<8} {:<16} {:?}",
                    pos.to_string(),
                    format!("{:?}", token.kind),
                    token.text
                );
            }
        }
    }
    Ok(Status::Success)
}
