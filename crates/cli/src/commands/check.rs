use std::fs;
use std::path::{Path, PathBuf};

use ebnf_analyze::{analyze_with, AnalysisConfig, PassKind};
use ebnf_core::{build_index, parse_source};

use super::{format_diagnostic, print_json, read_source, Status};
use crate::error::CliError;
use crate::OutputFormat;

const CONFIG_FILE: &str = "ebnf.toml";

pub(crate) fn cmd_check(
    file: &Path,
    passes: Option<&str>,
    config: Option<&Path>,
    output: OutputFormat,
    quiet: bool,
) -> Result<Status, CliError> {
    let mut config = load_config(file, config)?;
    if let Some(list) = passes {
        config.passes = PassKind::parse_list(list)?;
    }

    let source = read_source(file)?;
    let grammar = parse_source(&source);
    let index = build_index(&grammar);
    let report = analyze_with(&grammar, &index, &config);

    if !quiet {
        match output {
            OutputFormat::Json => print_json(&report)?,
            OutputFormat::Text => {
                for d in &report.diagnostics {
                    println!("{}", format_diagnostic(file, &grammar, d));
                }
                println!(
                    "{} error(s), {} warning(s)",
                    report.error_count, report.warning_count
                );
            }
        }
    }

    Ok(if report.has_errors() {
        Status::Failure
    } else {
        Status::Success
    })
}

/// The explicit `--config` file, else `ebnf.toml` beside `file`, else
/// defaults.
fn load_config(file: &Path, explicit: Option<&Path>) -> Result<AnalysisConfig, CliError> {
    let path: PathBuf = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let beside = file
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(CONFIG_FILE);
            if !beside.is_file() {
                return Ok(AnalysisConfig::default());
            }
            beside
        }
    };

    log::debug!("loading analysis config from {}", path.display());
    let text = fs::read_to_string(&path).map_err(|source| CliError::Read {
        path: path.clone(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| CliError::Config { path, source })
}
