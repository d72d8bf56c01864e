mod commands;
mod error;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use commands::{cmd_check, cmd_fix, cmd_fmt, cmd_parse, cmd_tokens, Status};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// EBNF grammar toolkit.
#[derive(Parser)]
#[command(name = "ebnf", version, about = "EBNF grammar checker and formatter")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Log level for diagnostics written to stderr
    #[arg(long, global = true, default_value = "warn", value_enum)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the token stream of an EBNF file
    Tokens {
        /// Path to the .ebnf source file
        file: PathBuf,
    },

    /// Parse an EBNF file and print its syntax tree
    Parse {
        /// Path to the .ebnf source file
        file: PathBuf,
    },

    /// Run the analyzer over an EBNF file
    Check {
        /// Path to the .ebnf source file
        file: PathBuf,
        /// Comma-separated list of passes to run (undefined-rule, duplicate-rule,
        /// unreachable-rule, recursion, ambiguous-prefix, redundant-parentheses,
        /// simplifiable-repetition). Default: all.
        #[arg(long)]
        passes: Option<String>,
        /// Path to a TOML analysis config. Default: ebnf.toml next to the file, if present.
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the canonical rendering of an EBNF file
    Fmt {
        /// Path to the .ebnf source file
        file: PathBuf,
    },

    /// Apply every available quick fix
    Fix {
        /// Path to the .ebnf source file
        file: PathBuf,
        /// Rewrite the file in place instead of printing the result
        #[arg(long)]
        write: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.log_level.into()) {
        report_error(&format!("cannot install logger: {}", e), cli.output, cli.quiet);
    }

    let result = match cli.command {
        Commands::Tokens { file } => cmd_tokens(&file, cli.output, cli.quiet),
        Commands::Parse { file } => cmd_parse(&file, cli.output, cli.quiet),
        Commands::Check {
            file,
            passes,
            config,
        } => cmd_check(
            &file,
            passes.as_deref(),
            config.as_deref(),
            cli.output,
            cli.quiet,
        ),
        Commands::Fmt { file } => cmd_fmt(&file, cli.output, cli.quiet),
        Commands::Fix { file, write } => cmd_fix(&file, write, cli.output, cli.quiet),
    };

    match result {
        Ok(Status::Success) => {}
        Ok(Status::Failure) => process::exit(1),
        Err(e) => {
            report_error(&e.to_string(), cli.output, cli.quiet);
            process::exit(1);
        }
    }
}

fn init_logging(level: log::LevelFilter) -> Result<(), log::SetLoggerError> {
    simplelog::TermLogger::init(
        level,
        simplelog::ConfigBuilder::new()
            .set_time_format_custom(&[])
            .build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Never,
    )
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("error: {}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_logger_install_is_reported() {
        let _ = init_logging(log::LevelFilter::Off);
        assert!(init_logging(log::LevelFilter::Off).is_err());
    }
}
