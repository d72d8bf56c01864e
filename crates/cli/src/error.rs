use std::path::PathBuf;

use ebnf_analyze::{ConfigError, FixError};

#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error(transparent)]
    Passes(#[from] ConfigError),

    #[error("cannot apply fixes: {0}")]
    Fix(#[from] FixError),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{} has {count} syntax error(s); refusing to rewrite it", path.display())]
    SyntaxErrors { path: PathBuf, count: usize },

    #[error("fix round {round} would introduce {count} syntax error(s); nothing was changed")]
    FixBrokeGrammar { round: usize, count: usize },
}
