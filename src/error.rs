//! Crate-level error type.

use thiserror::Error;

use crate::charts::ChartError;
use crate::config::ConfigError;
use crate::io::input::InputError;
use crate::market::dispatch::DispatchError;
use crate::market::network::NetworkError;

/// Any failure along the load → build → optimize → report pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// One or more scenario constraints were violated.
    #[error("invalid scenario:\n{}", format_config_errors(.0))]
    Config(Vec<ConfigError>),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error(transparent)]
    Chart(#[from] ChartError),
    #[error("failed to write {path}: {source}")]
    Export {
        path: String,
        #[source]
        source: csv::Error,
    },
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(vec![e])
    }
}

fn format_config_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(|e| format!("  {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}
