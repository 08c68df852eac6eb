use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarketDataError {
    #[error("Failed to open price file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read price file: {0}")]
    Csv(#[from] csv::Error),

    #[error("Price file {0} has no '{1}' column")]
    MissingColumn(PathBuf, &'static str),

    #[error("Invalid data on line {line}: {message}")]
    Parse { line: u64, message: String },

    #[error("Price data rejected: {0}")]
    Core(#[from] core_types::CoreError),
}
