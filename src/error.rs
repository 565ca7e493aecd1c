use thiserror::Error;

use crate::logger::LoggerError;

/// Every failure the generator can surface to the command line.
#[derive(Error, Debug)]
pub enum Error {
    /// Command line could not be parsed.
    #[error("{0}")]
    Usage(String),

    /// An option was given a value it cannot take.
    #[error("invalid value {value:?} for --{option}: {reason}")]
    InvalidArgument {
        option: &'static str,
        value: String,
        reason: String,
    },

    /// Schema is well-formed JSON but violates a schema rule.
    #[error("schema error: {0}")]
    Schema(String),

    #[error("failed to parse schema: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Finished output could not be moved into place.
    #[error("failed to persist output file: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("failed to initialize logger: {0}")]
    Logger(#[from] LoggerError),
}
