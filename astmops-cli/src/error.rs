use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    #[error("malformed decoded-record line {line} in {path}: {source}")]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },

    #[error("malformed aerodrome geometry file {path}: {source}")]
    MalformedAerodromeFile { path: PathBuf, source: serde_json::Error },

    #[error("invalid mode-S address {value:?} on line {line} of {path}")]
    InvalidExcludedAddress { path: PathBuf, line: usize, value: String },

    #[error("malformed DGPS reference record on line {line} of {path}")]
    MalformedDgpsRecord { path: PathBuf, line: usize },

    #[error("--dgps mode requires --dgps-reference")]
    MissingDgpsReferenceFile,

    #[error("invalid session date {0:?}: {1}")]
    InvalidDate(String, chrono::ParseError),

    #[error(transparent)]
    Config(#[from] astmops_core::CoreError),
}

pub type Result<T> = std::result::Result<T, CliError>;
