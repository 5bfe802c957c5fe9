use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File '{path}' ended at byte {offset} before its chunk was fully read")]
    UnexpectedEof { path: PathBuf, offset: u64 },

    #[error("No line terminator within {window} bytes before offset {offset}; raise the alignment window")]
    AlignmentWindowExceeded { offset: u64, window: usize },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Malformed record at byte {offset}: no ';' delimiter in '{record}'")]
    MissingDelimiter { offset: u64, record: String },

    #[error("Malformed record at byte {offset}: empty station name")]
    EmptyStation { offset: u64 },

    #[error("Malformed record at byte {offset}: '{value}' is not a signed decimal with one fractional digit")]
    InvalidMeasurement { offset: u64, value: String },

    #[error("Record at byte {offset} exceeds the {capacity}-byte read buffer")]
    RecordTooLong { offset: u64, capacity: usize },

    #[error("Thread pool creation failed: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
