use std::fmt;

use thiserror::Error;

/// Which root record a builder expected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordKind {
    Caso,
    Evidencia,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Caso => f.write_str("caso"),
            RecordKind::Evidencia => f.write_str("evidencia"),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    /// The root record handed to a document builder was absent. Nothing is written.
    #[error("missing root record: {0}")]
    MissingRecord(RecordKind),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
