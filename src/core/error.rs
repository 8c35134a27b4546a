//! HZ-015: Error kinds shared by the compiler, the translation store and the CLI.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can abort a run. No error is retried.
#[derive(Debug, Error)]
pub enum Error {
    /// A required input path was not supplied.
    #[error("{0}")]
    MissingInput(String),

    /// Unparsable document, missing required child/attribute, or a bad table row.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Open/read/write failure on a file.
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A value could not be encoded in the output format.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl Error {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput(message.into())
    }

    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
