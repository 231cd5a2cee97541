//! Error types for Tripline.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    // Context errors
    #[error("Event name is required")]
    MissingEventContext,

    // Definition errors
    #[error("Failed to read workflow definitions at {path}: {source}")]
    DefinitionRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse workflow {path}: {message}")]
    DefinitionParse { path: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
