use std::path::Path;

use thiserror::Error;

pub mod catalog;
pub mod reader;
pub mod requests;

pub use catalog::load_catalog;
pub use requests::load_requests;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("missing input: {0}")]
    MissingInput(String),

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("parse error: {0}")]
    Parse(String),
}

impl InputError {
    pub(crate) fn json(path: &Path, source: serde_json::Error) -> Self {
        InputError::Json {
            path: path.display().to_string(),
            source,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
