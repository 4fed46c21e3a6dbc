// src/error.rs

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid tensor: {0}")]
    InvalidTensor(String),
    #[error("Invalid Euler angles convention: {0}")]
    UnsupportedConvention(String),
    #[error("Invalid NMR tensor for Euler angles: {0}")]
    UnsupportedTensorKind(String),
    #[error("Unknown selection mode: {0}")]
    UnsupportedSelectionMode(String),
    #[error("Unknown colormap: {0}")]
    UnknownColormap(String),
    #[error("Missing data: {0}")]
    MissingData(String),
    #[error("CallbackMerger has completed its iterations")]
    OverCompletion,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn invalid_tensor(m: &str) -> Error {
    Error::InvalidTensor(m.to_string())
}

pub fn missing_data(m: &str) -> Error {
    Error::MissingData(m.to_string())
}
