//! Typed errors for the classification pipeline

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image decode error: {0}")]
    Decode(String),

    #[error("artifact error: {0}")]
    Artifact(String),

    #[error("invalid model: {0}")]
    InvalidModel(String),

    #[error("artifacts not loaded; call ArtifactStore::load() before classifying")]
    ArtifactsNotLoaded,

    #[error("predicted label {label} is not present in the class dictionary")]
    UnknownClass { label: usize },

    #[error("blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<base64::DecodeError> for Error {
    fn from(e: base64::DecodeError) -> Self {
        Error::Decode(e.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Decode(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Artifact(e.to_string())
    }
}

impl From<bincode::Error> for Error {
    fn from(e: bincode::Error) -> Self {
        Error::Artifact(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
