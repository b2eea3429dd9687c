//! Error types for mbox-rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MboxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No message with key {0}")]
    KeyNotFound(usize),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MboxError>;
