//! Error types shared by the settings store and the system integrations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode settings: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("clipboard error: {0}")]
    Clipboard(String),
}

impl AppError {
    pub fn clipboard<T: ToString>(msg: T) -> Self {
        AppError::Clipboard(msg.to_string())
    }
}
