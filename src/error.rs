use thiserror::Error;

/// Failure of a single page fetch. Cloneable so it can travel inside actions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Non-2xx response; `message` is what the server said.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// Network failure or a body that could not be decoded.
    #[error("{0}")]
    Transport(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Wrong format of search input: expected owner/repo, got {0:?}")]
    Format(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
