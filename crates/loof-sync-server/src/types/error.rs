//! Error types for the server binary.

/// Errors that stop the server from starting or running.
#[derive(thiserror::Error, Debug)]
pub enum ServerError {
    #[error("Invalid listen address '{addr}': {reason}")]
    InvalidAddr { addr: String, reason: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ServerResult<T> = Result<T, ServerError>;
