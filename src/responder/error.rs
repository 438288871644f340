use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResponderError {
    #[error("Network I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Socket error: {0}")]
    Socket(String),
}

pub type Result<T> = std::result::Result<T, ResponderError>;
