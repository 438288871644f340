use crate::protocol::ProtocolError;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InitiatorError {
    #[error("Network I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Failed to resolve {0}")]
    Resolve(String),

    #[error("Socket error: {0}")]
    Socket(String),

    #[error("No response within {0:?}")]
    Timeout(Duration),

    #[error("Cancelled by user")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, InitiatorError>;
