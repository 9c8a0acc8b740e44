//! Error types for the network gateway
use thiserror::Error;

/// Gateway errors
#[derive(Error, Debug)]
pub enum ControlError {
    /// OSC encode/decode error
    #[error("OSC error: {0}")]
    OscError(String),

    /// A message that does not match the address scheme or carries
    /// arguments of the wrong shape
    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for gateway operations
pub type Result<T> = std::result::Result<T, ControlError>;
