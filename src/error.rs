use thiserror::Error;

use ywt_protocol::RegistryError;

pub type Result<T> = std::result::Result<T, GatewayError>;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[cfg(feature = "serial")]
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("device registry: {0}")]
    Registry(#[from] RegistryError),

    #[error("{0}")]
    Usage(String),
}
