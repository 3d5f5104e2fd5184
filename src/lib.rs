pub mod config;
pub mod error;
pub mod replay;
pub mod server;
pub mod sink;

#[cfg(feature = "serial")]
pub mod serial;

pub use config::{Cli, GatewayConfig, Mode};
pub use error::{GatewayError, Result};
pub use sink::{PositionSink, StdoutSink};
