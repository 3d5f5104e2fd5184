//! Decoder for the YWT tracker sentence protocol.

pub mod ack;
pub mod decoder;
pub mod error;
pub mod grammar;
pub mod lines;
pub mod position;
pub mod registry;
pub mod reply;
pub mod sentence;

pub use ack::Acknowledgment;
pub use decoder::{DecoderConfig, MIN_SATELLITES, SentenceDecoder};
pub use error::{DecodeError, RegistryError, Result};
pub use lines::{LineReader, MAX_LINE_LEN};
pub use position::{Attribute, Attributes, Position};
pub use registry::{DeviceId, DeviceRegistry, MemoryRegistry};
pub use reply::ReplyChannel;
pub use sentence::{Altitude, Sentence};
