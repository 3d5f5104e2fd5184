use thiserror::Error;

pub type Result<T> = std::result::Result<T, DecodeError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("sentence does not match the YWT grammar")]
    FormatMismatch,

    #[error("unknown device: {0}")]
    UnknownDevice(String),

    #[error("impossible timestamp: {year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}")]
    InvalidTimestamp {
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    },

    /// A field accepted by the grammar could not be converted. The grammar
    /// and the field conversions disagree; this is a bug, not bad input.
    #[error("grammar accepted {field} = {value:?} but it failed to convert")]
    InternalInconsistency { field: &'static str, value: String },
}

impl DecodeError {
    /// Routine outcomes: the caller drops the line and keeps the connection.
    pub fn is_no_decode(&self) -> bool {
        !matches!(self, DecodeError::InternalInconsistency { .. })
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed registry entry on line {line}: {text:?}")]
    Malformed { line: usize, text: String },

    #[error("duplicate hardware id {hardware_id} on line {line}")]
    Duplicate { line: usize, hardware_id: String },
}
