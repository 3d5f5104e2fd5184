use std::io::{self, BufReader, Write};
use std::time::Duration;

use log::{info, warn};

use super::ReplyChannel;
use crate::lines::LineReader;

/// Default serial port settings.
const DATA_BITS: serialport::DataBits = serialport::DataBits::Eight;
const STOP_BITS: serialport::StopBits = serialport::StopBits::One;
const PARITY: serialport::Parity = serialport::Parity::None;

/// Writes acknowledgments back to a serially attached unit.
pub struct SerialReply {
    port: Box<dyn serialport::SerialPort>,
}

impl SerialReply {
    pub fn new(port: Box<dyn serialport::SerialPort>) -> Self {
        Self { port }
    }
}

impl ReplyChannel for SerialReply {
    fn send(&mut self, text: &str) {
        let result = self
            .port
            .write_all(text.as_bytes())
            .and_then(|()| self.port.flush());
        if let Err(e) = result {
            warn!("failed to write reply to {:?}: {}", self.port.name(), e);
        }
    }
}

/// Open a serial port (8N1) at the given baud rate.
///
/// Returns a line reader over the port and a reply channel writing to a
/// clone of the same port.
pub fn open_port(
    port_name: &str,
    baud_rate: u32,
) -> serialport::Result<(SerialLines, SerialReply)> {
    let port = serialport::new(port_name, baud_rate)
        .data_bits(DATA_BITS)
        .stop_bits(STOP_BITS)
        .parity(PARITY)
        .timeout(Duration::from_millis(500))
        .open()?;
    let writer = port.try_clone()?;

    info!("opened {} at {} baud", port_name, baud_rate);
    Ok((
        SerialLines { lines: LineReader::new(BufReader::new(port)) },
        SerialReply::new(writer),
    ))
}

/// Reads `\n`-terminated sentences from a serial port.
pub struct SerialLines {
    lines: LineReader<BufReader<Box<dyn serialport::SerialPort>>>,
}

impl SerialLines {
    /// Block until a full line arrives. Read timeouts are retried and
    /// oversized lines skipped; `Ok(None)` means the port reported end of
    /// stream.
    pub fn next_line(&mut self) -> io::Result<Option<String>> {
        self.lines.next_line()
    }
}
