use log::{error, info};

use ywt_protocol::reply::serial::open_port;
use ywt_protocol::{DeviceRegistry, SentenceDecoder};

use crate::error::Result;
use crate::sink::PositionSink;

/// Decode sentences from a serially attached unit until the port closes.
pub fn run<R: DeviceRegistry>(
    port_name: &str,
    baud_rate: u32,
    decoder: &SentenceDecoder<R>,
    sink: &dyn PositionSink,
) -> Result<()> {
    let (mut lines, mut reply) = open_port(port_name, baud_rate)?;

    while let Some(line) = lines.next_line()? {
        if line.is_empty() {
            continue;
        }
        match decoder.decode(&line, Some(&mut reply)) {
            Ok(position) => sink.emit(position),
            Err(e) if e.is_no_decode() => {}
            Err(e) => error!("dropping line after decoder fault: {e}"),
        }
    }

    info!("{port_name} closed");
    Ok(())
}
