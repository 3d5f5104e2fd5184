use std::io::{self, BufRead};

use log::info;

use ywt_protocol::{DeviceRegistry, LineReader, SentenceDecoder};

use crate::sink::PositionSink;

/// Line counts from a replay run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub decoded: usize,
    /// Lines that were not YWT, named unknown devices, or carried impossible times.
    pub dropped: usize,
    /// Lines the grammar accepted but the decoder could not convert.
    pub failed: usize,
}

/// Decode every line of `reader`. There is no device on the other end, so
/// no acknowledgments are sent.
pub fn replay<B, R>(
    reader: B,
    decoder: &SentenceDecoder<R>,
    sink: &dyn PositionSink,
) -> io::Result<ReplayStats>
where
    B: BufRead,
    R: DeviceRegistry,
{
    let mut stats = ReplayStats::default();

    let mut lines = LineReader::new(reader);

    while let Some(line) = lines.next_line()? {
        if line.is_empty() {
            continue;
        }

        match decoder.decode(&line, None) {
            Ok(position) => {
                stats.decoded += 1;
                sink.emit(position);
            }
            Err(e) if e.is_no_decode() => stats.dropped += 1,
            Err(_) => stats.failed += 1,
        }
    }

    info!(
        "replay finished: {} decoded, {} dropped, {} failed",
        stats.decoded, stats.dropped, stats.failed
    );
    Ok(stats)
}
