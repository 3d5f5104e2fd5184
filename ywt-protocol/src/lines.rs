use std::io::{self, BufRead};

use log::warn;

/// Longest line a host will buffer. Valid sentences are well under 200 bytes.
pub const MAX_LINE_LEN: usize = 1024;

/// Splits a byte stream into `\n`-terminated lines of bounded length.
///
/// A line longer than [`MAX_LINE_LEN`] is discarded up to its terminator and
/// never held in memory whole. Read timeouts are retried.
pub struct LineReader<R> {
    reader: R,
    buf: Vec<u8>,
    discarding: bool,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, buf: Vec::with_capacity(256), discarding: false }
    }

    /// The next line with `\r\n`/`\n` stripped, or `Ok(None)` at end of
    /// stream. Invalid UTF-8 is replaced with U+FFFD.
    pub fn next_line(&mut self) -> io::Result<Option<String>> {
        loop {
            let available = match self.reader.fill_buf() {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == io::ErrorKind::TimedOut => continue,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };

            if available.is_empty() {
                // Unterminated final line.
                if self.discarding || self.buf.is_empty() {
                    self.discarding = false;
                    self.buf.clear();
                    return Ok(None);
                }
                return Ok(Some(self.take_line()));
            }

            let (chunk, terminated) = match available.iter().position(|&b| b == b'\n') {
                Some(i) => (&available[..=i], true),
                None => (available, false),
            };
            let used = chunk.len();

            if !self.discarding {
                if self.buf.len() + used > MAX_LINE_LEN + 2 {
                    warn!("dropping line longer than {MAX_LINE_LEN} bytes");
                    self.buf.clear();
                    self.discarding = true;
                } else {
                    self.buf.extend_from_slice(chunk);
                }
            }
            self.reader.consume(used);

            if terminated {
                if self.discarding {
                    self.discarding = false;
                    continue;
                }
                return Ok(Some(self.take_line()));
            }
        }
    }

    fn take_line(&mut self) -> String {
        let line = String::from_utf8_lossy(&self.buf)
            .trim_end_matches(['\r', '\n'])
            .to_string();
        self.buf.clear();
        line
    }
}
