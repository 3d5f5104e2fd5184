use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use log::{debug, error, info, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

use ywt_protocol::{DeviceRegistry, MAX_LINE_LEN, SentenceDecoder};

use crate::sink::PositionSink;

/// Bind `addr` and serve tracker connections until the listener fails.
pub async fn run<R>(
    addr: SocketAddr,
    decoder: Arc<SentenceDecoder<R>>,
    sink: Arc<dyn PositionSink>,
) -> io::Result<()>
where
    R: DeviceRegistry + 'static,
{
    let listener = TcpListener::bind(addr).await?;
    info!("listening on {}", listener.local_addr()?);
    serve(listener, decoder, sink).await
}

/// Accept connections on `listener`, one task per connection.
pub async fn serve<R>(
    listener: TcpListener,
    decoder: Arc<SentenceDecoder<R>>,
    sink: Arc<dyn PositionSink>,
) -> io::Result<()>
where
    R: DeviceRegistry + 'static,
{
    loop {
        let (stream, peer) = listener.accept().await?;
        info!("connection from {peer}");

        let decoder = Arc::clone(&decoder);
        let sink = Arc::clone(&sink);
        tokio::spawn(async move {
            match handle_connection(stream, &decoder, sink.as_ref()).await {
                Ok(lines) => info!("{peer} closed after {lines} line(s)"),
                Err(e) => warn!("{peer} dropped: {e}"),
            }
        });
    }
}

/// Decode lines from `stream` until EOF, writing acknowledgments back after
/// each line. Returns the number of lines read.
pub async fn handle_connection<S, R>(
    stream: S,
    decoder: &SentenceDecoder<R>,
    sink: &dyn PositionSink,
) -> io::Result<usize>
where
    S: AsyncRead + AsyncWrite + Unpin,
    R: DeviceRegistry,
{
    let (reader, mut writer) = tokio::io::split(stream);
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::with_capacity(256);
    let mut replies: Vec<String> = Vec::new();
    let mut count = 0;

    loop {
        match read_line(&mut reader, &mut buf).await? {
            Line::Eof => break,
            Line::Oversized => {
                count += 1;
                warn!("dropping line longer than {MAX_LINE_LEN} bytes");
                continue;
            }
            Line::Complete => count += 1,
        }

        let text = String::from_utf8_lossy(&buf);
        let line = text.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            continue;
        }

        match decoder.decode(line, Some(&mut replies)) {
            Ok(position) => sink.emit(position),
            // Already logged by the decoder; the line is dropped.
            Err(e) if e.is_no_decode() => {}
            Err(e) => error!("dropping line after decoder fault: {e}"),
        }

        for reply in replies.drain(..) {
            debug!("TX: {reply:?}");
            writer.write_all(reply.as_bytes()).await?;
        }
        writer.flush().await?;
    }

    Ok(count)
}

enum Line {
    Complete,
    Oversized,
    Eof,
}

/// Read one `\n`-terminated line into `buf`, holding at most
/// [`MAX_LINE_LEN`] bytes plus terminator. Longer lines are consumed up to
/// their terminator and reported as [`Line::Oversized`].
async fn read_line<B>(reader: &mut B, buf: &mut Vec<u8>) -> io::Result<Line>
where
    B: AsyncBufRead + Unpin,
{
    buf.clear();
    let mut oversized = false;

    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Ok(match (oversized, buf.is_empty()) {
                (true, _) => Line::Oversized,
                (false, true) => Line::Eof,
                (false, false) => Line::Complete,
            });
        }

        let (used, terminated) = match available.iter().position(|&b| b == b'\n') {
            Some(i) => (i + 1, true),
            None => (available.len(), false),
        };

        if !oversized {
            if buf.len() + used > MAX_LINE_LEN + 2 {
                buf.clear();
                oversized = true;
            } else {
                buf.extend_from_slice(&available[..used]);
            }
        }
        reader.consume(used);

        if terminated {
            return Ok(if oversized { Line::Oversized } else { Line::Complete });
        }
    }
}
