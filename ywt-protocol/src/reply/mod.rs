#[cfg(feature = "serial")]
pub mod serial;

/// The outbound half of a device connection.
///
/// Sends are fire-and-forget: implementors report delivery failures through
/// their own logging, never back to the decoder.
pub trait ReplyChannel {
    fn send(&mut self, text: &str);
}

/// Collects replies in memory, for transports that flush after each line.
impl ReplyChannel for Vec<String> {
    fn send(&mut self, text: &str) {
        self.push(text.to_string());
    }
}
