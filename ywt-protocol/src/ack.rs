use std::fmt;

/// Report types that units expect to be acknowledged.
pub const DEFAULT_ACK_TYPES: &[&str] = &["KP", "EP"];

/// Acknowledgment control line: `%AT+<TYPE>=<REPORTID>\r\n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Acknowledgment<'a> {
    pub kind: &'a str,
    pub report_id: &'a str,
}

impl<'a> Acknowledgment<'a> {
    pub fn new(kind: &'a str, report_id: &'a str) -> Self {
        Self { kind, report_id }
    }
}

impl fmt::Display for Acknowledgment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%AT+{}={}\r\n", self.kind, self.report_id)
    }
}
