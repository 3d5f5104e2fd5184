use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};

use crate::registry::DeviceId;

/// Metadata key for the protocol tag.
pub const KEY_PROTOCOL: &str = "protocol";
/// Metadata key for the satellite count.
pub const KEY_SATELLITES: &str = "satellites";
/// Metadata key for the raw status token.
pub const KEY_STATUS: &str = "status";

/// Protocol tag written into every decoded position.
pub const PROTOCOL_NAME: &str = "ywt";

/// A typed metadata value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attribute {
    Text(String),
    Integer(i64),
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Text(s) => f.write_str(s),
            Attribute::Integer(n) => write!(f, "{n}"),
        }
    }
}

/// Extensible, ordered metadata map attached to a position.
pub type Attributes = BTreeMap<String, Attribute>;

/// A decoded position report.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    /// Internal device id, resolved from the sentence's hardware id.
    pub device_id: DeviceId,
    /// Fix time, UTC, second precision.
    pub time: DateTime<Utc>,
    /// Latitude in decimal degrees (negative = South).
    pub latitude: f64,
    /// Longitude in decimal degrees (negative = West).
    pub longitude: f64,
    /// Altitude in meters, 0.0 when the device did not report one.
    pub altitude: f64,
    /// Speed in protocol units, unscaled.
    pub speed: f64,
    /// Course in degrees, as sent.
    pub course: f64,
    /// Fix-quality heuristic.
    pub valid: bool,
    pub attributes: Attributes,
}

impl Position {
    pub fn attribute(&self, key: &str) -> Option<&Attribute> {
        self.attributes.get(key)
    }

    pub fn satellites(&self) -> Option<i64> {
        match self.attribute(KEY_SATELLITES) {
            Some(Attribute::Integer(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<&str> {
        match self.attribute(KEY_STATUS) {
            Some(Attribute::Text(s)) => Some(s),
            _ => None,
        }
    }
}
