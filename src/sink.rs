use std::io::{self, Write};

use chrono::SecondsFormat;
use log::{info, warn};

use ywt_protocol::Position;

/// Consumer of decoded positions.
pub trait PositionSink: Send + Sync {
    fn emit(&self, position: Position);
}

/// Writes one line per position to stdout.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl PositionSink for StdoutSink {
    fn emit(&self, position: Position) {
        let line = format_position(&position);
        info!("position from device {}", position.device_id);
        let mut out = io::stdout().lock();
        if let Err(e) = writeln!(out, "{line}") {
            warn!("failed to write position: {e}");
        }
    }
}

/// `key=value` rendering of a position, metadata last in key order.
pub fn format_position(position: &Position) -> String {
    let mut line = format!(
        "device={} time={} lat={:.6} lon={:.6} alt={:.1} speed={} course={} valid={}",
        position.device_id,
        position.time.to_rfc3339_opts(SecondsFormat::Secs, true),
        position.latitude,
        position.longitude,
        position.altitude,
        position.speed,
        position.course,
        position.valid,
    );
    for (key, value) in &position.attributes {
        line.push_str(&format!(" {key}={value}"));
    }
    line
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use ywt_protocol::{Attribute, Attributes, DeviceId};

    use super::*;

    #[test]
    fn test_format_position() {
        let mut attributes = Attributes::new();
        attributes.insert("protocol".to_string(), Attribute::Text("ywt".to_string()));
        attributes.insert("satellites".to_string(), Attribute::Integer(4));
        attributes.insert("status".to_string(), Attribute::Text("00".to_string()));

        let position = Position {
            device_id: DeviceId(7),
            time: Utc.with_ymd_and_hms(2009, 7, 23, 18, 28, 13).unwrap(),
            latitude: -22.069725,
            longitude: 114.602345,
            altitude: 0.0,
            speed: 30.0,
            course: 160.0,
            valid: true,
            attributes,
        };

        assert_eq!(
            format_position(&position),
            "device=7 time=2009-07-23T18:28:13Z lat=-22.069725 lon=114.602345 alt=0.0 \
             speed=30 course=160 valid=true protocol=ywt satellites=4 status=00"
        );
    }
}
