use log::{debug, error, trace, warn};

use crate::ack::{Acknowledgment, DEFAULT_ACK_TYPES};
use crate::error::{DecodeError, Result};
use crate::position::{
    Attribute, Attributes, KEY_PROTOCOL, KEY_SATELLITES, KEY_STATUS, PROTOCOL_NAME, Position,
};
use crate::registry::DeviceRegistry;
use crate::reply::ReplyChannel;
use crate::sentence::Sentence;

/// Minimum satellites in view for a fix to count as valid.
pub const MIN_SATELLITES: u32 = 3;

/// Configuration for the sentence decoder.
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Report types answered with an acknowledgment.
    pub ack_types: Vec<String>,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            ack_types: DEFAULT_ACK_TYPES.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Decodes YWT sentences into positions.
///
/// Holds no per-call state, so one decoder can be shared across every
/// connection.
pub struct SentenceDecoder<R> {
    registry: R,
    config: DecoderConfig,
}

impl<R: DeviceRegistry> SentenceDecoder<R> {
    pub fn new(registry: R) -> Self {
        Self::with_config(registry, DecoderConfig::default())
    }

    pub fn with_config(registry: R, config: DecoderConfig) -> Self {
        Self { registry, config }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode one line.
    ///
    /// On success, and only then, an acknowledgment is sent through `reply`
    /// if the report type asks for one and a channel is present. Errors for
    /// which [`DecodeError::is_no_decode`] holds are routine; the line should
    /// be dropped.
    pub fn decode(&self, line: &str, reply: Option<&mut dyn ReplyChannel>) -> Result<Position> {
        trace!("decoding {line:?}");

        let (position, ack) = match self.decode_sentence(line) {
            Ok(decoded) => decoded,
            Err(e) => {
                match &e {
                    DecodeError::FormatMismatch => debug!("not a YWT sentence: {line:?}"),
                    DecodeError::UnknownDevice(id) => warn!("unknown device {id}"),
                    DecodeError::InvalidTimestamp { .. } => warn!("{e}: {line:?}"),
                    DecodeError::InternalInconsistency { .. } => error!("{e}: {line:?}"),
                }
                return Err(e);
            }
        };

        if let (Some(ack), Some(reply)) = (ack, reply) {
            let text = ack.to_string();
            trace!("TX: {text:?}");
            reply.send(&text);
        }

        Ok(position)
    }

    fn decode_sentence<'a>(
        &self,
        line: &'a str,
    ) -> Result<(Position, Option<Acknowledgment<'a>>)> {
        let sentence = Sentence::parse(line)?;

        let device_id = self
            .registry
            .lookup(sentence.unit_id)
            .ok_or_else(|| DecodeError::UnknownDevice(sentence.unit_id.to_string()))?;

        let time = sentence.time.to_utc()?;

        let mut attributes = Attributes::new();
        attributes.insert(KEY_PROTOCOL.to_string(), Attribute::Text(PROTOCOL_NAME.to_string()));
        attributes.insert(
            KEY_SATELLITES.to_string(),
            Attribute::Integer(i64::from(sentence.satellites)),
        );
        attributes.insert(KEY_STATUS.to_string(), Attribute::Text(sentence.status.to_string()));

        let position = Position {
            device_id,
            time,
            latitude: sentence.latitude,
            longitude: sentence.longitude,
            altitude: sentence.altitude.meters(),
            speed: sentence.speed,
            course: sentence.course,
            valid: sentence.satellites >= MIN_SATELLITES,
            attributes,
        };

        let ack = self
            .config
            .ack_types
            .iter()
            .any(|t| t == sentence.kind)
            .then(|| Acknowledgment::new(sentence.kind, sentence.report_id));

        Ok((position, ack))
    }
}
