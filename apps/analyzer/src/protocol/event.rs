use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::protocol::classifier::{ActionKind, Classifier};
use crate::protocol::decoder::{decode, DecoderLimits};
use crate::protocol::value::DecodedValue;

/// Bytes of a failed frame kept as a hex preview.
pub const RAW_PREVIEW_LEN: usize = 32;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Server to client.
    Inbound,
    Outbound,
}

/// One captured message after decoding and classification.
#[derive(Debug, Clone, PartialEq)]
pub struct GameEvent {
    /// Milliseconds.
    pub timestamp: i64,
    pub direction: Direction,
    pub action: ActionKind,
    pub fields: DecodedValue,
    pub raw_size: usize,
    pub decode_errors: Vec<String>,
    pub raw_preview: Option<String>,
}

impl GameEvent {
    /// Decode and classify one frame. Never fails: a frame the decoder
    /// rejects becomes a zero-value event carrying a hex preview.
    pub fn from_frame(
        timestamp: i64,
        direction: Direction,
        bytes: &[u8],
        raw_body: bool,
        limits: &DecoderLimits,
        classifier: &Classifier,
    ) -> Self {
        match decode(bytes, raw_body, limits) {
            Ok(decoded) => {
                let action = classifier.classify(&decoded.fields).action;
                Self {
                    timestamp,
                    direction,
                    action,
                    fields: decoded.fields,
                    raw_size: bytes.len(),
                    decode_errors: decoded.errors.iter().map(ToString::to_string).collect(),
                    raw_preview: None,
                }
            }
            Err(err) => {
                debug!(timestamp, error = %err, len = bytes.len(), "frame rejected");
                let preview = &bytes[..bytes.len().min(RAW_PREVIEW_LEN)];
                Self {
                    timestamp,
                    direction,
                    action: ActionKind::Unknown,
                    fields: DecodedValue::Null,
                    raw_size: bytes.len(),
                    decode_errors: vec![err.to_string()],
                    raw_preview: Some(hex::encode(preview)),
                }
            }
        }
    }

    /// Classify an already decoded tree.
    pub fn from_value(
        timestamp: i64,
        direction: Direction,
        fields: DecodedValue,
        classifier: &Classifier,
    ) -> Self {
        let action = classifier.classify(&fields).action;
        Self {
            timestamp,
            direction,
            action,
            fields,
            raw_size: 0,
            decode_errors: Vec::new(),
            raw_preview: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::encoder::FrameBuilder;

    #[test]
    fn decodes_and_classifies() {
        let frame = FrameBuilder::new()
            .object("p", FrameBuilder::new().string("bd", "hokum"))
            .frame();
        let ev = GameEvent::from_frame(
            10,
            Direction::Inbound,
            &frame,
            false,
            &DecoderLimits::default(),
            &Classifier::default(),
        );
        assert_eq!(ev.action, ActionKind::Bid);
        assert!(ev.decode_errors.is_empty());
        assert_eq!(ev.raw_size, frame.len());
        assert!(ev.raw_preview.is_none());
    }

    #[test]
    fn truncated_frame_becomes_zero_value_event() {
        let mut frame = FrameBuilder::new()
            .string("padding", &"x".repeat(40))
            .frame();
        frame.truncate(36);
        let ev = GameEvent::from_frame(
            5,
            Direction::Outbound,
            &frame,
            false,
            &DecoderLimits::default(),
            &Classifier::default(),
        );
        assert_eq!(ev.action, ActionKind::Unknown);
        assert_eq!(ev.fields, DecodedValue::Null);
        assert_eq!(ev.decode_errors.len(), 1);
        let preview = ev.raw_preview.unwrap();
        assert_eq!(preview.len(), RAW_PREVIEW_LEN * 2);
        assert!(preview.starts_with("80"));
    }
}
