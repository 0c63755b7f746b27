//! Codec trait and implementations for (de)serializing wire messages.
//!
//! The session layer speaks JSON text frames, but nothing above the
//! protocol crate should care how a [`Notification`](crate::Notification)
//! becomes a frame. The [`Codec`] trait is that seam; [`JsonCodec`] is the
//! implementation every current consumer uses.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// Converts between Rust message types and wire text.
///
/// `Send + Sync + 'static` because codecs are shared across connection
/// handler tasks for the lifetime of the process.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into one wire frame.
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError>;

    /// Deserializes one wire frame back into a value.
    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, ProtocolError>;
}

/// A [`Codec`] backed by `serde_json`.
///
/// Human-readable frames make the protocol inspectable in browser dev
/// tools, which is worth the size overhead for a turn-based game.
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError> {
        serde_json::to_string(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, ProtocolError> {
        serde_json::from_str(text).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{Notification, PlayerId, WinReason};

    #[test]
    fn test_json_codec_round_trips_notifications() {
        let codec = JsonCodec;
        let msg = Notification::Winner {
            player_id: PlayerId(9),
            reason: WinReason::Forfeit,
        };

        let text = codec.encode(&msg).unwrap();
        let decoded: Notification = codec.decode(&text).unwrap();

        assert_eq!(msg, decoded);
    }

    #[test]
    fn test_json_codec_decode_garbage_returns_error() {
        let codec = JsonCodec;
        let result: Result<Notification, _> = codec.decode("not json at all");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }
}
