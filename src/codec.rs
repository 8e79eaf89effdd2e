//! Swappable JSON codec capability.
//!
//! The dispatcher never calls `serde_json` directly for wire bytes: payload
//! values and response bodies pass through a [`Codec`], so callers can swap
//! in an alternative encoder per client. The trait works on
//! `serde_json::Value` rather than generic types to stay object-safe;
//! typed payloads are converted to a `Value` before they reach the codec.

use serde_json::Value;

use crate::BoxError;

/// Serialization backend used for request payloads and response bodies.
pub trait Codec: Send + Sync {
    /// Encodes a JSON value into wire bytes.
    fn marshal(&self, value: &Value) -> Result<Vec<u8>, BoxError>;

    /// Decodes wire bytes into a JSON value.
    fn unmarshal(&self, bytes: &[u8]) -> Result<Value, BoxError>;
}

/// The default codec: compact JSON via `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn marshal(&self, value: &Value) -> Result<Vec<u8>, BoxError> {
        Ok(serde_json::to_vec(value)?)
    }

    fn unmarshal(&self, bytes: &[u8]) -> Result<Value, BoxError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// A codec that emits pretty-printed JSON payloads.
///
/// Useful against servers or capture proxies where human-readable request
/// bodies matter more than byte count. Decoding is identical to
/// [`JsonCodec`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PrettyJsonCodec;

impl Codec for PrettyJsonCodec {
    fn marshal(&self, value: &Value) -> Result<Vec<u8>, BoxError> {
        Ok(serde_json::to_vec_pretty(value)?)
    }

    fn unmarshal(&self, bytes: &[u8]) -> Result<Value, BoxError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_codec_round_trip() {
        let value = json!({"id": 1, "name": "Test"});
        let bytes = JsonCodec.marshal(&value).unwrap();
        let back = JsonCodec.unmarshal(&bytes).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn pretty_codec_emits_indented_output() {
        let value = json!({"id": 1});
        let bytes = PrettyJsonCodec.marshal(&value).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains('\n'));
        assert_eq!(PrettyJsonCodec.unmarshal(text.as_bytes()).unwrap(), value);
    }

    #[test]
    fn unmarshal_rejects_garbage() {
        assert!(JsonCodec.unmarshal(b"not json").is_err());
    }
}
