//! Response envelope and wire-level response details.

use http::{HeaderMap, StatusCode, Version};
use serde::{Deserialize, Serialize};

/// The `{code, msg, data}` envelope decoded from enveloped-mode responses.
///
/// In raw mode the entire body decodes directly into `data` and `code`/`msg`
/// stay at their zero values.
///
/// # Examples
///
/// ```
/// use herald::Envelope;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct User { id: u64 }
///
/// let body = r#"{"code":0,"msg":"success","data":{"id":1}}"#;
/// let envelope: Envelope<User> = serde_json::from_str(body).unwrap();
/// assert_eq!(envelope.code, 0);
/// assert_eq!(envelope.data.id, 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Business return code; success is conventionally the configured
    /// ok-code (default 0).
    #[serde(default)]
    pub code: i64,

    /// Human-readable business message.
    #[serde(default)]
    pub msg: String,

    /// The caller-declared payload.
    pub data: T,
}

/// Wire-level details of the received response.
///
/// Status, headers, and protocol version are available to post-hooks before
/// the body is read; the raw body text fills in afterwards and is preserved
/// for debugging.
#[derive(Debug, Clone)]
pub struct ResponseInfo {
    /// The HTTP status code.
    pub status: StatusCode,

    /// The negotiated protocol version.
    pub version: Version,

    /// The response headers.
    pub headers: HeaderMap,

    pub(crate) raw: Option<String>,
}

impl ResponseInfo {
    pub(crate) fn new(status: StatusCode, version: Version, headers: HeaderMap) -> Self {
        Self {
            status,
            version,
            headers,
            raw: None,
        }
    }

    /// The raw response body, once it has been read.
    pub fn raw_body(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// A header value by name, when present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// The protocol label, e.g. `HTTP/1.1`.
    pub fn proto(&self) -> &'static str {
        match self.version {
            Version::HTTP_09 => "HTTP/0.9",
            Version::HTTP_10 => "HTTP/1.0",
            Version::HTTP_11 => "HTTP/1.1",
            Version::HTTP_2 => "HTTP/2.0",
            Version::HTTP_3 => "HTTP/3.0",
            _ => "HTTP/?",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_defaults_code_and_msg() {
        let envelope: Envelope<serde_json::Value> =
            serde_json::from_str(r#"{"data":{"id":1}}"#).unwrap();
        assert_eq!(envelope.code, 0);
        assert_eq!(envelope.msg, "");
        assert_eq!(envelope.data["id"], 1);
    }

    #[test]
    fn proto_labels() {
        let info = ResponseInfo::new(StatusCode::OK, Version::HTTP_11, HeaderMap::new());
        assert_eq!(info.proto(), "HTTP/1.1");
    }

    #[test]
    fn header_lookup() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", "application/json".parse().unwrap());
        let info = ResponseInfo::new(StatusCode::OK, Version::HTTP_11, headers);
        assert_eq!(info.header("content-type"), Some("application/json"));
        assert_eq!(info.header("x-missing"), None);
    }
}
