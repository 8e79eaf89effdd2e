//! Error types for the request pipeline.
//!
//! Failures split into three tiers. [`ConfigError`] covers fatal
//! configuration mistakes (bad verb, bad host, malformed URL) returned
//! straight from the offending setter. [`Error`] covers transport-class
//! runtime failures inside `send`. Both runtime tiers are captured into a
//! [`Fault`] record on the client rather than returned, so the chain always
//! completes and the caller inspects one structured outcome.

use std::fmt;
use std::time::SystemTime;

use http::StatusCode;

/// Boxed error type carried by hook failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A fatal configuration error raised at the offending setter call.
///
/// These indicate programmer error in static configuration and are meant to
/// be caught during development, not handled per-request.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The method is not one of the seven supported verbs.
    #[error(r#"invalid method "{0}": must be one of GET, POST, PUT, DELETE, PATCH, HEAD, OPTIONS"#)]
    InvalidMethod(String),

    /// The URL scheme is neither `http` nor `https`.
    #[error(r#"invalid scheme "{0}": only http and https are supported"#)]
    InvalidScheme(String),

    /// The host is not a plausible hostname or IP address (with optional port).
    #[error(r#"invalid host "{0}": expected a hostname or IP address, optionally with a port"#)]
    InvalidHost(String),

    /// A URL string failed to parse.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// More than two positional route values were supplied.
    #[error("too many route values: at most two (`:id`, then `:sid`) are substituted")]
    TooManyRouteValues,
}

/// A transport-class runtime error occurring inside the dispatch pipeline.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A network-level failure from the transport (connection, DNS, TLS,
    /// invalid header material at request build time).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The round trip exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// A pre- or post-hook aborted the pipeline.
    #[error("hook aborted the request: {0}")]
    Hook(#[source] BoxError),

    /// The request payload could not be encoded.
    #[error("failed to encode request payload: {0}")]
    Encode(String),

    /// The URL parts did not compose into a valid URL.
    #[error("failed to compose request URL: {0}")]
    Compose(#[from] url::ParseError),

    /// The response body was zero-length.
    #[error("empty response body")]
    EmptyBody,

    /// The response body could not be decoded into the expected shape.
    ///
    /// The raw body is preserved so decode failures stay debuggable in
    /// production.
    #[error("failed to decode response (status {status}): {detail}")]
    Decode {
        /// The raw response body that failed to decode.
        raw: String,
        /// The codec or deserializer error message.
        detail: String,
        /// The HTTP status code of the response.
        status: StatusCode,
    },
}

/// The pipeline stage where a transport fault occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    PreHook,
    Materialize,
    Execute,
    PostHook,
    ReadBody,
    Decode,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::PreHook => "pre-hook",
            Phase::Materialize => "materialize",
            Phase::Execute => "execute",
            Phase::PostHook => "post-hook",
            Phase::ReadBody => "read-body",
            Phase::Decode => "decode",
        };
        f.write_str(label)
    }
}

/// The structured failure record captured by `send`.
///
/// After `send` completes, a client holds at most one fault: a transport
/// fault means the pipeline itself could not complete trustworthily; a
/// business fault means the wire exchange succeeded but the server signalled
/// failure through a non-success status, with decoded data still available.
#[derive(thiserror::Error, Debug)]
pub enum Fault {
    #[error("transport fault during {phase}: {source}")]
    Transport {
        /// Pipeline stage that failed.
        phase: Phase,
        /// The underlying error.
        source: Error,
        /// When the fault was recorded.
        occurred_at: SystemTime,
    },

    #[error("business failure: {reason}")]
    Business {
        /// The envelope's `msg`, carried as the failure reason.
        reason: String,
        /// When the fault was recorded.
        occurred_at: SystemTime,
    },
}

impl Fault {
    pub(crate) fn transport(phase: Phase, source: Error) -> Self {
        Fault::Transport {
            phase,
            source,
            occurred_at: SystemTime::now(),
        }
    }

    pub(crate) fn business(reason: impl Into<String>) -> Self {
        Fault::Business {
            reason: reason.into(),
            occurred_at: SystemTime::now(),
        }
    }

    /// Returns `true` for a transport-class fault.
    pub fn is_transport(&self) -> bool {
        matches!(self, Fault::Transport { .. })
    }

    /// Returns `true` for a business-class fault.
    pub fn is_business(&self) -> bool {
        matches!(self, Fault::Business { .. })
    }

    /// The time the fault was recorded.
    pub fn occurred_at(&self) -> SystemTime {
        match self {
            Fault::Transport { occurred_at, .. } | Fault::Business { occurred_at, .. } => {
                *occurred_at
            }
        }
    }

    /// Seconds since the Unix epoch at which the fault was recorded.
    pub(crate) fn occurred_at_unix(&self) -> u64 {
        self.occurred_at()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fault_classification() {
        let t = Fault::transport(Phase::Execute, Error::EmptyBody);
        assert!(t.is_transport());
        assert!(!t.is_business());

        let b = Fault::business("record not found");
        assert!(b.is_business());
        assert!(!b.is_transport());
    }

    #[test]
    fn fault_display_includes_phase() {
        let t = Fault::transport(Phase::Decode, Error::EmptyBody);
        let text = t.to_string();
        assert!(text.contains("decode"), "{text}");
        assert!(text.contains("empty response body"), "{text}");
    }

    #[test]
    fn decode_error_preserves_raw_body() {
        let e = Error::Decode {
            raw: "not json".to_string(),
            detail: "expected value".to_string(),
            status: StatusCode::OK,
        };
        let text = e.to_string();
        assert!(text.contains("status 200"), "{text}");
        assert!(text.contains("expected value"), "{text}");
    }
}
