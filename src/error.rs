use thiserror::Error;

/// Every fallible call into the Atlas service surfaces one of these.
///
/// Job failure (`status == "failed"`) is deliberately *not* a variant: a
/// failed generation is an expected business outcome, so the polling engine
/// returns it as a normal terminal payload and callers branch on the status.
#[derive(Debug, Error)]
pub enum AtlasError {
    /// No API key was resolvable before any network call was attempted.
    /// Distinct from a server-side auth rejection, which arrives as
    /// [`AtlasError::ApiRejected`].
    #[error("no API key configured. Run: atlas auth --key YOUR_KEY (or set ATLAS_API_KEY)")]
    Unauthenticated,

    /// The server (or an intermediary) answered with something that is not
    /// JSON, e.g. an HTML error page. Carries a truncated body snippet for
    /// diagnostics.
    #[error("expected JSON response but got {content_type} (HTTP {status})")]
    ProtocolMismatch {
        status: u16,
        content_type: String,
        snippet: String,
    },

    /// The response was JSON but the HTTP status indicated failure. The
    /// message prefers the payload's `error` field, then `message`, then a
    /// generic fallback; the full decoded payload is kept in `details`.
    #[error("{message} (HTTP {status})")]
    ApiRejected {
        status: u16,
        message: String,
        details: serde_json::Value,
    },

    /// The polling deadline elapsed before a terminal job state was observed.
    /// The job may still complete server-side; check back later.
    #[error("timed out waiting for job completion")]
    Timeout,

    /// The caller's cancellation token fired during a wait.
    #[error("operation cancelled")]
    Cancelled,

    /// Network-level failure: connection refused, DNS, TLS, timed-out socket.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The response was JSON with a success status but did not match the
    /// expected payload shape.
    #[error("could not decode response payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl AtlasError {
    /// Numeric code analogous to an HTTP status, for `--json` consumers and
    /// log lines.
    pub fn code(&self) -> u16 {
        match self {
            AtlasError::Unauthenticated => 401,
            AtlasError::ProtocolMismatch { status, .. } => *status,
            AtlasError::ApiRejected { status, .. } => *status,
            AtlasError::Timeout => 408,
            AtlasError::Cancelled => 499,
            AtlasError::Http(err) => err.status().map(|s| s.as_u16()).unwrap_or(0),
            AtlasError::Decode(_) => 502,
        }
    }

    /// Whether this is a network-level fault, as opposed to an answer the
    /// server actually produced. Only these qualify for
    /// `PollOptions::retry_on_transport_error`.
    pub fn is_transport(&self) -> bool {
        matches!(self, AtlasError::Http(_))
    }
}
