use thiserror::Error;

/// Top-level error type for the `netatmo-api` crate.
///
/// Covers every failure mode of the calls this client makes:
/// OAuth authentication, transport, the `{status, body}` API envelope,
/// and home-data lookups. `netatmo-core` maps these into domain errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Token grant rejected, or the API refused the access token.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Non-success HTTP status without a recognizable error body.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    // ── API ─────────────────────────────────────────────────────────
    /// Structured error from the API (`{"error": {"code": N, "message": "..."}}`).
    #[error("Netatmo API error {code}: {message}")]
    Api { code: i64, message: String },

    /// The account has no home with a camera attached.
    #[error("No camera available")]
    NoDevice,

    /// A home name did not match anything in the fetched home data.
    #[error("Unknown home: {name}")]
    UnknownHome { name: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// Operation not supported for the given input.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(&'static str),
}

impl Error {
    /// Returns `true` if the access token was rejected and a new
    /// authentication might resolve it.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
