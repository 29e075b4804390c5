// ── Core error types ──
//
// Errors surfaced by the camera data cache and setup. Consumers never see
// HTTP status codes or JSON parse failures directly; the
// `From<netatmo_api::Error>` impl translates transport-layer errors into
// domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to Netatmo API at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Netatmo API request timed out")]
    Timeout,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("No camera available on this account")]
    NoDevice,

    #[error("Home not found: {name}")]
    HomeNotFound { name: String },

    #[error("Camera not found: {name}")]
    CameraNotFound { name: String },

    #[error("Camera data has not been fetched yet")]
    NotLoaded,

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Operation not supported: {operation}")]
    Unsupported { operation: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// Netatmo error code from the `{"error": {"code": N}}` body.
        code: Option<i64>,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<netatmo_api::Error> for CoreError {
    fn from(err: netatmo_api::Error) -> Self {
        match err {
            netatmo_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            netatmo_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            netatmo_api::Error::InvalidUrl(e) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("Invalid URL: {e}"),
            },
            netatmo_api::Error::Http { status, body } => CoreError::Api {
                message: body,
                code: None,
                status: Some(status),
            },
            netatmo_api::Error::Api { code, message } => CoreError::Api {
                message,
                code: Some(code),
                status: None,
            },
            netatmo_api::Error::NoDevice => CoreError::NoDevice,
            netatmo_api::Error::UnknownHome { name } => CoreError::HomeNotFound { name },
            netatmo_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
            netatmo_api::Error::UnsupportedOperation(op) => CoreError::Unsupported {
                operation: op.to_string(),
            },
        }
    }
}
