//! CLI error types with miette diagnostics.
//!
//! Maps config and core errors into user-facing errors with help text.

use miette::Diagnostic;
use thiserror::Error;

use netatmo_config::ConfigError;
use netatmo_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────

    #[error("Configuration file not found: {path}")]
    #[diagnostic(
        code(netatmo::no_config),
        help(
            "Create it with a [netatmo] block holding api_key, secret_key,\n\
             username and password, or point --config at another file."
        )
    )]
    NoConfig { path: String },

    #[error("Invalid configuration in {path}: {source}")]
    #[diagnostic(
        code(netatmo::config),
        help("Values can also be set as NETATMO_HUB_NETATMO__<FIELD> environment variables.")
    )]
    Config {
        path: String,
        #[source]
        source: ConfigError,
    },

    // ── Setup / authentication ───────────────────────────────────────

    #[error("Unable to connect to Netatmo API")]
    #[diagnostic(
        code(netatmo::setup_failed),
        help("Check the credentials and network access; run with -v for details.")
    )]
    SetupFailed,

    #[error("Authentication failed: {message}")]
    #[diagnostic(code(netatmo::auth_failed))]
    AuthFailed { message: String },

    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to {url}: {reason}")]
    #[diagnostic(code(netatmo::connection_failed))]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(netatmo::timeout),
        help("Raise `timeout` in the [netatmo] block.")
    )]
    Timeout,

    // ── Lookups ──────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(netatmo::not_found),
        help("Run: netatmo cameras to see what the account holds")
    )]
    NotFound {
        resource_type: &'static str,
        identifier: String,
    },

    #[error("No camera found on this account")]
    #[diagnostic(code(netatmo::no_device))]
    NoDevice,

    // ── API ──────────────────────────────────────────────────────────

    #[error("API error: {message}")]
    #[diagnostic(code(netatmo::api_error))]
    Api { message: String },
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoConfig { .. } | Self::Config { .. } => exit_code::USAGE,
            Self::SetupFailed | Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::NoDevice => exit_code::NOT_FOUND,
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Api { .. } => exit_code::GENERAL,
        }
    }

    pub fn from_config(path: &std::path::Path, err: ConfigError) -> Self {
        let path = path.display().to_string();
        match err {
            ConfigError::Io(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Self::NoConfig { path }
            }
            source => Self::Config { path, source },
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::AuthenticationFailed { message } => Self::AuthFailed { message },
            CoreError::Timeout => Self::Timeout,
            CoreError::NoDevice => Self::NoDevice,
            CoreError::HomeNotFound { name } => Self::NotFound {
                resource_type: "home",
                identifier: name,
            },
            CoreError::CameraNotFound { name } => Self::NotFound {
                resource_type: "camera",
                identifier: name,
            },
            CoreError::NotLoaded => Self::Api {
                message: "camera listing has not been fetched".into(),
            },
            CoreError::Unsupported { operation } => Self::Api {
                message: format!("unsupported: {operation}"),
            },
            CoreError::Api {
                message,
                code,
                status,
            } => Self::Api {
                message: match (code, status) {
                    (Some(code), _) => format!("{message} (code {code})"),
                    (None, Some(status)) => format!("{message} (HTTP {status})"),
                    (None, None) => message,
                },
            },
            CoreError::Internal(message) => Self::Api { message },
        }
    }
}
