//! Configuration for the Netatmo hub.
//!
//! A TOML file with a `[netatmo]` block, overridden by `NETATMO_HUB_*`
//! environment variables (`__` separates nesting levels), validated and
//! translated to `netatmo_core::HubConfig`. Keys outside the required set
//! are carried through untouched in `HubConfig::raw`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use netatmo_core::{HubConfig, NetatmoConfig, default_base_url};

/// Prefix of environment overrides, e.g. `NETATMO_HUB_NETATMO__PASSWORD`.
pub const ENV_PREFIX: &str = "NETATMO_HUB_";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Keys whose environment values are taken verbatim instead of being typed
/// by content (`0123` must stay `"0123"`).
const VERBATIM_ENV_KEYS: [&str; 4] = [
    "netatmo.api_key",
    "netatmo.secret_key",
    "netatmo.username",
    "netatmo.password",
];

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required field '{field}'")]
    MissingField { field: String },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Raw config structs ──────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    netatmo: Option<NetatmoSection>,
}

/// The `[netatmo]` block as written. Everything is optional here so that
/// absent keys surface as `MissingField` rather than a parse error.
#[derive(Debug, Default, Deserialize)]
struct NetatmoSection {
    api_key: Option<String>,
    secret_key: Option<String>,
    username: Option<String>,
    password: Option<String>,
    discovery: Option<Scalar>,
    base_url: Option<String>,
    timeout: Option<u64>,
}

/// A `discovery` value as figment hands it over. Environment values are
/// typed by their content, so `1` arrives as an integer.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => s,
        }
    }

    /// Lenient boolean: `true`/`false`, integers (non-zero is true) and
    /// `yes/no`, `on/off`, `enable/disable`, `1/0` in any case.
    /// Floats are rejected on purpose, unlike a plain truthiness check.
    fn to_flag(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Int(i) => Some(*i != 0),
            Self::Float(_) => None,
            Self::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" | "enable" => Some(true),
                "0" | "false" | "no" | "off" | "disable" => Some(false),
                _ => None,
            },
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "netatmo-hub", "netatmo-hub").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("netatmo-hub");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load and validate the config file at `path`, with environment overrides.
pub fn load_config(path: &Path) -> Result<HubConfig, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    load_config_str(&contents)
}

/// Load and validate TOML text, with environment overrides.
pub fn load_config_str(toml: &str) -> Result<HubConfig, ConfigError> {
    let env = Env::prefixed(ENV_PREFIX).split("__");

    let mut figment = Figment::new()
        .merge(Toml::string(toml))
        .merge(env.clone().filter(|key| !is_verbatim_key(key.as_str())));
    for (key, value) in env.iter() {
        let key = key.as_str().to_ascii_lowercase();
        if is_verbatim_key(&key) {
            figment = figment.merge(Serialized::default(&key, value));
        }
    }
    from_figment(&figment)
}

fn is_verbatim_key(key: &str) -> bool {
    VERBATIM_ENV_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

/// Validate whatever `figment` has merged.
pub fn from_figment(figment: &Figment) -> Result<HubConfig, ConfigError> {
    let raw: serde_json::Value = figment.extract()?;
    let file: ConfigFile = figment.extract()?;
    let section = file.netatmo.ok_or_else(|| ConfigError::MissingField {
        field: "netatmo".into(),
    })?;

    let netatmo = section.validate()?;
    Ok(HubConfig::new(netatmo, raw))
}

impl NetatmoSection {
    fn validate(self) -> Result<NetatmoConfig, ConfigError> {
        let api_key = required("api_key", self.api_key)?;
        let secret_key = required("secret_key", self.secret_key)?;
        let username = required("username", self.username)?;
        let password = required("password", self.password)?;

        let mut config = NetatmoConfig::new(
            api_key,
            SecretString::from(secret_key),
            username,
            SecretString::from(password),
        );

        if let Some(flag) = self.discovery {
            config.discovery = flag.to_flag().ok_or_else(|| ConfigError::Validation {
                field: "netatmo.discovery".into(),
                reason: format!("expected a boolean, got '{}'", flag.into_text()),
            })?;
        }

        config.base_url = match self.base_url {
            Some(raw) => Url::parse(&raw).map_err(|e| ConfigError::Validation {
                field: "netatmo.base_url".into(),
                reason: format!("invalid URL '{raw}': {e}"),
            })?,
            None => default_base_url(),
        };

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout == 0 {
            return Err(ConfigError::Validation {
                field: "netatmo.timeout".into(),
                reason: "must be at least one second".into(),
            });
        }
        config.timeout = Duration::from_secs(timeout);

        Ok(config)
    }
}

fn required(name: &str, value: Option<String>) -> Result<String, ConfigError> {
    let field = format!("netatmo.{name}");
    let value = value.ok_or_else(|| ConfigError::MissingField {
        field: field.clone(),
    })?;
    if value.trim().is_empty() {
        return Err(ConfigError::Validation {
            field,
            reason: "must not be empty".into(),
        });
    }
    Ok(value)
}
