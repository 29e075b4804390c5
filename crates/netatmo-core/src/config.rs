// ── Runtime integration configuration ──
//
// These types describe how to reach the Netatmo API and whether to announce
// platforms. They carry credential data but never touch disk: the config
// crate (or a test) builds a `HubConfig` and hands it to `setup`.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use netatmo_api::{Credentials, DEFAULT_BASE_URL, TransportConfig};

/// Validated `netatmo` configuration block.
#[derive(Debug, Clone)]
pub struct NetatmoConfig {
    /// OAuth client id of the Netatmo app.
    pub api_key: String,
    /// OAuth client secret of the Netatmo app.
    pub secret_key: SecretString,
    pub username: String,
    pub password: SecretString,
    /// Announce the camera/sensor/binary_sensor/climate platforms after setup.
    pub discovery: bool,
    /// API root.
    pub base_url: Url,
    /// Request timeout.
    pub timeout: Duration,
}

impl NetatmoConfig {
    /// Credentials with discovery on and the default endpoint and timeout.
    pub fn new(
        api_key: impl Into<String>,
        secret_key: SecretString,
        username: impl Into<String>,
        password: SecretString,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key,
            username: username.into(),
            password,
            discovery: true,
            base_url: default_base_url(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            client_id: self.api_key.clone(),
            client_secret: self.secret_key.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig::default().with_timeout(self.timeout)
    }
}

/// The production endpoint as a parsed URL.
pub fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("DEFAULT_BASE_URL is a valid URL")
}

/// Everything setup needs: the typed `netatmo` block plus the full
/// configuration it came from, which is forwarded to discovered platforms.
#[derive(Debug, Clone)]
pub struct HubConfig {
    pub netatmo: NetatmoConfig,
    pub raw: Arc<serde_json::Value>,
}

impl HubConfig {
    pub fn new(netatmo: NetatmoConfig, raw: serde_json::Value) -> Self {
        Self {
            netatmo,
            raw: Arc::new(raw),
        }
    }
}
