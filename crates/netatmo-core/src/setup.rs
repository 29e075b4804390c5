// ── Integration setup ──
//
// Authenticate once, publish the session and the camera data cache into
// the hub, then announce the dependent platforms.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info};

use netatmo_api::{ClientAuth, NetatmoClient};

use crate::camera_data::CameraData;
use crate::config::HubConfig;
use crate::hub::{Hub, Platform};

pub const DOMAIN: &str = "netatmo";

/// Hub data key of the `ClientAuth` session.
pub const NETATMO_AUTH: &str = "netatmo_auth";
/// Hub data key of the shared `CameraData`.
pub const NETATMO_CAMERA_DATA: &str = "netatmo_camera_data";

/// OAuth scope requested at login.
pub const SCOPE: &str = "read_station read_camera access_camera read_thermostat write_thermostat read_presence access_presence";

pub const PLATFORMS: [Platform; 4] = [
    Platform::Camera,
    Platform::Sensor,
    Platform::BinarySensor,
    Platform::Climate,
];

/// Camera data as shared between platforms. Callers lock around each
/// refresh-and-read sequence.
pub type SharedCameraData = Arc<Mutex<CameraData>>;

/// What a Netatmo platform needs, resolved from the hub once.
#[derive(Debug, Clone)]
pub struct NetatmoContext {
    pub auth: Arc<ClientAuth>,
    pub camera_data: SharedCameraData,
}

impl NetatmoContext {
    /// `None` until [`setup`] has succeeded on this hub.
    pub fn from_hub(hub: &Hub) -> Option<Self> {
        Some(Self {
            auth: hub.data().get::<ClientAuth>(NETATMO_AUTH)?,
            camera_data: hub.data().get::<Mutex<CameraData>>(NETATMO_CAMERA_DATA)?,
        })
    }
}

/// Set up the Netatmo integration.
///
/// Returns `false` (after logging) when the API cannot be reached or the
/// credentials are rejected; nothing is stored in that case.
pub async fn setup(hub: &Hub, config: &HubConfig) -> bool {
    let netatmo = &config.netatmo;

    let client = match NetatmoClient::new(netatmo.base_url.clone(), &netatmo.transport()) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Unable to connect to Netatmo API");
            return false;
        }
    };

    let auth = match ClientAuth::authenticate(client, netatmo.credentials(), SCOPE).await {
        Ok(auth) => Arc::new(auth),
        Err(e) => {
            error!(error = %e, "Unable to connect to Netatmo API");
            return false;
        }
    };

    let camera_data = Arc::new(Mutex::new(CameraData::new(Arc::clone(&auth))));
    hub.data().insert(NETATMO_AUTH, auth);
    hub.data().insert(NETATMO_CAMERA_DATA, camera_data);
    info!("Netatmo integration set up");

    if netatmo.discovery {
        for platform in PLATFORMS {
            hub.load_platform(platform, DOMAIN, serde_json::Map::new(), &config.raw);
        }
    }

    true
}
