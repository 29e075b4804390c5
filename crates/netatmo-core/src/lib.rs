//! Netatmo integration core: the layer between `netatmo-api` and the hub.
//!
//! - **[`setup`]** authenticates once, stores the session and a
//!   [`CameraData`] cache in the [`Hub`], then announces the `camera`,
//!   `sensor`, `binary_sensor` and `climate` platforms.
//!
//! - **[`CameraData`]** caches the latest home listing and event snapshot.
//!   Each refresh sits behind its own [`Throttle`] (10 minutes for the
//!   listing, 10 seconds for events); throttled calls are silent no-ops.
//!
//! - **[`Hub`]** is the host side: typed shared data plus a broadcast
//!   channel of [`PlatformDiscovery`] requests. Platforms resolve what they
//!   need through [`NetatmoContext::from_hub`].

pub mod camera_data;
pub mod config;
pub mod error;
pub mod hub;
pub mod setup;
pub mod throttle;

// ── Primary re-exports ──────────────────────────────────────────────
pub use camera_data::{
    CameraData, LISTING_SIZE, MIN_TIME_BETWEEN_EVENT_UPDATES, MIN_TIME_BETWEEN_UPDATES,
};
pub use config::{HubConfig, NetatmoConfig, default_base_url};
pub use error::CoreError;
pub use hub::{Hub, HubData, Platform, PlatformDiscovery};
pub use setup::{
    DOMAIN, NETATMO_AUTH, NETATMO_CAMERA_DATA, NetatmoContext, PLATFORMS, SCOPE, SharedCameraData,
    setup,
};
pub use throttle::{Clock, SystemClock, Throttle};

// API types that appear in this crate's public signatures.
pub use netatmo_api::{CameraType, ClientAuth, EventSnapshot, HomeData};
