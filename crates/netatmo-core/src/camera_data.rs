// ── Camera data cache ──
//
// Holds the session plus the latest home listing and event snapshot.
// Both refreshes are guarded by their own `Throttle`; a throttled call
// returns Ok(()) and leaves the cached value in place.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use netatmo_api::{CameraType, ClientAuth, EventSnapshot, HomeData};

use crate::error::CoreError;
use crate::throttle::{Clock, SystemClock, Throttle};

/// Maximum events per home requested with each listing.
pub const LISTING_SIZE: u32 = 100;

pub const MIN_TIME_BETWEEN_UPDATES: Duration = Duration::from_secs(10 * 60);
pub const MIN_TIME_BETWEEN_EVENT_UPDATES: Duration = Duration::from_secs(10);

/// Latest camera data from Netatmo, shared by the camera platforms.
#[derive(Debug)]
pub struct CameraData {
    auth: Arc<ClientAuth>,
    home_data: Option<HomeData>,
    events: Option<EventSnapshot>,
    /// Camera type (and home) from the last type lookup; drives event updates.
    camera_type: Option<CameraType>,
    camera_home: Option<String>,
    update_throttle: Throttle,
    event_throttle: Throttle,
}

impl CameraData {
    pub fn new(auth: Arc<ClientAuth>) -> Self {
        Self::with_clock(auth, Arc::new(SystemClock))
    }

    /// Build with a custom clock driving both throttles.
    pub fn with_clock(auth: Arc<ClientAuth>, clock: Arc<dyn Clock>) -> Self {
        Self {
            auth,
            home_data: None,
            events: None,
            camera_type: None,
            camera_home: None,
            update_throttle: Throttle::with_clock(MIN_TIME_BETWEEN_UPDATES, Arc::clone(&clock)),
            event_throttle: Throttle::with_clock(MIN_TIME_BETWEEN_EVENT_UPDATES, clock),
        }
    }

    /// The cached listing, if one has been fetched.
    pub fn home_data(&self) -> Option<&HomeData> {
        self.home_data.as_ref()
    }

    /// The cached event snapshot, if one has been fetched.
    pub fn events(&self) -> Option<&EventSnapshot> {
        self.events.as_ref()
    }

    /// Camera type remembered by the last [`get_camera_type`](Self::get_camera_type).
    pub fn camera_type(&self) -> Option<CameraType> {
        self.camera_type
    }

    // ── Refresh ──────────────────────────────────────────────────────

    /// Refresh the home listing, at most once per [`MIN_TIME_BETWEEN_UPDATES`].
    pub async fn update(&mut self) -> Result<(), CoreError> {
        if !self.update_throttle.is_ready() {
            debug!(interval = ?self.update_throttle.interval(), "home data refresh throttled");
            return Ok(());
        }
        self.fetch_listing().await
    }

    /// Refresh the home listing regardless of the throttle.
    pub async fn force_update(&mut self) -> Result<(), CoreError> {
        self.fetch_listing().await
    }

    async fn fetch_listing(&mut self) -> Result<(), CoreError> {
        let data = HomeData::fetch(&self.auth, LISTING_SIZE).await?;
        self.home_data = Some(data);
        self.update_throttle.record_success();
        Ok(())
    }

    /// Refresh events for the remembered camera type, at most once per
    /// [`MIN_TIME_BETWEEN_EVENT_UPDATES`].
    ///
    /// Without a remembered type the default camera's type is used.
    pub async fn update_event(&mut self) -> Result<(), CoreError> {
        if !self.event_throttle.is_ready() {
            debug!(interval = ?self.event_throttle.interval(), "event refresh throttled");
            return Ok(());
        }
        if self.home_data.is_none() {
            self.force_update().await?;
        }

        let listing = self.listing()?;
        let camera_type = match self.camera_type {
            Some(t) => t,
            None => listing
                .camera_type(None, None)
                .ok_or_else(|| CoreError::CameraNotFound {
                    name: "<default>".into(),
                })?,
        };
        let snapshot = listing
            .fetch_events(&self.auth, camera_type, self.camera_home.as_deref())
            .await?;

        debug!(%camera_type, events = snapshot.len(), "event snapshot replaced");
        self.camera_type = Some(camera_type);
        self.events = Some(snapshot);
        self.event_throttle.record_success();
        Ok(())
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Names of all cameras, or of one home's cameras. Refreshes the
    /// listing first (throttled).
    pub async fn get_camera_names(&mut self, home: Option<&str>) -> Result<Vec<String>, CoreError> {
        self.update().await?;
        let listing = self.listing()?;

        match home.filter(|h| !h.is_empty()) {
            None => Ok(listing
                .cameras()
                .values()
                .flat_map(|cams| cams.values())
                .map(|c| c.name.clone())
                .collect()),
            Some(home) => listing
                .cameras()
                .get(home)
                .map(|cams| cams.values().map(|c| c.name.clone()).collect())
                .ok_or_else(|| CoreError::HomeNotFound { name: home.into() }),
        }
    }

    /// Names of the modules paired with a camera. Refreshes the listing
    /// first (throttled).
    pub async fn get_module_names(
        &mut self,
        camera: &str,
        home: Option<&str>,
    ) -> Result<Vec<String>, CoreError> {
        self.update().await?;
        let listing = self.listing()?;

        let cam_id = listing
            .camera_by_name(Some(camera), home.filter(|h| !h.is_empty()))
            .map(|c| c.id.as_str())
            .ok_or_else(|| CoreError::CameraNotFound {
                name: camera.into(),
            })?;

        Ok(listing
            .modules()
            .values()
            .filter(|m| m.cam_id.as_deref() == Some(cam_id))
            .map(|m| m.name.clone())
            .collect())
    }

    /// Type of the named (or default) camera, from the cached listing.
    ///
    /// Does not refresh. The result is remembered for [`update_event`](Self::update_event).
    pub fn get_camera_type(
        &mut self,
        camera: Option<&str>,
        home: Option<&str>,
    ) -> Result<Option<CameraType>, CoreError> {
        let home = home.filter(|h| !h.is_empty());
        let camera_type = self.listing()?.camera_type(camera, home);
        if camera_type.is_some() {
            self.camera_type = camera_type;
            self.camera_home = home.map(str::to_owned);
        }
        Ok(camera_type)
    }

    fn listing(&self) -> Result<&HomeData, CoreError> {
        self.home_data.as_ref().ok_or(CoreError::NotLoaded)
    }
}
