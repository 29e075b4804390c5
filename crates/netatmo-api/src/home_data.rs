// Camera home data
//
// `HomeData` is one `gethomedata` response indexed for lookups:
// homes -> cameras by home name, modules by id (tagged with their parent
// camera), and events split into indoor and outdoor logs. Event updates
// produce a separate `EventSnapshot` and leave the listing untouched.

use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;
use secrecy::ExposeSecret;
use tracing::debug;

use crate::auth::ClientAuth;
use crate::error::Error;
use crate::models::{
    Camera, CameraType, Event, EventsUntilBody, Home, HomeDataBody, Module, Person,
};

const HOME_DATA_PATH: &str = "api/gethomedata";
const EVENTS_UNTIL_PATH: &str = "api/geteventsuntil";

/// Events per camera id, ordered by event time.
pub type EventLog = BTreeMap<String, BTreeMap<i64, Event>>;

/// Indexed snapshot of every home, camera and module on the account.
#[derive(Debug, Clone)]
pub struct HomeData {
    /// Homes by id, in API order.
    homes: IndexMap<String, Home>,
    /// Cameras by id, grouped by home name.
    cameras: IndexMap<String, IndexMap<String, Camera>>,
    /// Indoor camera modules by id, with `cam_id` filled in.
    modules: IndexMap<String, Module>,
    persons: HashMap<String, Person>,
    events: EventLog,
    outdoor_events: EventLog,
}

impl HomeData {
    /// Fetch the camera listing, asking for at most `size` events per home.
    ///
    /// `POST api/gethomedata`
    pub async fn fetch(auth: &ClientAuth, size: u32) -> Result<Self, Error> {
        let token = auth.access_token().await?;
        let size = size.to_string();
        let body: HomeDataBody = auth
            .client()
            .post_api(
                HOME_DATA_PATH,
                &[("access_token", token.expose_secret()), ("size", &size)],
            )
            .await?;
        debug!(homes = body.homes.len(), "home data fetched");
        Self::from_homes(body.homes)
    }

    /// Index a list of homes. An empty list means there is no camera
    /// on the account.
    pub fn from_homes(homes: Vec<Home>) -> Result<Self, Error> {
        if homes.is_empty() {
            return Err(Error::NoDevice);
        }

        let mut data = Self {
            homes: IndexMap::new(),
            cameras: IndexMap::new(),
            modules: IndexMap::new(),
            persons: HashMap::new(),
            events: EventLog::new(),
            outdoor_events: EventLog::new(),
        };

        for home in homes {
            let by_id = data.cameras.entry(home.name.clone()).or_default();
            for camera in &home.cameras {
                if camera.camera_type == CameraType::Indoor {
                    for module in &camera.modules {
                        let mut module = module.clone();
                        module.cam_id = Some(camera.id.clone());
                        data.modules.insert(module.id.clone(), module);
                    }
                }
                by_id.insert(camera.id.clone(), camera.clone());
            }
            for person in &home.persons {
                data.persons.insert(person.id.clone(), person.clone());
            }
            for event in &home.events {
                let log = if event.is_outdoor() {
                    &mut data.outdoor_events
                } else {
                    &mut data.events
                };
                insert_event(log, event.clone());
            }
            data.homes.insert(home.id.clone(), home);
        }

        Ok(data)
    }

    // ── Lookups ──────────────────────────────────────────────────────

    /// Homes by id, in API order.
    pub fn homes(&self) -> &IndexMap<String, Home> {
        &self.homes
    }

    /// Cameras by id, grouped by home name.
    pub fn cameras(&self) -> &IndexMap<String, IndexMap<String, Camera>> {
        &self.cameras
    }

    /// Indoor camera modules by id.
    pub fn modules(&self) -> &IndexMap<String, Module> {
        &self.modules
    }

    pub fn persons(&self) -> &HashMap<String, Person> {
        &self.persons
    }

    /// Name of the first home returned by the API.
    pub fn default_home(&self) -> Option<&str> {
        self.homes.values().next().map(|h| h.name.as_str())
    }

    /// Look a home up by name; `None` picks the default home.
    pub fn home_by_name(&self, name: Option<&str>) -> Option<&Home> {
        let name = name.or_else(|| self.default_home())?;
        self.homes.values().find(|h| h.name == name)
    }

    pub fn camera_by_id(&self, id: &str) -> Option<&Camera> {
        self.cameras.values().find_map(|cams| cams.get(id))
    }

    /// Resolve a camera by name and/or home name.
    ///
    /// - neither: the first camera of the default home
    /// - home only: the first camera of that home
    /// - camera only: the first camera with that name in any home
    /// - both: the camera with that name in that home
    pub fn camera_by_name(&self, camera: Option<&str>, home: Option<&str>) -> Option<&Camera> {
        match (camera, home) {
            (None, None) => self
                .default_home()
                .and_then(|h| self.cameras.get(h))
                .and_then(|cams| cams.values().next()),
            (None, Some(home)) => self.cameras.get(home)?.values().next(),
            (Some(name), None) => self
                .cameras
                .values()
                .flat_map(IndexMap::values)
                .find(|c| c.name == name),
            (Some(name), Some(home)) => self.cameras.get(home)?.values().find(|c| c.name == name),
        }
    }

    /// Type of the camera resolved by [`camera_by_name`](Self::camera_by_name).
    pub fn camera_type(&self, camera: Option<&str>, home: Option<&str>) -> Option<CameraType> {
        self.camera_by_name(camera, home).map(|c| c.camera_type)
    }

    /// Events from the listing for a camera type.
    pub fn events(&self, camera_type: CameraType) -> Option<&EventLog> {
        match camera_type {
            CameraType::Indoor => Some(&self.events),
            CameraType::Outdoor => Some(&self.outdoor_events),
            CameraType::Unknown => None,
        }
    }

    // ── Event updates ────────────────────────────────────────────────

    /// Fetch events newer than the ones in this listing for `camera_type`.
    ///
    /// The request starts from the oldest of the per-camera last events, so
    /// every camera catches up. When the listing has no events for that
    /// type there is nothing to anchor on and no request is made.
    ///
    /// `POST api/geteventsuntil`
    pub async fn fetch_events(
        &self,
        auth: &ClientAuth,
        camera_type: CameraType,
        home: Option<&str>,
    ) -> Result<EventSnapshot, Error> {
        let base = self
            .events(camera_type)
            .ok_or(Error::UnsupportedOperation(
                "event updates need an indoor or outdoor camera type",
            ))?;
        let mut snapshot = EventSnapshot {
            camera_type,
            events: base.clone(),
        };

        let Some(anchor) = snapshot.oldest_last_event().map(|e| e.id.clone()) else {
            debug!(%camera_type, "no events to update from");
            return Ok(snapshot);
        };

        let home = self.home_by_name(home).ok_or_else(|| Error::UnknownHome {
            name: home.unwrap_or_default().to_owned(),
        })?;

        let token = auth.access_token().await?;
        let body: EventsUntilBody = auth
            .client()
            .post_api(
                EVENTS_UNTIL_PATH,
                &[
                    ("access_token", token.expose_secret()),
                    ("home_id", &home.id),
                    ("event_id", &anchor),
                ],
            )
            .await?;
        debug!(%camera_type, fetched = body.events_list.len(), "events fetched");

        let outdoor = camera_type == CameraType::Outdoor;
        for event in body.events_list {
            if event.is_outdoor() == outdoor {
                insert_event(&mut snapshot.events, event);
            }
        }
        Ok(snapshot)
    }
}

fn insert_event(log: &mut EventLog, event: Event) {
    log.entry(event.camera_id.clone())
        .or_default()
        .insert(event.time, event);
}

// ── Event snapshot ───────────────────────────────────────────────────

/// Events for one camera type as of the last event update.
#[derive(Debug, Clone)]
pub struct EventSnapshot {
    camera_type: CameraType,
    events: EventLog,
}

impl EventSnapshot {
    pub fn camera_type(&self) -> CameraType {
        self.camera_type
    }

    /// All events per camera id.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Most recent event of one camera.
    pub fn last_event(&self, camera_id: &str) -> Option<&Event> {
        self.events
            .get(camera_id)
            .and_then(|log| log.values().next_back())
    }

    /// Most recent event of every camera.
    pub fn last_events(&self) -> impl Iterator<Item = (&str, &Event)> {
        self.events
            .iter()
            .filter_map(|(cam, log)| log.values().next_back().map(|e| (cam.as_str(), e)))
    }

    /// Total number of events across cameras.
    pub fn len(&self) -> usize {
        self.events.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn oldest_last_event(&self) -> Option<&Event> {
        self.last_events().map(|(_, e)| e).min_by_key(|e| e.time)
    }
}
