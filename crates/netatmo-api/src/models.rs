// Home data response types
//
// Models for `api/gethomedata` and `api/geteventsuntil`. Fields use
// `#[serde(default)]` liberally because the API omits fields depending on
// camera model and firmware; anything not modelled lands in `extra`.

use serde::{Deserialize, Serialize};

// ── Camera type ──────────────────────────────────────────────────────

/// Camera model family, as reported in the `type` field.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::AsRefStr,
)]
pub enum CameraType {
    /// Indoor camera ("Welcome").
    #[serde(rename = "NACamera")]
    #[strum(serialize = "NACamera")]
    Indoor,
    /// Outdoor camera ("Presence").
    #[serde(rename = "NOC")]
    #[strum(serialize = "NOC")]
    Outdoor,
    #[serde(other)]
    #[strum(serialize = "unknown")]
    Unknown,
}

// ── Home ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Home {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub persons: Vec<Person>,
    #[serde(default)]
    pub cameras: Vec<Camera>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub camera_type: CameraType,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub sd_status: Option<String>,
    #[serde(default)]
    pub alim_status: Option<String>,
    #[serde(default)]
    pub vpn_url: Option<String>,
    #[serde(default)]
    pub is_local: Option<bool>,
    /// Accessories paired with an indoor camera (door tags, sirens).
    #[serde(default)]
    pub modules: Vec<Module>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub module_type: String,
    #[serde(default)]
    pub battery_percent: Option<u8>,
    #[serde(default)]
    pub status: Option<String>,
    /// Id of the camera this module is paired with. Not sent by the API;
    /// filled in from the owning camera when home data is indexed.
    #[serde(default)]
    pub cam_id: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    #[serde(default)]
    pub pseudo: Option<String>,
    #[serde(default)]
    pub last_seen: Option<i64>,
    #[serde(default)]
    pub out_of_sight: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A camera event. `time` is a unix timestamp in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub time: i64,
    pub camera_id: String,
    #[serde(default)]
    pub person_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub video_id: Option<String>,
    #[serde(default)]
    pub video_status: Option<String>,
    #[serde(default)]
    pub is_arrival: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Event {
    /// Outdoor cameras report every event with type `"outdoor"`.
    pub fn is_outdoor(&self) -> bool {
        self.event_type == "outdoor"
    }
}

// ── Endpoint bodies ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct HomeDataBody {
    #[serde(default)]
    pub homes: Vec<Home>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EventsUntilBody {
    #[serde(default)]
    pub events_list: Vec<Event>,
}
