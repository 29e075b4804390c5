// netatmo-api: Async Rust client for the Netatmo cloud API (auth + camera home data)

pub mod auth;
pub mod client;
pub mod error;
pub mod home_data;
pub mod models;
pub mod transport;

pub use auth::{ClientAuth, Credentials};
pub use client::{DEFAULT_BASE_URL, NetatmoClient};
pub use error::Error;
pub use home_data::{EventLog, EventSnapshot, HomeData};
pub use models::{Camera, CameraType, Event, Home, Module, Person};
pub use transport::TransportConfig;
