//! Shared fixtures for the core integration tests: a controllable clock
//! and a wiremock-backed Netatmo API.
#![allow(dead_code, clippy::unwrap_used)]

use std::sync::{Arc, RwLock};

use chrono::{DateTime, TimeDelta, Utc};
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use netatmo_api::{ClientAuth, NetatmoClient, TransportConfig};
use netatmo_core::{Clock, HubConfig, NetatmoConfig};

// ── Time ────────────────────────────────────────────────────────────

/// A clock that only moves when told to.
#[derive(Clone)]
pub struct MockTime {
    current: Arc<RwLock<DateTime<Utc>>>,
}

impl MockTime {
    pub fn new() -> Self {
        Self {
            current: Arc::new(RwLock::new(Utc::now())),
        }
    }

    pub fn advance(&self, by: TimeDelta) {
        let mut current = self.current.write().unwrap();
        *current += by;
    }

    pub fn advance_seconds(&self, seconds: i64) {
        self.advance(TimeDelta::seconds(seconds));
    }

    pub fn advance_minutes(&self, minutes: i64) {
        self.advance(TimeDelta::minutes(minutes));
    }
}

impl Clock for MockTime {
    fn now(&self) -> DateTime<Utc> {
        *self.current.read().unwrap()
    }
}

// ── Config ──────────────────────────────────────────────────────────

pub fn netatmo_config(server: &MockServer) -> NetatmoConfig {
    let mut config = NetatmoConfig::new(
        "client-id",
        SecretString::from("client-secret".to_string()),
        "user@example.com",
        SecretString::from("hunter2".to_string()),
    );
    config.base_url = Url::parse(&server.uri()).unwrap();
    config
}

pub fn hub_config(server: &MockServer) -> HubConfig {
    HubConfig::new(
        netatmo_config(server),
        json!({
            "netatmo": { "api_key": "client-id", "discovery": true },
            "logger": { "default": "info" }
        }),
    )
}

// ── API mocks ───────────────────────────────────────────────────────

pub async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(body_string_contains("grant_type=password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-1",
            "refresh_token": "refresh-1",
            "expires_in": 10_800,
            "scope": ["read_camera", "access_camera"]
        })))
        .mount(server)
        .await;
}

/// Two homes: "Maison" with an indoor camera (two modules) and an
/// outdoor camera, "Chalet" with one indoor camera (one module).
pub fn home_data_body() -> serde_json::Value {
    json!({
        "status": "ok",
        "body": {
            "homes": [
                {
                    "id": "home-1",
                    "name": "Maison",
                    "cameras": [
                        {
                            "id": "cam-a",
                            "name": "Salon",
                            "type": "NACamera",
                            "modules": [
                                { "id": "tag-1", "name": "Porte", "type": "NACamDoorTag" },
                                { "id": "siren-1", "name": "Sirene", "type": "NIS" }
                            ]
                        },
                        { "id": "cam-b", "name": "Jardin", "type": "NOC" }
                    ],
                    "events": [
                        { "id": "e1", "type": "movement", "time": 100, "camera_id": "cam-a" },
                        { "id": "e2", "type": "outdoor", "time": 110, "camera_id": "cam-b" }
                    ]
                },
                {
                    "id": "home-2",
                    "name": "Chalet",
                    "cameras": [
                        {
                            "id": "cam-c",
                            "name": "Entree",
                            "type": "NACamera",
                            "modules": [
                                { "id": "tag-2", "name": "Fenetre", "type": "NACamDoorTag" }
                            ]
                        }
                    ]
                }
            ]
        }
    })
}

pub async fn mount_home_data(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/gethomedata"))
        .respond_with(ResponseTemplate::new(200).set_body_json(home_data_body()))
        .mount(server)
        .await;
}

pub async fn mount_events_until(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/geteventsuntil"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "body": {
                "events_list": [
                    { "id": "e3", "type": "person", "time": 300, "camera_id": "cam-a" }
                ]
            }
        })))
        .mount(server)
        .await;
}

/// Log in against the mock server.
pub async fn auth(server: &MockServer) -> Arc<ClientAuth> {
    mount_login(server).await;
    let client =
        NetatmoClient::new(Url::parse(&server.uri()).unwrap(), &TransportConfig::default())
            .unwrap();
    let config = netatmo_config(server);
    Arc::new(
        ClientAuth::authenticate(client, config.credentials(), "read_camera access_camera")
            .await
            .unwrap(),
    )
}

/// How many requests the server has seen for `endpoint`.
pub async fn request_count(server: &MockServer, endpoint: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == endpoint)
        .count()
}
