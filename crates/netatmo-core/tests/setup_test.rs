#![allow(clippy::unwrap_used)]

mod common;

use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::sync::broadcast::error::TryRecvError;
use url::Url;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use netatmo_core::{
    ClientAuth, DOMAIN, Hub, NETATMO_AUTH, NETATMO_CAMERA_DATA, NetatmoContext, PLATFORMS, Platform,
    setup,
};

#[tokio::test]
async fn setup_stores_session_and_camera_data() {
    let server = MockServer::start().await;
    common::mount_login(&server).await;
    let hub = Hub::new();

    assert!(setup(&hub, &common::hub_config(&server)).await);

    let mut keys = hub.data().keys();
    keys.sort();
    assert_eq!(keys, vec![NETATMO_AUTH, NETATMO_CAMERA_DATA]);

    let context = NetatmoContext::from_hub(&hub).unwrap();
    let stored = hub.data().get::<ClientAuth>(NETATMO_AUTH).unwrap();
    assert!(std::sync::Arc::ptr_eq(&context.auth, &stored));
    assert_eq!(context.auth.scope(), vec!["read_camera", "access_camera"]);

    // Nothing is fetched until a platform asks.
    let camera_data = context.camera_data.lock().await;
    assert!(camera_data.home_data().is_none());
    assert_eq!(common::request_count(&server, "/api/gethomedata").await, 0);
}

#[tokio::test]
async fn setup_requests_every_scope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(body_string_contains("client_id=client-id"))
        .and(body_string_contains("username=user%40example.com"))
        .and(body_string_contains(
            "scope=read_station+read_camera+access_camera+read_thermostat\
             +write_thermostat+read_presence+access_presence",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "a",
            "refresh_token": "r",
            "expires_in": 10_800
        })))
        .expect(1)
        .mount(&server)
        .await;

    assert!(setup(&Hub::new(), &common::hub_config(&server)).await);
}

#[tokio::test]
async fn setup_announces_platforms() {
    let server = MockServer::start().await;
    common::mount_login(&server).await;
    let hub = Hub::new();
    let mut rx = hub.subscribe_discovery();
    let config = common::hub_config(&server);

    assert!(setup(&hub, &config).await);

    let mut platforms = Vec::new();
    while let Ok(request) = rx.try_recv() {
        assert_eq!(request.domain, DOMAIN);
        assert!(request.discovered.is_empty());
        assert_eq!(request.config, config.raw);
        platforms.push(request.platform);
    }
    assert_eq!(platforms, PLATFORMS.to_vec());
    assert_eq!(
        platforms[2].to_string(),
        Platform::BinarySensor.to_string()
    );
}

#[tokio::test]
async fn setup_without_discovery_is_quiet() {
    let server = MockServer::start().await;
    common::mount_login(&server).await;
    let hub = Hub::new();
    let mut rx = hub.subscribe_discovery();
    let mut config = common::hub_config(&server);
    config.netatmo.discovery = false;

    assert!(setup(&hub, &config).await);

    assert_eq!(hub.data().len(), 2);
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn rejected_credentials_fail_setup() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "bad credentials"
        })))
        .mount(&server)
        .await;
    let hub = Hub::new();
    let mut rx = hub.subscribe_discovery();

    assert!(!setup(&hub, &common::hub_config(&server)).await);

    assert!(hub.data().is_empty());
    assert!(NetatmoContext::from_hub(&hub).is_none());
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn out_of_range_token_lifetime_fails_setup() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "a",
            "refresh_token": "r",
            "expires_in": i64::MAX
        })))
        .mount(&server)
        .await;
    let hub = Hub::new();

    assert!(!setup(&hub, &common::hub_config(&server)).await);
    assert!(hub.data().is_empty());
}

#[tokio::test]
async fn unreachable_api_fails_setup() {
    let server = MockServer::start().await;
    let mut config = common::hub_config(&server);
    // Nothing listens on the discard port.
    config.netatmo.base_url = Url::parse("http://127.0.0.1:9/").unwrap();
    config.netatmo.timeout = std::time::Duration::from_secs(2);
    let hub = Hub::new();

    assert!(!setup(&hub, &config).await);
    assert!(hub.data().is_empty());
}
