// ── Hub state and platform discovery ──
//
// The host side of the integration: a typed, string-keyed data map that
// setup writes into, and a broadcast channel announcing platforms that
// should be loaded.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::{debug, info};

const DISCOVERY_CHANNEL_SIZE: usize = 16;

// ── Platform ─────────────────────────────────────────────────────

/// Device platforms an integration can ask the hub to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Platform {
    Camera,
    Sensor,
    BinarySensor,
    Climate,
}

/// Request to load `platform` on behalf of integration `domain`.
#[derive(Debug, Clone)]
pub struct PlatformDiscovery {
    pub platform: Platform,
    pub domain: String,
    /// Per-platform discovery info.
    pub discovered: serde_json::Map<String, serde_json::Value>,
    /// The full hub configuration.
    pub config: Arc<serde_json::Value>,
}

// ── HubData ──────────────────────────────────────────────────────

/// Shared, string-keyed store of integration objects.
///
/// Values are stored as `Arc<T>` and read back with the same `T`; a
/// lookup with the wrong type returns `None`.
#[derive(Default)]
pub struct HubData {
    entries: DashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl fmt::Debug for HubData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.entries.iter().map(|e| e.key().clone()))
            .finish()
    }
}

impl HubData {
    pub fn insert<T: Any + Send + Sync>(&self, key: impl Into<String>, value: Arc<T>) {
        self.entries.insert(key.into(), value);
    }

    pub fn get<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        let value = Arc::clone(self.entries.get(key)?.value());
        value.downcast::<T>().ok()
    }

    pub fn remove(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ── Hub ──────────────────────────────────────────────────────────

/// Process-wide hub state handed to integration setup.
pub struct Hub {
    data: HubData,
    discovery_tx: broadcast::Sender<PlatformDiscovery>,
}

impl Default for Hub {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Hub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hub")
            .field("data", &self.data)
            .field("discovery_subscribers", &self.discovery_tx.receiver_count())
            .finish()
    }
}

impl Hub {
    pub fn new() -> Self {
        let (discovery_tx, _) = broadcast::channel(DISCOVERY_CHANNEL_SIZE);
        Self {
            data: HubData::default(),
            discovery_tx,
        }
    }

    pub fn data(&self) -> &HubData {
        &self.data
    }

    /// Subscribe to platform load requests. Only requests made after
    /// subscribing are received.
    pub fn subscribe_discovery(&self) -> broadcast::Receiver<PlatformDiscovery> {
        self.discovery_tx.subscribe()
    }

    /// Ask the hub to load `platform` for `domain`.
    pub fn load_platform(
        &self,
        platform: Platform,
        domain: &str,
        discovered: serde_json::Map<String, serde_json::Value>,
        config: &Arc<serde_json::Value>,
    ) {
        info!(%platform, domain, "requesting platform load");
        let request = PlatformDiscovery {
            platform,
            domain: domain.to_owned(),
            discovered,
            config: Arc::clone(config),
        };
        if self.discovery_tx.send(request).is_err() {
            debug!(%platform, "no discovery subscribers");
        }
    }
}
