//! In-memory admin API and record builders.

use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};
use tailaudit::domain::ports::{ApiError, ApiResult, TailnetApi};
use tailaudit::domain::tailnet::{AuthKey, Device, DnsConfig, KeyCapabilities, TailnetSettings};

pub const TAILNET: &str = "example.com";

/// A policy that passes the obvious access control checks.
pub const SCOPED_POLICY: &str = r#"{
    // engineers reach the web tier only
    "groups": {"group:eng": ["alice@example.com"]},
    "tagOwners": {"tag:web": ["group:eng"]},
    "acls": [
        {"action": "accept", "src": ["group:eng"], "dst": ["tag:web:443"]},
    ],
}"#;

/// Clock every scenario runs at.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap()
}

pub struct FakeTailnet {
    pub policy: String,
    pub devices: Mutex<Vec<Device>>,
    pub keys: Mutex<Vec<AuthKey>>,
    pub dns: DnsConfig,
    pub settings: TailnetSettings,
    pub policy_error: Option<ApiError>,
    pub devices_error: Option<ApiError>,
    /// Every mutating call, as `action:id`.
    pub mutations: Mutex<Vec<String>>,
}

impl FakeTailnet {
    pub fn new() -> Self {
        Self {
            policy: SCOPED_POLICY.to_string(),
            devices: Mutex::new(Vec::new()),
            keys: Mutex::new(Vec::new()),
            dns: DnsConfig {
                magic_dns: true,
                ..DnsConfig::default()
            },
            settings: TailnetSettings::default(),
            policy_error: None,
            devices_error: None,
            mutations: Mutex::new(Vec::new()),
        }
    }

    pub fn with_devices(self, devices: Vec<Device>) -> Self {
        *self.devices.lock().unwrap() = devices;
        self
    }

    pub fn with_keys(self, keys: Vec<AuthKey>) -> Self {
        *self.keys.lock().unwrap() = keys;
        self
    }

    pub fn mutations(&self) -> Vec<String> {
        self.mutations.lock().unwrap().clone()
    }

    pub fn device_ids(&self) -> Vec<String> {
        self.devices.lock().unwrap().iter().map(|d| d.id.clone()).collect()
    }

    pub fn key_ids_left(&self) -> Vec<String> {
        self.keys.lock().unwrap().iter().map(|k| k.id.clone()).collect()
    }

    fn record(&self, action: &str, id: &str) {
        self.mutations.lock().unwrap().push(format!("{action}:{id}"));
    }
}

impl TailnetApi for FakeTailnet {
    fn tailnet(&self) -> &str {
        TAILNET
    }

    fn policy_document(&self) -> ApiResult<String> {
        match &self.policy_error {
            Some(e) => Err(e.clone()),
            None => Ok(self.policy.clone()),
        }
    }

    fn devices(&self) -> ApiResult<Vec<Device>> {
        match &self.devices_error {
            Some(e) => Err(e.clone()),
            None => Ok(self.devices.lock().unwrap().clone()),
        }
    }

    fn key_ids(&self) -> ApiResult<Vec<String>> {
        Ok(self.key_ids_left())
    }

    fn key(&self, id: &str) -> ApiResult<AuthKey> {
        self.keys
            .lock()
            .unwrap()
            .iter()
            .find(|k| k.id == id)
            .cloned()
            .ok_or_else(|| ApiError::Http {
                status: 404,
                message: format!("key {id} not found"),
            })
    }

    fn dns_config(&self) -> ApiResult<DnsConfig> {
        Ok(self.dns.clone())
    }

    fn settings(&self) -> ApiResult<TailnetSettings> {
        Ok(self.settings.clone())
    }

    fn delete_key(&self, id: &str) -> ApiResult<()> {
        self.record("delete-key", id);
        self.keys.lock().unwrap().retain(|k| k.id != id);
        Ok(())
    }

    fn delete_device(&self, id: &str) -> ApiResult<()> {
        self.record("delete-device", id);
        self.devices.lock().unwrap().retain(|d| d.id != id);
        Ok(())
    }

    fn authorize_device(&self, id: &str) -> ApiResult<()> {
        self.record("authorize-device", id);
        Ok(())
    }

    fn set_device_tags(&self, id: &str, _tags: &[String]) -> ApiResult<()> {
        self.record("set-device-tags", id);
        Ok(())
    }

    fn create_key(
        &self,
        _capabilities: &KeyCapabilities,
        _expiry_seconds: Option<u64>,
        description: &str,
    ) -> ApiResult<String> {
        self.record("create-key", description);
        Ok("k-new".to_string())
    }
}

/// An authorized, tagged server last seen at `last_seen`.
pub fn server(id: &str, last_seen: &str) -> Device {
    Device {
        id: id.to_string(),
        name: format!("server-{id}.example.ts.net"),
        hostname: format!("server-{id}"),
        user: "alice@example.com".to_string(),
        os: "linux".to_string(),
        client_version: "1.80.0".to_string(),
        last_seen: last_seen.to_string(),
        authorized: true,
        tags: vec!["tag:web".to_string()],
        ..Device::default()
    }
}

/// A live reusable auth key.
pub fn reusable_key(id: &str) -> AuthKey {
    let mut key = AuthKey {
        id: id.to_string(),
        key_type: "auth".to_string(),
        created: "2026-05-01T00:00:00Z".to_string(),
        expires: "2026-07-01T00:00:00Z".to_string(),
        ..AuthKey::default()
    };
    key.capabilities.devices.create.reusable = true;
    key
}
