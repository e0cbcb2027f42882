//! In-memory tailnet used by the use case tests

use std::collections::HashSet;
use std::sync::Mutex;

use crate::domain::ports::{ApiError, ApiResult, LockProbe, TailnetApi};
use crate::domain::tailnet::{
    AuthKey, Device, DnsConfig, KeyCapabilities, LockStatus, TailnetSettings,
};

#[derive(Default)]
pub struct FakeTailnet {
    pub policy: String,
    pub devices: Mutex<Vec<Device>>,
    pub keys: Mutex<Vec<AuthKey>>,
    pub dns: DnsConfig,
    pub settings: TailnetSettings,
    pub policy_error: Option<ApiError>,
    pub devices_error: Option<ApiError>,
    pub keys_error: Option<ApiError>,
    pub dns_error: Option<ApiError>,
    pub settings_error: Option<ApiError>,
    /// Target IDs whose mutation fails.
    pub failing_targets: HashSet<String>,
    /// Every mutating call, as `action:id`.
    pub mutations: Mutex<Vec<String>>,
}

impl FakeTailnet {
    pub fn new() -> Self {
        Self {
            policy: "{}".to_string(),
            dns: DnsConfig {
                magic_dns: true,
                ..DnsConfig::default()
            },
            ..Self::default()
        }
    }

    pub fn with_policy(mut self, policy: &str) -> Self {
        self.policy = policy.to_string();
        self
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

    fn mutate(&self, action: &str, id: &str) -> ApiResult<()> {
        self.mutations.lock().unwrap().push(format!("{action}:{id}"));
        if self.failing_targets.contains(id) {
            return Err(ApiError::Http {
                status: 500,
                message: "internal error".to_string(),
            });
        }
        Ok(())
    }

    fn fetch<T>(&self, error: &Option<ApiError>, value: impl FnOnce() -> T) -> ApiResult<T> {
        match error {
            Some(e) => Err(e.clone()),
            None => Ok(value()),
        }
    }
}

impl TailnetApi for FakeTailnet {
    fn tailnet(&self) -> &str {
        "example.com"
    }

    fn policy_document(&self) -> ApiResult<String> {
        self.fetch(&self.policy_error, || self.policy.clone())
    }

    fn devices(&self) -> ApiResult<Vec<Device>> {
        self.fetch(&self.devices_error, || self.devices.lock().unwrap().clone())
    }

    fn key_ids(&self) -> ApiResult<Vec<String>> {
        self.fetch(&self.keys_error, || {
            self.keys.lock().unwrap().iter().map(|k| k.id.clone()).collect()
        })
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
        self.fetch(&self.dns_error, || self.dns.clone())
    }

    fn settings(&self) -> ApiResult<TailnetSettings> {
        self.fetch(&self.settings_error, || self.settings.clone())
    }

    fn delete_key(&self, id: &str) -> ApiResult<()> {
        self.mutate("delete-key", id)?;
        self.keys.lock().unwrap().retain(|k| k.id != id);
        Ok(())
    }

    fn delete_device(&self, id: &str) -> ApiResult<()> {
        self.mutate("delete-device", id)?;
        self.devices.lock().unwrap().retain(|d| d.id != id);
        Ok(())
    }

    fn authorize_device(&self, id: &str) -> ApiResult<()> {
        self.mutate("authorize-device", id)?;
        for d in self.devices.lock().unwrap().iter_mut().filter(|d| d.id == id) {
            d.authorized = true;
        }
        Ok(())
    }

    fn set_device_tags(&self, id: &str, tags: &[String]) -> ApiResult<()> {
        self.mutate("set-device-tags", id)?;
        for d in self.devices.lock().unwrap().iter_mut().filter(|d| d.id == id) {
            d.tags = tags.to_vec();
        }
        Ok(())
    }

    fn create_key(
        &self,
        _capabilities: &KeyCapabilities,
        _expiry_seconds: Option<u64>,
        description: &str,
    ) -> ApiResult<String> {
        self.mutate("create-key", description)?;
        Ok("knew".to_string())
    }
}

/// Lock probe returning a fixed status.
pub struct FixedLockProbe(pub LockStatus);

impl LockProbe for FixedLockProbe {
    fn lock_status(&self) -> ApiResult<LockStatus> {
        Ok(self.0.clone())
    }
}
