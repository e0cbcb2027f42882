//! Tailscale admin API client
//!
//! Blocking `reqwest` client for the v2 REST API. Every request carries the
//! configured timeout. API keys are sent as bearer tokens; OAuth clients
//! first exchange their credentials for a short-lived access token, which
//! is cached until shortly before it expires.

use std::fmt;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::domain::ports::{ApiError, ApiResult, TailnetApi};
use crate::domain::tailnet::{AuthKey, Device, DnsConfig, KeyCapabilities, TailnetSettings};

/// Refresh OAuth tokens this long before the server says they expire.
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

/// Error bodies are cut to this many characters in messages.
const MAX_ERROR_BODY: usize = 200;

/// How the client authenticates.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    ApiKey(String),
    OAuth {
        client_id: String,
        client_secret: String,
    },
}

impl Credentials {
    /// Read `TSKEY` or `TS_OAUTH_CLIENT_ID` / `TS_OAUTH_CLIENT_SECRET`.
    pub fn from_env() -> ApiResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// OAuth wins when both forms are present.
    pub fn from_lookup<F>(lookup: F) -> ApiResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let (Some(client_id), Some(client_secret)) = (
            non_empty("TS_OAUTH_CLIENT_ID"),
            non_empty("TS_OAUTH_CLIENT_SECRET"),
        ) {
            return Ok(Credentials::OAuth {
                client_id,
                client_secret,
            });
        }
        non_empty("TSKEY")
            .map(Credentials::ApiKey)
            .ok_or(ApiError::MissingCredentials)
    }
}

// Never print secrets, not even in debug output.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
            Credentials::OAuth { client_id, .. } => f
                .debug_struct("OAuth")
                .field("client_id", client_id)
                .field("client_secret", &"<redacted>")
                .finish(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Clone)]
struct TokenState {
    access_token: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct DeviceList {
    #[serde(default)]
    devices: Vec<Device>,
}

#[derive(Debug, Deserialize)]
struct KeyList {
    #[serde(default)]
    keys: Vec<KeyRef>,
}

#[derive(Debug, Deserialize)]
struct KeyRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct DnsPreferences {
    #[serde(default, rename = "magicDNS")]
    magic_dns: bool,
}

#[derive(Debug, Deserialize)]
struct Nameservers {
    #[serde(default)]
    dns: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SearchPaths {
    #[serde(default, rename = "searchPaths")]
    search_paths: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CreatedKey {
    id: String,
}

pub struct HttpTailnetClient {
    http: Client,
    base_url: String,
    tailnet: String,
    credentials: Credentials,
    timeout_secs: u64,
    token: Mutex<Option<TokenState>>,
}

impl HttpTailnetClient {
    pub fn new(config: &ApiConfig, credentials: Credentials) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("tailaudit/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let tailnet = match config.tailnet.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => "-".to_string(),
        };
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            tailnet,
            credentials,
            timeout_secs: config.timeout_secs,
            token: Mutex::new(None),
        })
    }

    fn tailnet_url(&self, path: &str) -> String {
        format!("{}/api/v2/tailnet/{}/{}", self.base_url, self.tailnet, path)
    }

    fn device_url(&self, id: &str, path: &str) -> String {
        if path.is_empty() {
            format!("{}/api/v2/device/{}", self.base_url, id)
        } else {
            format!("{}/api/v2/device/{}/{}", self.base_url, id, path)
        }
    }

    fn bearer(&self) -> ApiResult<String> {
        match &self.credentials {
            Credentials::ApiKey(key) => Ok(key.clone()),
            Credentials::OAuth {
                client_id,
                client_secret,
            } => {
                let mut guard = self
                    .token
                    .lock()
                    .map_err(|_| ApiError::Transport("token cache poisoned".to_string()))?;
                if let Some(state) = guard.as_ref() {
                    if state.expires_at > Utc::now() {
                        return Ok(state.access_token.clone());
                    }
                }
                let state = self.exchange_token(client_id, client_secret)?;
                let token = state.access_token.clone();
                *guard = Some(state);
                Ok(token)
            }
        }
    }

    fn exchange_token(&self, client_id: &str, client_secret: &str) -> ApiResult<TokenState> {
        debug!("exchanging OAuth client credentials for an access token");
        let response = self
            .http
            .post(format!("{}/api/v2/oauth/token", self.base_url))
            .form(&[
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            // A rejected exchange is a credential problem whatever the code.
            return Err(ApiError::Unauthorized {
                status: status.as_u16(),
                message: format!("OAuth token exchange failed: {}", truncate(&body)),
            });
        }
        let token: TokenResponse = response
            .json()
            .map_err(|e| ApiError::Decode(format!("OAuth token response: {e}")))?;
        let lifetime = token.expires_in.unwrap_or(3600) - TOKEN_REFRESH_MARGIN_SECS;
        Ok(TokenState {
            access_token: token.access_token,
            expires_at: Utc::now() + chrono::Duration::seconds(lifetime.max(0)),
        })
    }

    fn send(&self, request: RequestBuilder) -> ApiResult<Response> {
        let response = request
            .bearer_auth(self.bearer()?)
            .send()
            .map_err(|e| self.transport_error(e))?;
        check_status(response)
    }

    fn get_json<T: DeserializeOwned>(&self, url: String) -> ApiResult<T> {
        debug!(url = %url, "GET");
        self.send(self.http.get(url))?
            .json()
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn transport_error(&self, error: reqwest::Error) -> ApiError {
        if error.is_timeout() {
            warn!(seconds = self.timeout_secs, "request timed out");
            ApiError::Timeout {
                seconds: self.timeout_secs,
            }
        } else {
            ApiError::Transport(error.to_string())
        }
    }
}

fn check_status(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    let message = api_message(&body);
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        Err(ApiError::Unauthorized {
            status: status.as_u16(),
            message,
        })
    } else {
        Err(ApiError::Http {
            status: status.as_u16(),
            message,
        })
    }
}

/// The API's `{"message": ...}` field, else the raw body.
fn api_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: String,
    }
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.message,
        Err(_) => truncate(body),
    }
}

fn truncate(body: &str) -> String {
    let body = body.trim();
    if body.chars().count() <= MAX_ERROR_BODY {
        return body.to_string();
    }
    let cut: String = body.chars().take(MAX_ERROR_BODY).collect();
    format!("{cut}...")
}

impl TailnetApi for HttpTailnetClient {
    fn tailnet(&self) -> &str {
        &self.tailnet
    }

    fn policy_document(&self) -> ApiResult<String> {
        let request = self
            .http
            .get(self.tailnet_url("acl"))
            .header(ACCEPT, "application/hujson");
        self.send(request)?
            .text()
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn devices(&self) -> ApiResult<Vec<Device>> {
        let list: DeviceList = self.get_json(self.tailnet_url("devices?fields=all"))?;
        debug!(count = list.devices.len(), "fetched devices");
        Ok(list.devices)
    }

    fn key_ids(&self) -> ApiResult<Vec<String>> {
        let list: KeyList = self.get_json(self.tailnet_url("keys"))?;
        Ok(list.keys.into_iter().map(|k| k.id).collect())
    }

    fn key(&self, id: &str) -> ApiResult<AuthKey> {
        self.get_json(self.tailnet_url(&format!("keys/{id}")))
    }

    fn dns_config(&self) -> ApiResult<DnsConfig> {
        let prefs: DnsPreferences = self.get_json(self.tailnet_url("dns/preferences"))?;
        let nameservers: Nameservers = self.get_json(self.tailnet_url("dns/nameservers"))?;
        let search: SearchPaths = self.get_json(self.tailnet_url("dns/searchpaths"))?;
        Ok(DnsConfig {
            magic_dns: prefs.magic_dns,
            nameservers: nameservers.dns,
            search_paths: search.search_paths,
        })
    }

    fn settings(&self) -> ApiResult<TailnetSettings> {
        self.get_json(self.tailnet_url("settings"))
    }

    fn delete_key(&self, id: &str) -> ApiResult<()> {
        self.send(self.http.delete(self.tailnet_url(&format!("keys/{id}"))))?;
        Ok(())
    }

    fn delete_device(&self, id: &str) -> ApiResult<()> {
        self.send(self.http.delete(self.device_url(id, "")))?;
        Ok(())
    }

    fn authorize_device(&self, id: &str) -> ApiResult<()> {
        let request = self
            .http
            .post(self.device_url(id, "authorized"))
            .json(&serde_json::json!({ "authorized": true }));
        self.send(request)?;
        Ok(())
    }

    fn set_device_tags(&self, id: &str, tags: &[String]) -> ApiResult<()> {
        let request = self
            .http
            .post(self.device_url(id, "tags"))
            .json(&serde_json::json!({ "tags": tags }));
        self.send(request)?;
        Ok(())
    }

    fn create_key(
        &self,
        capabilities: &KeyCapabilities,
        expiry_seconds: Option<u64>,
        description: &str,
    ) -> ApiResult<String> {
        let mut body = serde_json::json!({
            "capabilities": capabilities,
            "description": description,
        });
        if let Some(seconds) = expiry_seconds {
            body["expirySeconds"] = serde_json::json!(seconds);
        }
        let created: CreatedKey = self
            .send(self.http.post(self.tailnet_url("keys")).json(&body))?
            .json()
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(created.id)
    }
}
