//! Persistable session state
//!
//! Holds everything the client needs to make authenticated requests
//! without logging in again: the device identity, cookies and the bearer
//! authorization issued by the platform. The `constants` block describes
//! the app build the client impersonates; it is regenerated on every run
//! and therefore never written to disk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use uuid::Uuid;

const DEFAULT_DEVICE_STRING: &str =
    "26/8.0.0; 480dpi; 1080x1920; samsung; SM-G930F; herolte; samsungexynos8890";

/// Authentication and device state for one account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Emulated device identity
    pub device: DeviceInfo,
    /// Cookies captured from responses
    #[serde(default)]
    pub cookies: BTreeMap<String, String>,
    /// Bearer authorization issued at login
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization: Option<String>,
    /// Authenticated account id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie_user_id: Option<u64>,
    /// Proxy the session was established through
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
    /// Last time the state was persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
    /// Volatile app build constants, stripped before persistence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constants: Option<AppConstants>,
    /// Fields this version does not interpret, kept for round-tripping
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Emulated Android device identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub device_id: String,
    pub uuid: String,
    pub phone_id: String,
    pub adid: String,
    pub device_string: String,
}

/// App build the client presents itself as
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConstants {
    pub app_version: String,
    pub app_version_code: String,
    pub bloks_version_id: String,
    pub capabilities: String,
    pub language: String,
}

impl Default for AppConstants {
    fn default() -> Self {
        Self {
            app_version: "222.0.0.13.114".to_string(),
            app_version_code: "350696709".to_string(),
            bloks_version_id: "388ece79ebc0e70e87873505ed1b0ee335f2d6d7f2d4e3a9ad5e2ec1f1e5c4e7"
                .to_string(),
            capabilities: "3brTvx0=".to_string(),
            language: "en_US".to_string(),
        }
    }
}

impl DeviceInfo {
    /// Derive a stable device identity from a seed (usually the username),
    /// so repeated runs present the same device to the platform.
    pub fn from_seed(seed: &str) -> Self {
        let derive = |purpose: &str| {
            Uuid::new_v5(&Uuid::NAMESPACE_OID, format!("{seed}:{purpose}").as_bytes())
        };
        let device_hex = derive("device").simple().to_string();

        Self {
            device_id: format!("android-{}", &device_hex[..16]),
            uuid: derive("uuid").to_string(),
            phone_id: derive("phone").to_string(),
            adid: derive("adid").to_string(),
            device_string: DEFAULT_DEVICE_STRING.to_string(),
        }
    }
}

impl SessionState {
    /// Fresh state for an account with no cached session
    pub fn new(seed: &str) -> Self {
        Self {
            device: DeviceInfo::from_seed(seed),
            cookies: BTreeMap::new(),
            authorization: None,
            cookie_user_id: None,
            proxy_url: None,
            saved_at: None,
            constants: Some(AppConstants::default()),
            extra: Map::new(),
        }
    }

    /// Copy of the state suitable for writing to disk
    pub fn without_constants(&self) -> Self {
        Self {
            constants: None,
            ..self.clone()
        }
    }

    /// Constants in effect, regenerating the defaults when stripped
    pub fn constants(&self) -> AppConstants {
        self.constants.clone().unwrap_or_default()
    }

    /// Authenticated account id, from the explicit field or the
    /// `ds_user_id` cookie
    pub fn user_id(&self) -> Option<u64> {
        self.cookie_user_id.or_else(|| {
            self.cookies
                .get("ds_user_id")
                .and_then(|value| value.parse().ok())
        })
    }

    /// User agent string for the emulated app and device
    pub fn user_agent(&self) -> String {
        let constants = self.constants();
        format!(
            "Instagram {} Android ({}; {}; {})",
            constants.app_version,
            self.device.device_string,
            constants.language,
            constants.app_version_code
        )
    }

    /// `Cookie` header value for the captured cookies
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_device_is_stable_per_seed() {
        let first = DeviceInfo::from_seed("alice");
        let second = DeviceInfo::from_seed("alice");
        let other = DeviceInfo::from_seed("bob");

        assert_eq!(first, second);
        assert_ne!(first.device_id, other.device_id);
        assert!(first.device_id.starts_with("android-"));
        assert_eq!(first.device_id.len(), "android-".len() + 16);
    }

    #[test]
    fn test_without_constants() {
        let state = SessionState::new("alice");
        assert!(state.constants.is_some());

        let stripped = state.without_constants();
        assert!(stripped.constants.is_none());
        assert_eq!(stripped.device, state.device);
        assert_eq!(stripped.constants(), AppConstants::default());
    }

    #[test]
    fn test_user_id_from_cookie() {
        let mut state = SessionState::new("alice");
        assert_eq!(state.user_id(), None);

        state
            .cookies
            .insert("ds_user_id".to_string(), "4242".to_string());
        assert_eq!(state.user_id(), Some(4242));

        state.cookie_user_id = Some(7);
        assert_eq!(state.user_id(), Some(7));
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let state = SessionState::new("alice").without_constants();
        let mut value = serde_json::to_value(&state).unwrap();
        value["supportedCapabilities"] = json!([{"name": "SUPPORTED_SDK_VERSIONS"}]);

        let decoded: SessionState = serde_json::from_value(value.clone()).unwrap();
        assert!(decoded.extra.contains_key("supportedCapabilities"));
        assert_eq!(serde_json::to_value(&decoded).unwrap(), value);
    }

    #[test]
    fn test_cookie_header() {
        let mut state = SessionState::new("alice");
        assert_eq!(state.cookie_header(), None);

        state.cookies.insert("csrftoken".to_string(), "abc".to_string());
        state.cookies.insert("ds_user_id".to_string(), "1".to_string());
        assert_eq!(
            state.cookie_header().as_deref(),
            Some("csrftoken=abc; ds_user_id=1")
        );
    }
}
