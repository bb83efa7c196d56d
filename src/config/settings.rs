//! Configuration settings structure
//!
//! Defines the settings tree and how each section is read from the
//! environment. Variable names follow the ones the tool has always used
//! (`IG_USERNAME`, `IG_PASSWORD`, `IG_PROXY`, `NOT_UNFOLLOW_IF_CONTAINS`).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Separator between entries of `NOT_UNFOLLOW_IF_CONTAINS`
pub const EXCLUSION_SEPARATOR: &str = ", ";

fn default_state_path() -> PathBuf {
    PathBuf::from("state.json")
}

fn default_base_url() -> String {
    "https://i.instagram.com/api/v1".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_min_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    7000
}

fn default_log_level() -> String {
    "info".to_string()
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

/// Main configuration settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub account: AccountSettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub network: NetworkSettings,
    #[serde(default)]
    pub unfollow: UnfollowSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Account credentials
#[derive(Clone, Serialize, Deserialize, Default)]
pub struct AccountSettings {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

// Keep the password out of debug logs.
impl std::fmt::Debug for AccountSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountSettings")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Session cache location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "default_state_path")]
    pub state_path: PathBuf,
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSettings {
    #[serde(default)]
    pub proxy_url: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(with = "duration_secs", default = "default_request_timeout")]
    pub request_timeout: Duration,
}

/// Unfollow pacing and filtering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnfollowSettings {
    /// Substrings that protect a username from being unfollowed
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default = "default_min_delay_ms")]
    pub min_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Log what would be unfollowed without calling the platform
    #[serde(default)]
    pub dry_run: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub verbose: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            state_path: default_state_path(),
        }
    }
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            proxy_url: None,
            base_url: default_base_url(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl Default for UnfollowSettings {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            min_delay_ms: default_min_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            dry_run: false,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            verbose: false,
        }
    }
}

/// Split an exclusion list the way `NOT_UNFOLLOW_IF_CONTAINS` is written:
/// entries separated by a comma and a space. Empty input means no exclusions.
pub fn parse_exclusion_list(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    drop_empty_exclusions(raw.split(EXCLUSION_SEPARATOR).map(str::to_string).collect())
}

/// Remove empty exclusion words.
///
/// An empty word is a substring of every username and would protect every
/// account, so it is dropped with a warning instead.
pub fn drop_empty_exclusions(words: Vec<String>) -> Vec<String> {
    let total = words.len();
    let kept: Vec<String> = words.into_iter().filter(|w| !w.is_empty()).collect();
    if kept.len() < total {
        warn!(
            "Ignoring {} empty exclusion word(s); check for a trailing \"{}\"",
            total - kept.len(),
            EXCLUSION_SEPARATOR
        );
    }
    kept
}

fn parse_flag(name: &str, raw: &str) -> crate::Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(crate::Error::config(format!(
            "Invalid value for {}: '{}' (expected true/false or 1/0)",
            name, raw
        ))),
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

impl Settings {
    /// Load settings from configuration file
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::config(format!("Failed to read config file: {}", e)))?;

        let mut settings: Settings = toml::from_str(&content)
            .map_err(|e| crate::Error::config(format!("Failed to parse config file: {}", e)))?;
        settings.unfollow.exclude = drop_empty_exclusions(settings.unfollow.exclude);

        Ok(settings)
    }

    /// Override fields with any environment variables that are set
    pub fn merge_with_env(mut self) -> crate::Result<Self> {
        if let Some(username) = env_var("IG_USERNAME") {
            self.account.username = username;
        }
        if let Some(password) = env_var("IG_PASSWORD") {
            self.account.password = password;
        }
        if let Some(proxy) = env_var("IG_PROXY").filter(|p| !p.is_empty()) {
            self.network.proxy_url = Some(proxy);
        }
        if let Some(raw) = env_var("NOT_UNFOLLOW_IF_CONTAINS") {
            self.unfollow.exclude = parse_exclusion_list(&raw);
        }
        if let Some(path) = env_var("IG_STATE_PATH") {
            self.session.state_path = PathBuf::from(path);
        }

        if let Some(ms) = env_var("UNFOLLOW_MIN_DELAY_MS") {
            self.unfollow.min_delay_ms = ms
                .parse()
                .map_err(|e| crate::Error::config(format!("Invalid minimum delay: {}", e)))?;
        }
        if let Some(ms) = env_var("UNFOLLOW_MAX_DELAY_MS") {
            self.unfollow.max_delay_ms = ms
                .parse()
                .map_err(|e| crate::Error::config(format!("Invalid maximum delay: {}", e)))?;
        }
        if let Some(dry_run) = env_var("UNFOLLOW_DRY_RUN") {
            self.unfollow.dry_run = parse_flag("UNFOLLOW_DRY_RUN", &dry_run)?;
        }

        if let Some(level) = env_var("LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(self)
    }

    /// Validate configuration settings
    pub fn validate(&self) -> crate::Result<()> {
        if self.account.username.is_empty() {
            return Err(crate::Error::config("IG_USERNAME is not set"));
        }

        if self.account.password.is_empty() {
            return Err(crate::Error::config("IG_PASSWORD is not set"));
        }

        if let Some(proxy_url) = &self.network.proxy_url
            && let Err(e) = url::Url::parse(proxy_url)
        {
            return Err(crate::Error::config(format!(
                "Invalid proxy URL '{}': {}",
                proxy_url, e
            )));
        }

        if let Err(e) = url::Url::parse(&self.network.base_url) {
            return Err(crate::Error::config(format!(
                "Invalid API base URL '{}': {}",
                self.network.base_url, e
            )));
        }

        if self.unfollow.min_delay_ms > self.unfollow.max_delay_ms {
            return Err(crate::Error::config(format!(
                "Minimum delay {}ms exceeds maximum delay {}ms",
                self.unfollow.min_delay_ms, self.unfollow.max_delay_ms
            )));
        }

        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(crate::Error::config(format!(
                    "Invalid log level: {}",
                    self.logging.level
                )));
            }
        }

        Ok(())
    }
}
