//! Configuration loading utilities
//!
//! Provides helper functions for loading configuration from various sources
//! with proper error handling and validation.

use crate::{Result, config::Settings};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const APP_DIR: &str = "unfollow-nonfollowers";

/// Configuration loader with multiple source support
#[derive(Debug)]
pub struct ConfigLoader {
    /// Default settings
    defaults: Settings,
    /// Whether to read a `.env` file from the working directory
    load_dotenv: bool,
}

impl ConfigLoader {
    /// Create new configuration loader
    pub fn new() -> Self {
        Self {
            defaults: Settings::default(),
            load_dotenv: true,
        }
    }

    /// Skip reading `.env`
    pub fn without_dotenv(mut self) -> Self {
        self.load_dotenv = false;
        self
    }

    /// Load configuration with precedence order:
    /// 1. Command line arguments (applied by the caller, highest priority)
    /// 2. Environment variables, including those from `.env`
    /// 3. Configuration file
    /// 4. Default values (lowest priority)
    ///
    /// The result is not validated, so the caller can still apply
    /// command line overrides before calling [`Settings::validate`].
    pub fn load(&self, config_file: Option<&Path>) -> Result<Settings> {
        let mut settings = self.defaults.clone();

        match config_file {
            Some(path) if path.exists() => {
                info!("Loading configuration from file: {:?}", path);
                settings = Settings::from_file(path)?;
            }
            Some(path) => {
                warn!("Configuration file not found: {:?}, using defaults", path);
            }
            None => {
                if let Some(path) = default_config_path().filter(|p| p.exists()) {
                    info!("Loading configuration from file: {:?}", path);
                    settings = Settings::from_file(&path)?;
                }
            }
        }

        if self.load_dotenv {
            match dotenvy::dotenv() {
                Ok(path) => debug!("Loaded environment from {:?}", path),
                Err(e) if e.not_found() => debug!("No .env file found"),
                Err(e) => warn!("Failed to read .env file: {}", e),
            }
        }

        debug!("Applying environment variable overrides");
        settings = settings.merge_with_env()?;

        debug!("Loaded configuration: {:?}", settings);
        Ok(settings)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Default configuration file location following the XDG convention
pub fn default_config_path() -> Option<PathBuf> {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg_config).join(APP_DIR).join("config.toml"));
    }
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::tests::ENV_TEST_MUTEX;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_from_file() {
        let _lock = ENV_TEST_MUTEX.lock().unwrap();

        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[account]
username = "file_user"
password = "file_pass"

[network]
proxy_url = "http://127.0.0.1:8888"
request_timeout = 15
        "#
        )
        .unwrap();

        let loader = ConfigLoader::new().without_dotenv();
        let settings = loader.load(Some(temp_file.path())).unwrap();

        assert_eq!(settings.account.password, "file_pass");
        assert_eq!(
            settings.network.proxy_url.as_deref(),
            Some("http://127.0.0.1:8888")
        );
        assert_eq!(settings.network.request_timeout.as_secs(), 15);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_env_overrides_file() {
        let _lock = ENV_TEST_MUTEX.lock().unwrap();

        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[account]
username = "file_user"
password = "file_pass"
        "#
        )
        .unwrap();

        unsafe {
            std::env::set_var("IG_USERNAME", "env_user");
        }

        let loader = ConfigLoader::new().without_dotenv();
        let settings = loader.load(Some(temp_file.path())).unwrap();
        assert_eq!(settings.account.username, "env_user");

        unsafe {
            std::env::remove_var("IG_USERNAME");
        }
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let _lock = ENV_TEST_MUTEX.lock().unwrap();

        let loader = ConfigLoader::new().without_dotenv();
        let settings = loader
            .load(Some(Path::new("/nonexistent/unfollow/config.toml")))
            .unwrap();

        assert_eq!(settings.unfollow.min_delay_ms, 1000);
        assert_eq!(settings.unfollow.max_delay_ms, 7000);
    }

    #[test]
    fn test_default_config_path_uses_xdg() {
        let _lock = ENV_TEST_MUTEX.lock().unwrap();

        unsafe {
            std::env::set_var("XDG_CONFIG_HOME", "/tmp/xdg-config");
        }

        assert_eq!(
            default_config_path(),
            Some(PathBuf::from(
                "/tmp/xdg-config/unfollow-nonfollowers/config.toml"
            ))
        );

        unsafe {
            std::env::remove_var("XDG_CONFIG_HOME");
        }
    }
}
