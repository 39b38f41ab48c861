//! Configuration loader with file and environment variable support

use crate::{AppConfig, ConfigError};
use std::env;
use std::path::PathBuf;
use tracing::info;

/// Standard config file search paths
const CONFIG_PATHS: &[&str] = &[
    "config.toml",
    "bcracing.toml",
    "./config/config.toml",
    "/etc/bcracing/config.toml",
];

/// Configuration loader
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Create a loader with a specific config file path
    pub fn with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            config_path: Some(path.into()),
        }
    }

    /// Load configuration from file (if found) with environment variable overrides
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let mut config = AppConfig::default();

        if let Some(path) = self.find_config_file() {
            info!(?path, "Loading configuration from file");
            config = AppConfig::from_file(&path)?;
        }

        self.apply_env_overrides(&mut config);

        Ok(config)
    }

    /// Find the configuration file to use
    fn find_config_file(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config_path {
            if path.exists() {
                return Some(path.clone());
            }
        }

        if let Ok(path) = env::var("BCRACING_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        for path in CONFIG_PATHS {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        None
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&self, config: &mut AppConfig) {
        // HTTP
        if let Ok(val) = env::var("BCRACING_HTTP_HOST") {
            config.http.host = val;
        }
        if let Ok(val) = env::var("BCRACING_HTTP_PORT") {
            if let Ok(port) = val.parse() {
                config.http.port = port;
            }
        }

        // Database
        if let Ok(val) = env::var("BCRACING_DATABASE_URL") {
            config.database.url = val;
        }

        // SMTP
        if let Ok(val) = env::var("BCRACING_SMTP_HOST") {
            config.smtp.host = val;
        }
        if let Ok(val) = env::var("BCRACING_SMTP_PORT") {
            if let Ok(port) = val.parse() {
                config.smtp.port = port;
            }
        }
        if let Ok(val) = env::var("BCRACING_SMTP_USERNAME") {
            config.smtp.username = Some(val);
        }
        if let Ok(val) = env::var("BCRACING_SMTP_PASSWORD") {
            config.smtp.password = Some(val);
        }
        if let Ok(val) = env::var("BCRACING_SMTP_TLS") {
            config.smtp.tls = val;
        }

        // Notify
        if let Ok(val) = env::var("BCRACING_NOTIFY_SENDER") {
            config.notify.sender = val;
        }
        if let Ok(val) = env::var("BCRACING_NOTIFY_REPLY_TO") {
            config.notify.reply_to = val;
        }
        if let Ok(val) = env::var("BCRACING_NOTIFY_TAG") {
            config.notify.tag = val;
        }
        if let Ok(val) = env::var("BCRACING_NOTIFY_RECIPIENTS") {
            config.notify.recipients = val
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env-var tests mutate process state; keep them in one test so
    // they cannot race each other under the parallel test runner.
    #[test]
    fn env_overrides_apply_on_top_of_defaults() {
        env::set_var("BCRACING_HTTP_PORT", "3000");
        env::set_var("BCRACING_DATABASE_URL", "sqlite://test.db");
        env::set_var("BCRACING_NOTIFY_RECIPIENTS", "a@txt.net, b@txt.net,");

        let mut config = AppConfig::default();
        ConfigLoader::new().apply_env_overrides(&mut config);

        assert_eq!(config.http.port, 3000);
        assert_eq!(config.database.url, "sqlite://test.db");
        assert_eq!(config.notify.recipients, vec!["a@txt.net", "b@txt.net"]);

        env::remove_var("BCRACING_HTTP_PORT");
        env::remove_var("BCRACING_DATABASE_URL");
        env::remove_var("BCRACING_NOTIFY_RECIPIENTS");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let loader = ConfigLoader::with_path("/nonexistent/bcracing.toml");
        let config = loader.load().unwrap();
        // Field no env test touches, so parallel runs stay stable.
        assert_eq!(config.smtp.tls, "starttls");
    }
}
