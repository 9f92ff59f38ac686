//! Runtime configuration.
//!
//! Command-line flags (with environment fallbacks, see [`crate::cli`]) are
//! collected into [`ServerConfig`]. Portal settings come from an optional
//! JSON file; absent keys keep their defaults.

use crate::error::{AppError, AppResult};
use dfs_core::PortalSettings;
use std::net::SocketAddr;
use std::path::Path;
use tracing::{debug, info};

/// Default bind host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default bind port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default request budget per second for the whole service.
pub const DEFAULT_RATE_LIMIT: u32 = 50;

/// Everything the HTTP server needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Bearer token required on every route except `/health`. `None`
    /// disables authentication.
    pub api_key: Option<String>,
    pub rate_limit_per_sec: u32,
    pub settings: PortalSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            api_key: None,
            rate_limit_per_sec: DEFAULT_RATE_LIMIT,
            settings: PortalSettings::default(),
        }
    }
}

impl ServerConfig {
    /// Socket address to bind.
    pub fn addr(&self) -> AppResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Usage(format!("invalid bind address {}:{}: {e}", self.host, self.port)))
    }
}

/// Load portal settings, falling back to defaults when no file is given.
pub fn load_settings(path: Option<&Path>) -> AppResult<PortalSettings> {
    let Some(path) = path else {
        debug!("No settings file given, using defaults");
        return Ok(PortalSettings::default());
    };

    let content = std::fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let settings: PortalSettings =
        serde_json::from_str(&content).map_err(|source| AppError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    info!("Loaded settings from {}", path.display());
    Ok(settings)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use dfs_core::{Role, Severity};

    #[test]
    fn default_addr_parses() {
        let addr = ServerConfig::default().addr().unwrap();
        assert_eq!(addr.port(), DEFAULT_PORT);
    }

    #[test]
    fn bad_host_is_usage_error() {
        let config = ServerConfig {
            host: "not a host".to_string(),
            ..ServerConfig::default()
        };
        assert!(matches!(config.addr(), Err(AppError::Usage(_))));
    }

    #[test]
    fn missing_settings_file_uses_defaults() {
        assert_eq!(load_settings(None).unwrap(), PortalSettings::default());
    }

    #[test]
    fn settings_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"auto_fix": {"default_role": "manager"}, "notifications": {"alert_threshold": "medium"}}"#,
        )
        .unwrap();

        let settings = load_settings(Some(&path)).unwrap();
        assert_eq!(settings.auto_fix.default_role, Role::Management);
        assert_eq!(settings.notifications.alert_threshold, Severity::Medium);
    }

    #[test]
    fn invalid_settings_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ nope").unwrap();
        assert!(matches!(load_settings(Some(&path)), Err(AppError::Json { .. })));
    }
}
