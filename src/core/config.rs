//! Application configuration.
//!
//! Backend URLs are compiled in; set `FINITX_DASHBOARD_API_URL` or
//! `FINITX_OBWB_API_URL` at build time to point a build at another backend.
//! The server binary additionally reads [`ServerConfig::from_env()`] after
//! calling `dotenvy::dotenv()`.

use std::time::Duration;

use crate::core::session::SESSION_STORAGE_KEY;

/// Dashboard API (authentication, optical reports).
pub const DASHBOARD_API_URL: &str = match option_env!("FINITX_DASHBOARD_API_URL") {
    Some(url) => url,
    None => "https://api-dashboard-finitx.darkube.app",
};

/// Email-service API (OBWB).
pub const OBWB_API_URL: &str = match option_env!("FINITX_OBWB_API_URL") {
    Some(url) => url,
    None => DASHBOARD_API_URL,
};

pub const REFRESH_PATH: &str = "/auth/refresh";

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Backend endpoints and client settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub dashboard_url: String,
    pub obwb_url: String,
    /// Path on the dashboard API that exchanges refresh tokens.
    pub refresh_path: String,
    pub request_timeout: Duration,
    /// Device-storage key of the persisted session.
    pub storage_key: String,
}

impl ApiConfig {
    pub fn refresh_url(&self) -> String {
        format!(
            "{}{}",
            self.dashboard_url.trim_end_matches('/'),
            self.refresh_path
        )
    }

    pub fn with_dashboard_url(mut self, url: impl Into<String>) -> Self {
        self.dashboard_url = url.into();
        self
    }

    pub fn with_obwb_url(mut self, url: impl Into<String>) -> Self {
        self.obwb_url = url.into();
        self
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            dashboard_url: DASHBOARD_API_URL.to_string(),
            obwb_url: OBWB_API_URL.to_string(),
            refresh_path: REFRESH_PATH.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            storage_key: SESSION_STORAGE_KEY.to_string(),
        }
    }
}

/// Server process settings loaded from environment variables.
#[cfg(feature = "ssr")]
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `tracing` filter directive, from `RUST_LOG`.
    pub log_filter: String,

    /// Listen address override, from `FINITX_SITE_ADDR`.
    /// Falls back to the Leptos `site-addr` when unset or unparsable.
    pub site_addr: Option<std::net::SocketAddr>,
}

#[cfg(feature = "ssr")]
impl ServerConfig {
    /// Call `dotenvy::dotenv()` before this to load from `.env` file.
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var("RUST_LOG").ok(),
            std::env::var("FINITX_SITE_ADDR").ok(),
        )
    }

    fn from_vars(log_filter: Option<String>, site_addr: Option<String>) -> Self {
        let site_addr = site_addr.and_then(|raw| match raw.parse() {
            Ok(addr) => Some(addr),
            Err(err) => {
                tracing::warn!(value = %raw, error = %err, "ignoring invalid FINITX_SITE_ADDR");
                None
            }
        });
        Self {
            log_filter: log_filter
                .filter(|f| !f.trim().is_empty())
                .unwrap_or_else(|| "info".to_string()),
            site_addr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_api_config() {
        let config = ApiConfig::default();

        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.storage_key, "auth-storage");
        assert!(config.dashboard_url.starts_with("http"));
        assert!(config.obwb_url.starts_with("http"));
    }

    #[test]
    fn test_refresh_url_joins_base() {
        let config = ApiConfig::default().with_dashboard_url("https://api.example.com/");
        assert_eq!(config.refresh_url(), "https://api.example.com/auth/refresh");
    }

    #[test]
    fn test_with_obwb_url() {
        let config = ApiConfig::default().with_obwb_url("https://mail.example.com");
        assert_eq!(config.obwb_url, "https://mail.example.com");
    }

    #[cfg(feature = "ssr")]
    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::from_vars(None, None);
        assert_eq!(config.log_filter, "info");
        assert!(config.site_addr.is_none());
    }

    #[cfg(feature = "ssr")]
    #[test]
    fn test_server_config_parses_addr() {
        let config = ServerConfig::from_vars(
            Some("finitx_dashboard=debug".to_string()),
            Some("0.0.0.0:8080".to_string()),
        );
        assert_eq!(config.log_filter, "finitx_dashboard=debug");
        assert_eq!(config.site_addr, Some("0.0.0.0:8080".parse().unwrap()));
    }

    #[cfg(feature = "ssr")]
    #[test]
    fn test_server_config_ignores_bad_addr() {
        let config = ServerConfig::from_vars(Some("  ".to_string()), Some("nope".to_string()));
        assert_eq!(config.log_filter, "info");
        assert!(config.site_addr.is_none());
    }
}
