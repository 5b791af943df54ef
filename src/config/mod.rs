//! Configuration management.
//!
//! Two layers:
//! - bridge settings (transport choice, SSE bind address, log filter)
//!   from a TOML file and `WP_BRIDGE_*` environment variables
//! - the site inventory, a JSON file named by `WP_SITES_PATH`, keyed by
//!   alias with `URL`/`USER`/`PASS` credentials per site
//!
//! Site entries are validated individually: an entry missing a required
//! field is skipped with an error log rather than failing the load, but
//! an unparseable URL is fatal and an empty inventory refuses to start.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;

use crate::error::{BridgeError, Result};

/// Site alias used when a tool call does not name one.
pub const DEFAULT_SITE: &str = "default_test";

/// How the bridge authenticates against a site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    /// HTTP Basic with base64 `user:password`.
    #[default]
    Basic,
    /// JWT bearer token; the password field carries the token.
    Jwt,
}

/// One configured WordPress site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Base URL of the WordPress install.
    #[serde(rename = "URL")]
    pub url: String,

    /// Account the bridge acts as.
    #[serde(rename = "USER")]
    pub username: String,

    /// Application password, or the JWT token for `authType: jwt`.
    #[serde(rename = "PASS")]
    pub password: String,

    /// Authentication scheme.
    #[serde(rename = "authType", default)]
    pub auth_type: AuthType,

    /// Per-category tool permissions; absent allows everything.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<Value>,
}

/// Load the site inventory from the file named by `WP_SITES_PATH`.
pub fn load_sites_from_env() -> Result<HashMap<String, SiteConfig>> {
    let path = std::env::var("WP_SITES_PATH").map_err(|_| {
        BridgeError::Config("WP_SITES_PATH environment variable is required".to_string())
    })?;
    load_sites(Path::new(&path))
}

/// Load and normalize the site inventory from a JSON file.
pub fn load_sites(path: &Path) -> Result<HashMap<String, SiteConfig>> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            BridgeError::Config(format!("Config file not found at: {}", path.display()))
        } else {
            BridgeError::Io(e)
        }
    })?;
    parse_sites(&raw)
}

fn parse_sites(raw: &str) -> Result<HashMap<String, SiteConfig>> {
    let entries: HashMap<String, Value> = serde_json::from_str(raw)?;

    let mut sites = HashMap::new();
    for (alias, value) in entries {
        let mut site: SiteConfig = match serde_json::from_value(value) {
            Ok(site) => site,
            Err(e) => {
                error!(site = %alias, error = %e, "Invalid configuration for site, skipping");
                continue;
            }
        };
        if site.url.is_empty() || site.username.is_empty() || site.password.is_empty() {
            error!(site = %alias, "Invalid configuration for site: missing required fields");
            continue;
        }
        site.url = normalize_url(&site.url)?;
        sites.insert(alias.to_lowercase(), site);
    }

    if sites.is_empty() {
        return Err(BridgeError::Config(
            "No valid site configurations found".to_string(),
        ));
    }
    Ok(sites)
}

/// Prepend a scheme when missing, verify the URL parses, strip any
/// trailing slash.
fn normalize_url(url: &str) -> Result<String> {
    let with_scheme = if url.starts_with("http") {
        url.to_string()
    } else {
        format!("http://{url}")
    };
    reqwest::Url::parse(&with_scheme)
        .map_err(|e| BridgeError::Config(format!("Invalid site URL: {url} - {e}")))?;
    Ok(with_scheme.trim_end_matches('/').to_string())
}

/// Bridge settings loaded from TOML and `WP_BRIDGE_*` variables.
///
/// Fields omitted from the file fall back to their defaults, so a
/// config file may name only the settings it overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Transport `serve` starts when none is named: `stdio` or `sse`.
    pub transport: String,

    /// Host the SSE binding listens on.
    pub host: String,

    /// Port the SSE binding listens on.
    pub port: u16,

    /// Site inventory path, overriding `WP_SITES_PATH`.
    pub sites_path: Option<PathBuf>,

    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            transport: "stdio".to_string(),
            host: "127.0.0.1".to_string(),
            port: 3000,
            sites_path: None,
            log_level: "info".to_string(),
        }
    }
}

impl BridgeConfig {
    /// Load settings from a TOML file.
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| BridgeError::Config(format!("Failed to read config file: {e}")))?;

        toml::from_str(&content)
            .map_err(|e| BridgeError::Config(format!("Failed to parse config: {e}")))
    }

    /// Load settings from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(transport) = std::env::var("WP_BRIDGE_TRANSPORT") {
            config.transport = transport;
        }
        if let Ok(host) = std::env::var("WP_BRIDGE_HOST") {
            config.host = host;
        }
        if let Ok(port) = std::env::var("WP_BRIDGE_PORT") {
            if let Ok(port) = port.parse() {
                config.port = port;
            }
        }
        if let Ok(path) = std::env::var("WP_SITES_PATH") {
            config.sites_path = Some(PathBuf::from(path));
        }
        if let Ok(level) = std::env::var("WP_BRIDGE_LOG") {
            config.log_level = level;
        }

        config
    }

    /// Merge with another config (other takes precedence).
    pub fn merge(self, other: Self) -> Self {
        let defaults = Self::default();
        Self {
            transport: if other.transport != defaults.transport {
                other.transport
            } else {
                self.transport
            },
            host: if other.host != defaults.host {
                other.host
            } else {
                self.host
            },
            port: if other.port != defaults.port {
                other.port
            } else {
                self.port
            },
            sites_path: other.sites_path.or(self.sites_path),
            log_level: if other.log_level != defaults.log_level {
                other.log_level
            } else {
                self.log_level
            },
        }
    }

    /// Full SSE listen address.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Default config file location (`<config dir>/wp-bridge/config.toml`).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("wp-bridge").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BridgeConfig::default();
        assert_eq!(config.transport, "stdio");
        assert_eq!(config.listen_addr(), "127.0.0.1:3000");
        assert!(config.sites_path.is_none());
    }

    #[test]
    fn test_config_from_toml() {
        let toml = r#"
            transport = "sse"
            host = "0.0.0.0"
            port = 8765
            log_level = "debug"
        "#;

        let config: BridgeConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.transport, "sse");
        assert_eq!(config.listen_addr(), "0.0.0.0:8765");
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_config_from_partial_toml() {
        let config: BridgeConfig = toml::from_str(r#"transport = "sse""#).unwrap();
        assert_eq!(config.transport, "sse");
        assert_eq!(config.port, 3000);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_merge_prefers_non_default_other() {
        let base = BridgeConfig {
            transport: "sse".to_string(),
            port: 9000,
            ..BridgeConfig::default()
        };
        let overlay = BridgeConfig {
            port: 9001,
            ..BridgeConfig::default()
        };
        let merged = base.merge(overlay);
        assert_eq!(merged.transport, "sse");
        assert_eq!(merged.port, 9001);
    }

    #[test]
    fn test_parse_sites_normalizes() {
        let raw = r#"{
            "Main": {"URL": "example.com/", "USER": "admin", "PASS": "pw"},
            "shop": {"URL": "https://shop.example.com", "USER": "bot", "PASS": "pw", "authType": "jwt"}
        }"#;
        let sites = parse_sites(raw).unwrap();
        assert_eq!(sites.len(), 2);
        let main = &sites["main"];
        assert_eq!(main.url, "http://example.com");
        assert_eq!(main.auth_type, AuthType::Basic);
        assert_eq!(sites["shop"].auth_type, AuthType::Jwt);
    }

    #[test]
    fn test_parse_sites_skips_incomplete_entries() {
        let raw = r#"{
            "broken": {"URL": "example.com"},
            "ok": {"URL": "example.com", "USER": "admin", "PASS": "pw"}
        }"#;
        let sites = parse_sites(raw).unwrap();
        assert_eq!(sites.len(), 1);
        assert!(sites.contains_key("ok"));
    }

    #[test]
    fn test_parse_sites_empty_is_an_error() {
        let err = parse_sites("{}").unwrap_err();
        assert!(err
            .to_string()
            .contains("No valid site configurations found"));
    }

    #[test]
    fn test_parse_sites_keeps_capabilities() {
        let raw = r#"{
            "main": {
                "URL": "example.com", "USER": "admin", "PASS": "pw",
                "capabilities": {"shop": {"claudeus_wp_shop__get_orders": false}}
            }
        }"#;
        let sites = parse_sites(raw).unwrap();
        let caps = sites["main"].capabilities.as_ref().unwrap();
        assert_eq!(
            caps["shop"]["claudeus_wp_shop__get_orders"],
            serde_json::json!(false)
        );
    }

    #[test]
    fn test_bad_url_is_fatal() {
        let raw = r#"{"main": {"URL": "http://", "USER": "a", "PASS": "b"}}"#;
        let err = parse_sites(raw).unwrap_err();
        assert!(err.to_string().contains("Invalid site URL"));
    }
}
