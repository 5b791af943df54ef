//! Site inventory and bridge settings loading tests.
//!
//! These tests go through real files on disk, the same path the CLI
//! takes, rather than in-memory parsing.

use std::io::Write;

use tempfile::NamedTempFile;
use wp_bridge::config::{load_sites, AuthType, BridgeConfig};
use wp_bridge::wp::SiteRegistry;

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Test loading a realistic inventory file
#[test]
fn test_load_sites_from_file() {
    let file = write_temp(
        r#"{
            "Prod": {
                "URL": "blog.example.com/",
                "USER": "publisher",
                "PASS": "app-password"
            },
            "staging": {
                "URL": "https://staging.example.com",
                "USER": "bot",
                "PASS": "token-123",
                "authType": "jwt",
                "capabilities": {
                    "posts": {"claudeus_wp_content__delete_post": false}
                }
            }
        }"#,
    );

    let sites = load_sites(file.path()).unwrap();
    assert_eq!(sites.len(), 2);

    // Aliases are lowercased, URLs get a scheme and lose the trailing slash.
    let prod = &sites["prod"];
    assert_eq!(prod.url, "http://blog.example.com");
    assert_eq!(prod.auth_type, AuthType::Basic);

    let staging = &sites["staging"];
    assert_eq!(staging.auth_type, AuthType::Jwt);
    assert!(staging.capabilities.is_some());
}

/// Test that incomplete entries are skipped but the load succeeds
#[test]
fn test_load_sites_skips_broken_entries() {
    let file = write_temp(
        r#"{
            "no_password": {"URL": "example.com", "USER": "admin"},
            "ok": {"URL": "example.com", "USER": "admin", "PASS": "pw"}
        }"#,
    );

    let sites = load_sites(file.path()).unwrap();
    assert_eq!(sites.len(), 1);
    assert!(sites.contains_key("ok"));
}

/// Test the missing-file error message
#[test]
fn test_load_sites_missing_file() {
    let err = load_sites(std::path::Path::new("/nonexistent/wp-sites.json")).unwrap_err();
    assert!(err.to_string().contains("Config file not found at:"));
}

/// Test that an inventory with no usable site refuses to load
#[test]
fn test_load_sites_requires_one_valid_site() {
    let file = write_temp(r#"{"broken": {"URL": "example.com"}}"#);
    let err = load_sites(file.path()).unwrap_err();
    assert!(err.to_string().contains("No valid site configurations found"));
}

/// Test building the registry from a loaded inventory
#[test]
fn test_registry_from_inventory() {
    let file = write_temp(
        r#"{
            "alpha": {"URL": "alpha.example.com", "USER": "a", "PASS": "pw"},
            "beta": {"URL": "beta.example.com", "USER": "b", "PASS": "pw"}
        }"#,
    );

    let registry = SiteRegistry::new(load_sites(file.path()).unwrap()).unwrap();
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.aliases(), vec!["alpha", "beta"]);
    assert!(registry.get("alpha").is_ok());

    let err = registry.get("gamma").unwrap_err();
    assert_eq!(err.to_string(), "Unknown site: gamma");
}

/// Test bridge settings from a TOML file
#[test]
fn test_bridge_config_from_file() {
    let file = write_temp(
        r#"
transport = "sse"
host = "0.0.0.0"
port = 8080
log_level = "debug"
"#,
    );

    let config = BridgeConfig::from_file(file.path()).unwrap();
    assert_eq!(config.transport, "sse");
    assert_eq!(config.listen_addr(), "0.0.0.0:8080");
    assert_eq!(config.log_level, "debug");
}

/// Test that a file naming only some settings keeps defaults for the rest
#[test]
fn test_bridge_config_partial_file() {
    let file = write_temp(r#"port = 9090"#);

    let config = BridgeConfig::from_file(file.path()).unwrap();
    assert_eq!(config.port, 9090);
    assert_eq!(config.transport, "stdio");
    assert_eq!(config.host, "127.0.0.1");
}

/// Test the unparseable-config error message
#[test]
fn test_bridge_config_rejects_bad_toml() {
    let file = write_temp("transport = [not toml");
    let err = BridgeConfig::from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config"));
}
