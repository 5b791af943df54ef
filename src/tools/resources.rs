//! Site-as-resource descriptors.
//!
//! Every configured WordPress site is exposed as a resource whose URI
//! names the alias and host, `wordpress://{alias}@{host}`. The resource
//! template list points clients at the discovery tool for the site.

use serde_json::{json, Value};

use crate::config::SiteConfig;

/// Descriptor advertised for one configured site.
pub fn site_descriptor(alias: &str, site: &SiteConfig) -> Value {
    json!({
        "id": alias,
        "name": format!("WordPress Site: {alias}"),
        "type": "wordpress_site",
        "uri": resource_uri(alias, &site.url),
        "metadata": {
            "url": site.url,
            "authType": site.auth_type
        }
    })
}

/// Resource templates for a known site id.
pub fn templates_for(alias: &str) -> Value {
    json!([{
        "id": "claudeus_wp_discover_endpoints_template",
        "name": "Discover Endpoints",
        "description": "Discover available REST API endpoints on this WordPress site",
        "tool": "claudeus_wp_discover_endpoints",
        "arguments": {
            "site": alias
        }
    }])
}

fn resource_uri(alias: &str, url: &str) -> String {
    match reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
    {
        Some(host) => format!("wordpress://{alias}@{host}"),
        None => format!("wordpress://{alias}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthType;

    fn site(url: &str) -> SiteConfig {
        SiteConfig {
            url: url.to_string(),
            username: "admin".to_string(),
            password: "secret".to_string(),
            auth_type: AuthType::Basic,
            capabilities: None,
        }
    }

    #[test]
    fn test_descriptor_shape() {
        let descriptor = site_descriptor("prod", &site("https://blog.example.com"));
        assert_eq!(descriptor["id"], json!("prod"));
        assert_eq!(descriptor["name"], json!("WordPress Site: prod"));
        assert_eq!(descriptor["type"], json!("wordpress_site"));
        assert_eq!(descriptor["uri"], json!("wordpress://prod@blog.example.com"));
        assert_eq!(descriptor["metadata"]["url"], json!("https://blog.example.com"));
        assert_eq!(descriptor["metadata"]["authType"], json!("basic"));
    }

    #[test]
    fn test_uri_drops_port_and_path() {
        let descriptor = site_descriptor("dev", &site("http://localhost:8080/wp"));
        assert_eq!(descriptor["uri"], json!("wordpress://dev@localhost"));
    }

    #[test]
    fn test_templates_reference_discovery_tool() {
        let templates = templates_for("prod");
        assert_eq!(templates[0]["tool"], json!("claudeus_wp_discover_endpoints"));
        assert_eq!(templates[0]["arguments"]["site"], json!("prod"));
        assert_eq!(
            templates[0]["id"],
            json!("claudeus_wp_discover_endpoints_template")
        );
    }
}
