//! WordPress REST clients, one per configured site.
//!
//! [`WpClient`] carries the HTTP plumbing; the endpoint groups are
//! spread over submodules as `impl` blocks:
//!
//! - [`content`]: posts, pages, reusable blocks
//! - [`media`]: media library and uploads
//! - [`themes`]: themes, customization, custom CSS
//! - [`shop`]: WooCommerce products, orders, sales reports
//!
//! [`SiteRegistry`] owns the clients and resolves site aliases for the
//! dispatcher.

pub mod client;
pub mod content;
pub mod media;
pub mod shop;
pub mod themes;

pub use client::{ListTotals, WpClient};

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::SiteConfig;
use crate::error::{BridgeError, Result};

/// All connected sites, keyed by alias.
pub struct SiteRegistry {
    clients: HashMap<String, Arc<WpClient>>,
}

impl SiteRegistry {
    /// Build one client per configured site.
    pub fn new(sites: HashMap<String, SiteConfig>) -> Result<Self> {
        let mut clients = HashMap::new();
        for (alias, site) in sites {
            let client = WpClient::new(&alias, site)?;
            clients.insert(alias, Arc::new(client));
        }
        Ok(Self { clients })
    }

    /// Resolve an alias to its client.
    pub fn get(&self, alias: &str) -> Result<Arc<WpClient>> {
        self.clients
            .get(alias)
            .cloned()
            .ok_or_else(|| BridgeError::UnknownSite(alias.to_string()))
    }

    /// Configuration of one site, if the alias is known.
    pub fn site(&self, alias: &str) -> Option<&SiteConfig> {
        self.clients.get(alias).map(|client| client.site())
    }

    /// Configured aliases in stable order.
    pub fn aliases(&self) -> Vec<&str> {
        let mut aliases: Vec<&str> = self.clients.keys().map(String::as_str).collect();
        aliases.sort_unstable();
        aliases
    }

    /// Number of configured sites.
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// True when no sites are configured.
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthType;

    fn test_sites() -> HashMap<String, SiteConfig> {
        let site = |url: &str| SiteConfig {
            url: url.to_string(),
            username: "admin".to_string(),
            password: "secret".to_string(),
            auth_type: AuthType::Basic,
            capabilities: None,
        };

        let mut sites = HashMap::new();
        sites.insert("default_test".to_string(), site("http://wp.local"));
        sites.insert("blog".to_string(), site("http://blog.local"));
        sites.insert("shop".to_string(), site("http://shop.local"));
        sites
    }

    #[test]
    fn test_registry_resolves_known_alias() {
        let registry = SiteRegistry::new(test_sites()).unwrap();
        let client = registry.get("blog").unwrap();
        assert_eq!(client.alias(), "blog");
        assert_eq!(client.site().url, "http://blog.local");
    }

    #[test]
    fn test_registry_unknown_alias_error_text() {
        let registry = SiteRegistry::new(test_sites()).unwrap();
        let err = registry.get("missing").unwrap_err();
        assert_eq!(err.to_string(), "Unknown site: missing");
    }

    #[test]
    fn test_registry_aliases_sorted() {
        let registry = SiteRegistry::new(test_sites()).unwrap();
        assert_eq!(registry.aliases(), vec!["blog", "default_test", "shop"]);
        assert_eq!(registry.len(), 3);
        assert!(!registry.is_empty());
    }
}
