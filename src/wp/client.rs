//! HTTP plumbing shared by every WordPress endpoint group.
//!
//! One [`WpClient`] is built per configured site. It owns the reqwest
//! client, applies the site's credentials and turns non-2xx responses
//! into [`BridgeError`] variants whose `Display` text is the message
//! the caller sees:
//!
//! - response carries a `{code, message}` error body -> `Api`
//! - response has no parseable error body -> `Http(status)`
//! - the request never produced a status -> `Network`
//!
//! Endpoint groups (content, media, themes, shop) live in sibling
//! modules as further `impl WpClient` blocks on top of this plumbing.

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::{AuthType, SiteConfig};
use crate::error::{BridgeError, Result};

/// Core WordPress REST prefix.
const WP_PREFIX: &str = "/wp-json/wp/v2";

/// WooCommerce REST prefix.
const WC_PREFIX: &str = "/wp-json/wc/v3";

/// Request timeout for all WordPress calls.
const TIMEOUT_SECS: u64 = 30;

/// Pagination totals reported by list endpoints through response headers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListTotals {
    /// Total matching items (`X-WP-Total`).
    pub total: i64,
    /// Total pages at the requested page size (`X-WP-TotalPages`).
    pub total_pages: i64,
}

/// Error body WordPress attaches to failed requests.
#[derive(Debug, Deserialize)]
struct WpErrorBody {
    code: String,
    message: String,
}

/// Authenticated client for a single WordPress site.
#[derive(Debug)]
pub struct WpClient {
    alias: String,
    site: SiteConfig,
    http: Client,
}

impl WpClient {
    /// Build a client for one site.
    pub fn new(alias: &str, site: SiteConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()
            .map_err(|e| BridgeError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            alias: alias.to_string(),
            site,
            http,
        })
    }

    /// Site alias this client serves.
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Site configuration backing this client.
    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    /// Probe the REST root for the endpoint index.
    pub async fn discover_endpoints(&self) -> Result<Value> {
        self.get(&format!("{}/wp-json/", self.site.url), None).await
    }

    // === URL helpers ===

    /// Absolute URL under the core `wp/v2` namespace.
    pub(crate) fn wp_url(&self, path: &str) -> String {
        format!("{}{}{}", self.site.url, WP_PREFIX, path)
    }

    /// Absolute URL under the WooCommerce `wc/v3` namespace.
    pub(crate) fn wc_url(&self, path: &str) -> String {
        format!("{}{}{}", self.site.url, WC_PREFIX, path)
    }

    // === Request plumbing ===

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.site.auth_type {
            AuthType::Basic => request.basic_auth(&self.site.username, Some(&self.site.password)),
            // JWT sites carry the token in the password slot.
            AuthType::Jwt => request.bearer_auth(&self.site.password),
        }
    }

    /// Send an authorized request and map non-2xx statuses to errors.
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(site = %self.alias, status = status.as_u16(), "WordPress request failed");
        Err(match serde_json::from_str::<WpErrorBody>(&body) {
            Ok(err) => BridgeError::Api {
                code: err.code,
                message: err.message,
            },
            Err(_) => BridgeError::Http(status.as_u16()),
        })
    }

    pub(crate) async fn get(&self, url: &str, filters: Option<&Value>) -> Result<Value> {
        let mut request = self.http.get(url);
        if let Some(filters) = filters {
            request = request.query(&query_pairs(filters));
        }
        Ok(self.send(request).await?.json().await?)
    }

    /// GET that also returns the pagination headers of list endpoints.
    pub(crate) async fn get_with_totals(
        &self,
        url: &str,
        filters: Option<&Value>,
    ) -> Result<(Value, ListTotals)> {
        let mut request = self.http.get(url);
        if let Some(filters) = filters {
            request = request.query(&query_pairs(filters));
        }
        let response = self.send(request).await?;
        let totals = list_totals(response.headers());
        Ok((response.json().await?, totals))
    }

    pub(crate) async fn post(&self, url: &str, body: &Value) -> Result<Value> {
        Ok(self.send(self.http.post(url).json(body)).await?.json().await?)
    }

    pub(crate) async fn put(&self, url: &str, body: &Value) -> Result<Value> {
        Ok(self.send(self.http.put(url).json(body)).await?.json().await?)
    }

    pub(crate) async fn delete(&self, url: &str) -> Result<Value> {
        Ok(self.send(self.http.delete(url)).await?.json().await?)
    }

    /// Raw request builder for requests the helpers above cannot express,
    /// currently only the multipart media upload.
    pub(crate) fn request_post(&self, url: &str) -> RequestBuilder {
        self.http.post(url)
    }
}

/// Flatten a filter object into query pairs; arrays repeat the key,
/// nulls and nested objects are dropped.
fn query_pairs(filters: &Value) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    if let Some(map) = filters.as_object() {
        for (key, value) in map {
            match value {
                Value::Null | Value::Object(_) => {}
                Value::Array(items) => {
                    for item in items {
                        pairs.push((key.clone(), scalar_text(item)));
                    }
                }
                other => pairs.push((key.clone(), scalar_text(other))),
            }
        }
    }
    pairs
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Read `X-WP-Total` / `X-WP-TotalPages`, tolerating their absence.
fn list_totals(headers: &HeaderMap) -> ListTotals {
    let header_i64 = |name: &str, fallback: i64| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(fallback)
    };

    ListTotals {
        total: header_i64("x-wp-total", 0),
        total_pages: header_i64("x-wp-totalpages", 1),
    }
}
