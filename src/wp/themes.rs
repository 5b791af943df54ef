//! Theme endpoints: listing, activation, customization and custom CSS.
//!
//! Customization and CSS ride on the `/settings` endpoint; WordPress
//! keeps the active CSS under the `custom_css` settings key.

use serde_json::{json, Value};

use crate::error::{BridgeError, Result};

use super::WpClient;

impl WpClient {
    /// List installed themes, optionally filtered.
    pub async fn get_themes(&self, filters: Option<&Value>) -> Result<Value> {
        self.get(&self.wp_url("/themes"), filters).await
    }

    /// The currently active theme.
    pub async fn get_active_theme(&self) -> Result<Value> {
        let themes = self
            .get(&self.wp_url("/themes"), Some(&json!({"status": "active"})))
            .await?;
        themes
            .as_array()
            .and_then(|list| list.first())
            .cloned()
            .ok_or(BridgeError::NoActiveTheme)
    }

    /// Activate the theme with the given stylesheet name.
    pub async fn activate_theme(&self, stylesheet: &str) -> Result<Value> {
        self.post(
            &self.wp_url(&format!("/themes/{stylesheet}")),
            &json!({"status": "active"}),
        )
        .await
    }

    /// Current site settings, which carry the theme customization.
    pub async fn get_theme_customization(&self) -> Result<Value> {
        self.get(&self.wp_url("/settings"), None).await
    }

    /// Apply customization updates to the site settings.
    pub async fn update_theme_customization(&self, updates: &Value) -> Result<Value> {
        self.post(&self.wp_url("/settings"), updates).await
    }

    /// Active custom CSS, or an empty string when none is set.
    pub async fn get_custom_css(&self) -> Result<String> {
        let settings = self.get(&self.wp_url("/settings"), None).await?;
        Ok(settings
            .get("custom_css")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string())
    }

    /// Replace the active custom CSS.
    pub async fn update_custom_css(&self, css: &str) -> Result<Value> {
        self.post(&self.wp_url("/settings"), &json!({"custom_css": css}))
            .await
    }
}
