//! Content endpoints: posts, pages and reusable blocks.

use serde_json::Value;

use crate::error::Result;

use super::WpClient;

impl WpClient {
    // === Posts ===

    /// List posts, optionally filtered.
    pub async fn get_posts(&self, filters: Option<&Value>) -> Result<Value> {
        self.get(&self.wp_url("/posts"), filters).await
    }

    /// Create a post from the given payload.
    pub async fn create_post(&self, data: &Value) -> Result<Value> {
        self.post(&self.wp_url("/posts"), data).await
    }

    /// Update an existing post.
    pub async fn update_post(&self, id: i64, data: &Value) -> Result<Value> {
        self.put(&self.wp_url(&format!("/posts/{id}")), data).await
    }

    /// Delete a post (moves it to trash).
    pub async fn delete_post(&self, id: i64) -> Result<Value> {
        self.delete(&self.wp_url(&format!("/posts/{id}"))).await
    }

    // === Pages ===

    /// List pages, optionally filtered.
    pub async fn get_pages(&self, filters: Option<&Value>) -> Result<Value> {
        self.get(&self.wp_url("/pages"), filters).await
    }

    /// Create a page from the given payload.
    pub async fn create_page(&self, data: &Value) -> Result<Value> {
        self.post(&self.wp_url("/pages"), &clean_page_data(data))
            .await
    }

    /// Update an existing page.
    pub async fn update_page(&self, id: i64, data: &Value) -> Result<Value> {
        self.put(&self.wp_url(&format!("/pages/{id}")), &clean_page_data(data))
            .await
    }

    /// Delete a page (moves it to trash).
    pub async fn delete_page(&self, id: i64) -> Result<Value> {
        self.delete(&self.wp_url(&format!("/pages/{id}"))).await
    }

    // === Blocks ===

    /// List reusable blocks, optionally filtered.
    pub async fn get_blocks(&self, filters: Option<&Value>) -> Result<Value> {
        self.get(&self.wp_url("/blocks"), filters).await
    }

    /// Create a reusable block.
    pub async fn create_block(&self, data: &Value) -> Result<Value> {
        self.post(&self.wp_url("/blocks"), data).await
    }

    /// Update a reusable block.
    pub async fn update_block(&self, id: i64, data: &Value) -> Result<Value> {
        self.put(&self.wp_url(&format!("/blocks/{id}")), data).await
    }

    /// Delete a reusable block.
    pub async fn delete_block(&self, id: i64) -> Result<Value> {
        self.delete(&self.wp_url(&format!("/blocks/{id}"))).await
    }

    /// Revision history for a reusable block.
    pub async fn get_block_revisions(&self, id: i64) -> Result<Value> {
        self.get(&self.wp_url(&format!("/blocks/{id}/revisions")), None)
            .await
    }
}

/// WordPress rejects an explicit `template: null` on pages; drop the
/// key rather than sending the null through.
fn clean_page_data(data: &Value) -> Value {
    let mut cleaned = data.clone();
    if let Some(map) = cleaned.as_object_mut() {
        if matches!(map.get("template"), Some(Value::Null)) {
            map.remove("template");
        }
    }
    cleaned
}
