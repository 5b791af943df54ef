//! Media library endpoints, including the multipart upload.

use reqwest::multipart::{Form, Part};
use serde_json::Value;

use crate::error::Result;

use super::WpClient;

impl WpClient {
    /// List media items, optionally filtered.
    pub async fn get_media(&self, filters: Option<&Value>) -> Result<Value> {
        self.get(&self.wp_url("/media"), filters).await
    }

    /// Upload a new attachment.
    ///
    /// The file content travels as the `file` multipart field; optional
    /// metadata fields ride along as plain text parts. WordPress also
    /// wants the filename repeated in a `Content-Disposition` request
    /// header or it stores the upload under a generated name.
    pub async fn upload_media(
        &self,
        file: String,
        filename: &str,
        data: Option<&Value>,
    ) -> Result<Value> {
        let part = Part::bytes(file.into_bytes()).file_name(filename.to_string());
        let mut form = Form::new().part("file", part);

        if let Some(map) = data.and_then(Value::as_object) {
            for (key, value) in map {
                let text = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                form = form.text(key.clone(), text);
            }
        }

        let request = self
            .request_post(&self.wp_url("/media"))
            .header(
                "Content-Disposition",
                format!("attachment; filename=\"{filename}\""),
            )
            .multipart(form);
        Ok(self.send(request).await?.json().await?)
    }

    /// Update attachment metadata.
    pub async fn update_media(&self, id: i64, data: &Value) -> Result<Value> {
        self.put(&self.wp_url(&format!("/media/{id}")), data).await
    }

    /// Delete an attachment; `force` skips the trash.
    pub async fn delete_media(&self, id: i64, force: bool) -> Result<Value> {
        let suffix = if force { "?force=true" } else { "" };
        self.delete(&self.wp_url(&format!("/media/{id}{suffix}")))
            .await
    }
}
