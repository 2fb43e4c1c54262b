//! Attachments and file uploads.
//!
//! Attaching a file is a two-step process: [`AttachmentApi::upload`] sends
//! the raw bytes and returns a token, which is then referenced from the
//! `uploads` list of an issue, project file or wiki page payload.
//!
//! ```rust,ignore
//! let upload = client.attachment().upload(std::fs::read("log.txt")?, &params).await?;
//! let token = upload.get("upload").and_then(|u| u.get("token")).cloned();
//! ```

use crate::clients::{DataType, HttpClient, HttpTransport};
use crate::rest::registry::{ApiKind, ResourceApi};
use crate::rest::{build_path, ApiError, RedmineClient};
use crate::wire::{WireMap, WireValue};

use super::{json_body, payload};

/// Handle for `/attachments` and `/uploads`.
#[derive(Debug)]
pub struct AttachmentApi<'a, T: HttpTransport = HttpClient> {
    client: &'a RedmineClient<T>,
}

impl<'a, T: HttpTransport> ResourceApi<'a, T> for AttachmentApi<'a, T> {
    const KIND: ApiKind = ApiKind::Attachment;

    fn new(client: &'a RedmineClient<T>) -> Self {
        Self { client }
    }

    fn client(&self) -> &'a RedmineClient<T> {
        self.client
    }
}

impl<T: HttpTransport> AttachmentApi<'_, T> {
    /// Shows an attachment's metadata.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn show(&self, id: i64) -> Result<WireValue, ApiError> {
        self.client
            .get_value(&format!("/attachments/{id}.json"))
            .await
    }

    /// Downloads an attachment's content as the server sent it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn download(&self, id: i64) -> Result<Vec<u8>, ApiError> {
        let response = self
            .client
            .get_raw(&format!("/attachments/download/{id}"))
            .await?;
        Ok(response.bytes)
    }

    /// Uploads file content and returns the decoded `{"upload": {"token": ..}}`
    /// document.
    ///
    /// `params` may carry `filename` and `content_type`, sent in the query
    /// string.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn upload(
        &self,
        content: impl Into<Vec<u8>>,
        params: &WireMap,
    ) -> Result<WireValue, ApiError> {
        let query = payload(&["filename", "content_type"], params);
        let path = build_path("/uploads.json", &query);
        self.client
            .post(&path, content.into(), DataType::OctetStream)
            .await
    }

    /// Updates an attachment's `filename` or `description`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UnexpectedResponse`] unless the server answers
    /// `204 No Content`.
    pub async fn update(&self, id: i64, params: &WireMap) -> Result<(), ApiError> {
        let body = json_body("attachment", payload(&[], params));
        self.client
            .put(
                &format!("/attachments/{id}.json"),
                body,
                DataType::Json,
                Some(204),
            )
            .await?;
        Ok(())
    }

    /// Deletes an attachment.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn remove(&self, id: i64) -> Result<(), ApiError> {
        self.client
            .delete(&format!("/attachments/{id}.xml"))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::clients::{DataType, HttpMethod};
    use crate::rest::resources::testing::{client, params, FakeTransport};
    use serde_json::json;

    #[tokio::test]
    async fn test_upload_sends_octet_stream() {
        let client = client(
            FakeTransport::new().json(201, r#"{"upload":{"id":7,"token":"7.ed32257a"}}"#),
        );

        let upload = client
            .attachment()
            .upload(b"log line".to_vec(), &params(json!({"filename": "app log.txt"})))
            .await
            .unwrap();

        let request = &client.transport().requests()[0];
        assert_eq!(request.http_method, HttpMethod::Post);
        assert_eq!(request.path, "/uploads.json?filename=app%20log.txt");
        assert_eq!(request.body_type, Some(DataType::OctetStream));
        assert_eq!(request.body.as_deref(), Some(&b"log line"[..]));
        assert_eq!(
            upload.get("upload").and_then(|u| u.get("token")).and_then(|t| t.as_str()),
            Some("7.ed32257a")
        );
    }

    #[tokio::test]
    async fn test_update_requires_no_content() {
        let client = client(FakeTransport::new().json(204, "").json(200, "{}"));
        let attachments = client.attachment();
        let changes = params(json!({"description": "Screenshot"}));

        attachments.update(4, &changes).await.unwrap();
        let error = attachments.update(4, &changes).await.unwrap_err();

        assert_eq!(error.status(), Some(200));
        assert_eq!(
            client.transport().last_body(),
            r#"{"attachment":{"description":"Screenshot"}}"#
        );
    }

    #[tokio::test]
    async fn test_download_returns_raw_body() {
        let client = client(FakeTransport::new().respond(200, "text/plain", "plain content"));

        let content = client.attachment().download(9).await.unwrap();

        assert_eq!(content, b"plain content");
        assert_eq!(
            client.transport().calls()[0].1,
            "/attachments/download/9"
        );
    }
}
