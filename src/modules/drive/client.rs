use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::core::config::DriveConfig;
use crate::core::error::{AppError, Result};
use crate::modules::drive::model::{DriveFile, DriveFileIdList, DriveFileList, DriveFileId};
use crate::shared::constants::DRIVE_FOLDER_MIME_TYPE;

/// Boundary marker for multipart/related upload bodies.
const UPLOAD_BOUNDARY: &str = "formdrop_upload_boundary";

/// Provider operations the asset pipeline depends on.
///
/// Implemented by [`DriveClient`] against the live API and by in-memory
/// fakes in tests. All calls act on behalf of the user owning the passed
/// OAuth access token.
#[async_trait]
pub trait DriveApi: Send + Sync {
    /// List folders visible to the user, for the destination picker.
    async fn list_folders(&self, access_token: &str) -> Result<Vec<DriveFile>>;

    /// Look up a non-trashed folder by exact name, optionally under a
    /// parent. Returns the first match in listing order; duplicates are
    /// not disambiguated.
    async fn find_folder(
        &self,
        access_token: &str,
        name: &str,
        parent_id: Option<&str>,
    ) -> Result<Option<String>>;

    /// Create a folder, optionally under a parent, returning its id.
    async fn create_folder(
        &self,
        access_token: &str,
        name: &str,
        parent_id: Option<&str>,
    ) -> Result<String>;

    /// Upload file bytes into a parent folder, returning the new file id.
    async fn upload_file(
        &self,
        access_token: &str,
        name: &str,
        content_type: &str,
        data: Vec<u8>,
        parent_id: &str,
    ) -> Result<String>;

    /// Grant "reader" access to "anyone" on a file. There is no revocation
    /// path; callers treat this as irreversible.
    async fn share_public(&self, access_token: &str, file_id: &str) -> Result<()>;
}

/// Google Drive v3 REST client.
pub struct DriveClient {
    client: reqwest::Client,
    api_base_url: String,
    upload_base_url: String,
}

impl DriveClient {
    pub fn new(config: DriveConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base_url: config.api_base_url,
            upload_base_url: config.upload_base_url,
        })
    }

    /// Escape a value for embedding in a Drive `q` string literal.
    /// Only single quotes need escaping inside single-quoted terms.
    fn escape_query_value(value: &str) -> String {
        value.replace('\'', "\\'")
    }

    /// Build the `q` expression for a folder-by-name lookup.
    fn folder_query(name: &str, parent_id: Option<&str>) -> String {
        let mut q = format!(
            "name = '{}' and mimeType = '{}' and trashed = false",
            Self::escape_query_value(name),
            DRIVE_FOLDER_MIME_TYPE
        );
        if let Some(parent) = parent_id {
            q.push_str(&format!(" and '{}' in parents", Self::escape_query_value(parent)));
        }
        q
    }

    /// Assemble a multipart/related body: a JSON metadata part followed by
    /// the media part, as expected by `uploadType=multipart`.
    fn build_multipart_related(metadata: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
        let mut body = Vec::with_capacity(data.len() + metadata.len() + 256);
        body.extend_from_slice(
            format!(
                "--{UPLOAD_BOUNDARY}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{metadata}\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(
            format!("--{UPLOAD_BOUNDARY}\r\nContent-Type: {content_type}\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{UPLOAD_BOUNDARY}--\r\n").as_bytes());
        body
    }

    /// Map a non-success Drive response into an error carrying status + body.
    async fn provider_error(context: &str, response: reqwest::Response) -> AppError {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        AppError::ExternalServiceError(format!("{}: HTTP {} - {}", context, status, body))
    }
}

#[async_trait]
impl DriveApi for DriveClient {
    async fn list_folders(&self, access_token: &str) -> Result<Vec<DriveFile>> {
        let q = format!("mimeType = '{}' and trashed = false", DRIVE_FOLDER_MIME_TYPE);
        let response = self
            .client
            .get(format!("{}/files", self.api_base_url))
            .bearer_auth(access_token)
            .query(&[
                ("q", q.as_str()),
                ("fields", "files(id, name, mimeType)"),
                ("pageSize", "100"),
                ("orderBy", "name"),
            ])
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("Drive folder listing failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(Self::provider_error("Drive folder listing failed", response).await);
        }

        let list: DriveFileList = response.json().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Failed to parse Drive folder list: {}", e))
        })?;

        Ok(list.files)
    }

    async fn find_folder(
        &self,
        access_token: &str,
        name: &str,
        parent_id: Option<&str>,
    ) -> Result<Option<String>> {
        let q = Self::folder_query(name, parent_id);
        debug!("Drive folder lookup: {}", q);

        let response = self
            .client
            .get(format!("{}/files", self.api_base_url))
            .bearer_auth(access_token)
            .query(&[("q", q.as_str()), ("fields", "files(id)"), ("pageSize", "1")])
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("Drive folder lookup failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(Self::provider_error("Drive folder lookup failed", response).await);
        }

        let list: DriveFileIdList = response.json().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Failed to parse Drive lookup response: {}", e))
        })?;

        Ok(list.files.into_iter().next().map(|f| f.id))
    }

    async fn create_folder(
        &self,
        access_token: &str,
        name: &str,
        parent_id: Option<&str>,
    ) -> Result<String> {
        let mut metadata = json!({
            "name": name,
            "mimeType": DRIVE_FOLDER_MIME_TYPE,
        });
        if let Some(parent) = parent_id {
            metadata["parents"] = json!([parent]);
        }

        let response = self
            .client
            .post(format!("{}/files", self.api_base_url))
            .bearer_auth(access_token)
            .query(&[("fields", "id")])
            .json(&metadata)
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("Drive folder creation failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(Self::provider_error("Drive folder creation failed", response).await);
        }

        let created: DriveFileId = response.json().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Failed to parse Drive create response: {}", e))
        })?;

        debug!("Created Drive folder '{}' ({})", name, created.id);
        Ok(created.id)
    }

    async fn upload_file(
        &self,
        access_token: &str,
        name: &str,
        content_type: &str,
        data: Vec<u8>,
        parent_id: &str,
    ) -> Result<String> {
        let metadata = json!({
            "name": name,
            "parents": [parent_id],
        })
        .to_string();

        let body = Self::build_multipart_related(&metadata, content_type, &data);

        let response = self
            .client
            .post(format!("{}/files", self.upload_base_url))
            .bearer_auth(access_token)
            .query(&[("uploadType", "multipart"), ("fields", "id")])
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("multipart/related; boundary={}", UPLOAD_BOUNDARY),
            )
            .body(body)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Drive upload failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::provider_error("Drive upload failed", response).await);
        }

        let created: DriveFileId = response.json().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Failed to parse Drive upload response: {}", e))
        })?;

        debug!("Uploaded '{}' to Drive folder {} as {}", name, parent_id, created.id);
        Ok(created.id)
    }

    async fn share_public(&self, access_token: &str, file_id: &str) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/files/{}/permissions", self.api_base_url, file_id))
            .bearer_auth(access_token)
            .json(&json!({
                "role": "reader",
                "type": "anyone",
            }))
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("Drive permission grant failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(Self::provider_error("Drive permission grant failed", response).await);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_query_without_parent() {
        let q = DriveClient::folder_query("Acme Intake", None);
        assert_eq!(
            q,
            "name = 'Acme Intake' and mimeType = 'application/vnd.google-apps.folder' and trashed = false"
        );
    }

    #[test]
    fn test_folder_query_with_parent() {
        let q = DriveClient::folder_query("Form Assets", Some("parent-123"));
        assert!(q.ends_with("and 'parent-123' in parents"));
        assert!(q.contains("name = 'Form Assets'"));
    }

    #[test]
    fn test_folder_query_escapes_single_quotes() {
        let q = DriveClient::folder_query("Bob's Forms", None);
        assert!(q.starts_with("name = 'Bob\\'s Forms'"));
    }

    #[test]
    fn test_multipart_related_body_layout() {
        let body =
            DriveClient::build_multipart_related(r#"{"name":"logo.png"}"#, "image/png", b"PNGDATA");
        let text = String::from_utf8_lossy(&body);

        // Metadata part comes first, media part second, then the closing marker.
        let metadata_pos = text.find(r#"{"name":"logo.png"}"#).unwrap();
        let media_pos = text.find("PNGDATA").unwrap();
        assert!(metadata_pos < media_pos);
        assert!(text.contains("Content-Type: application/json; charset=UTF-8"));
        assert!(text.contains("Content-Type: image/png"));
        assert!(text.trim_end().ends_with(&format!("--{}--", UPLOAD_BOUNDARY)));
    }
}
