use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::modules::drive::DriveFile;

/// A Drive folder available as an upload destination
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DriveFolderDto {
    pub id: String,
    pub name: String,
    pub mime_type: Option<String>,
}

impl From<DriveFile> for DriveFolderDto {
    fn from(f: DriveFile) -> Self {
        Self {
            id: f.id,
            name: f.name,
            mime_type: f.mime_type,
        }
    }
}

/// Short-lived access token handed to the client-side picker
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DriveTokenResponseDto {
    pub access_token: String,
}

/// Upload asset request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadAssetDto {
    /// The asset file to upload
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
    /// Known destination folder id; when absent the folder is resolved
    /// from the form title
    pub parent_folder_id: Option<String>,
    /// Form title used to find or create the destination folder
    pub form_title: Option<String>,
}

/// Result of an asset upload
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetUploadResponseDto {
    /// Public view URL for embedding the asset
    pub url: String,
    /// Raw Drive file id
    pub file_id: String,
    /// Resolved top-level folder id, cached by the caller to skip
    /// re-resolving on subsequent uploads
    pub folder_id: String,
}

/// Maximum asset size in bytes (10MB)
pub const MAX_ASSET_SIZE: usize = 10 * 1024 * 1024;
