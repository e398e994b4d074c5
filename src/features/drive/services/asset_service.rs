use std::sync::Arc;
use tracing::{debug, error};

use crate::core::error::{AppError, Result};
use crate::modules::drive::{DriveApi, DriveFile};
use crate::shared::constants::{ASSETS_FOLDER_NAME, DEFAULT_FORM_TITLE};

/// Result of a completed asset upload.
#[derive(Debug, Clone)]
pub struct AssetUpload {
    pub url: String,
    pub file_id: String,
    /// Resolved top-level folder id, returned so the caller can cache it
    /// and skip folder resolution on subsequent uploads.
    pub folder_id: String,
}

/// Construct the public view URL for an uploaded file.
/// webContentLink forces a download; this form renders inline.
fn public_view_url(file_id: &str) -> String {
    format!("https://drive.google.com/uc?export=view&id={}", file_id)
}

/// Runs the find-or-create folder pipeline and uploads assets through it.
pub struct AssetService {
    drive: Arc<dyn DriveApi>,
}

impl AssetService {
    pub fn new(drive: Arc<dyn DriveApi>) -> Self {
        Self { drive }
    }

    /// Folders visible to the user, for the destination picker.
    pub async fn list_folders(&self, access_token: &str) -> Result<Vec<DriveFile>> {
        self.drive.list_folders(access_token).await
    }

    /// Upload an asset, resolving the destination first.
    ///
    /// Any provider failure collapses into one generic upload error; the
    /// root cause is only logged. Folders created before a later step
    /// fails are left in place - there is no rollback.
    pub async fn upload_asset(
        &self,
        access_token: &str,
        data: Vec<u8>,
        filename: &str,
        content_type: &str,
        parent_folder_id: Option<String>,
        form_title: &str,
    ) -> Result<AssetUpload> {
        match self
            .run_pipeline(
                access_token,
                data,
                filename,
                content_type,
                parent_folder_id,
                form_title,
            )
            .await
        {
            Ok(upload) => Ok(upload),
            Err(e) => {
                error!("Drive upload error: {}", e);
                Err(AppError::ExternalServiceError(
                    "Failed to upload to Drive. Make sure you are authenticated.".to_string(),
                ))
            }
        }
    }

    /// The pipeline proper: resolve parent folder, resolve assets
    /// subfolder, upload, grant public read.
    async fn run_pipeline(
        &self,
        access_token: &str,
        data: Vec<u8>,
        filename: &str,
        content_type: &str,
        parent_folder_id: Option<String>,
        form_title: &str,
    ) -> Result<AssetUpload> {
        let parent_id = match parent_folder_id.filter(|id| !id.is_empty()) {
            Some(id) => id,
            None => {
                let title = if form_title.is_empty() {
                    DEFAULT_FORM_TITLE
                } else {
                    form_title
                };
                self.resolve_folder(access_token, title, None).await?
            }
        };

        let assets_folder_id = self
            .resolve_folder(access_token, ASSETS_FOLDER_NAME, Some(&parent_id))
            .await?;

        let file_id = self
            .drive
            .upload_file(access_token, filename, content_type, data, &assets_folder_id)
            .await?;

        self.drive.share_public(access_token, &file_id).await?;

        debug!(
            "Asset '{}' uploaded as {} under folder {}",
            filename, file_id, parent_id
        );

        Ok(AssetUpload {
            url: public_view_url(&file_id),
            file_id,
            folder_id: parent_id,
        })
    }

    /// Find a folder by name (first match wins, duplicates are not
    /// disambiguated) or create it.
    async fn resolve_folder(
        &self,
        access_token: &str,
        name: &str,
        parent_id: Option<&str>,
    ) -> Result<String> {
        match self.drive.find_folder(access_token, name, parent_id).await? {
            Some(id) => Ok(id),
            None => self.drive.create_folder(access_token, name, parent_id).await,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::FakeDrive;
    use super::*;

    const TOKEN: &str = "ya29.test";

    #[tokio::test]
    async fn test_upload_with_no_existing_folder_creates_both_levels() {
        let drive = Arc::new(FakeDrive::default());
        let service = AssetService::new(drive.clone());

        let upload = service
            .upload_asset(
                TOKEN,
                b"PNGDATA".to_vec(),
                "logo.png",
                "image/png",
                None,
                "Acme Intake",
            )
            .await
            .unwrap();

        let state = drive.state.lock().unwrap();
        assert_eq!(state.folders_created, 2);
        assert_eq!(state.folders[0].name, "Acme Intake");
        assert_eq!(state.folders[0].parent, None);
        assert_eq!(state.folders[1].name, "Form Assets");
        assert_eq!(state.folders[1].parent, Some(state.folders[0].id.clone()));

        // The file landed in the assets subfolder and was shared.
        assert_eq!(state.files.len(), 1);
        assert_eq!(state.files[0].parent, state.folders[1].id);
        assert_eq!(state.shared, vec![state.files[0].id.clone()]);

        assert_eq!(
            upload.url,
            format!(
                "https://drive.google.com/uc?export=view&id={}",
                state.files[0].id
            )
        );
        assert_eq!(upload.file_id, state.files[0].id);
        assert_eq!(upload.folder_id, state.folders[0].id);
    }

    #[tokio::test]
    async fn test_upload_with_existing_folders_creates_nothing() {
        let drive = Arc::new(
            FakeDrive::default()
                .with_folder("root-1", "Acme Intake", None)
                .with_folder("assets-1", "Form Assets", Some("root-1")),
        );
        let service = AssetService::new(drive.clone());

        let upload = service
            .upload_asset(
                TOKEN,
                b"PNGDATA".to_vec(),
                "cover.png",
                "image/png",
                None,
                "Acme Intake",
            )
            .await
            .unwrap();

        let state = drive.state.lock().unwrap();
        assert_eq!(state.folders_created, 0);
        assert_eq!(upload.folder_id, "root-1");
        assert_eq!(state.files[0].parent, "assets-1");
        assert!(upload.url.contains("uc?export=view&id="));
    }

    #[tokio::test]
    async fn test_known_parent_folder_skips_title_resolution() {
        let drive = Arc::new(FakeDrive::default().with_folder("chosen-1", "My Uploads", None));
        let service = AssetService::new(drive.clone());

        let upload = service
            .upload_asset(
                TOKEN,
                b"DATA".to_vec(),
                "logo.png",
                "image/png",
                Some("chosen-1".to_string()),
                "Ignored Title",
            )
            .await
            .unwrap();

        let state = drive.state.lock().unwrap();
        // Only the assets subfolder was created, under the supplied parent.
        assert_eq!(state.folders_created, 1);
        assert_eq!(state.folders[1].name, "Form Assets");
        assert_eq!(state.folders[1].parent, Some("chosen-1".to_string()));
        assert_eq!(upload.folder_id, "chosen-1");
    }

    #[tokio::test]
    async fn test_empty_title_falls_back_to_default() {
        let drive = Arc::new(FakeDrive::default());
        let service = AssetService::new(drive.clone());

        service
            .upload_asset(TOKEN, b"DATA".to_vec(), "logo.png", "image/png", None, "")
            .await
            .unwrap();

        let state = drive.state.lock().unwrap();
        assert_eq!(state.folders[0].name, DEFAULT_FORM_TITLE);
    }

    #[tokio::test]
    async fn test_provider_failure_collapses_to_generic_error() {
        let drive = Arc::new(FakeDrive {
            fail_uploads: true,
            ..FakeDrive::default()
        });
        let service = AssetService::new(drive.clone());

        let err = service
            .upload_asset(
                TOKEN,
                b"DATA".to_vec(),
                "logo.png",
                "image/png",
                None,
                "Acme Intake",
            )
            .await
            .unwrap_err();

        match err {
            AppError::ExternalServiceError(msg) => {
                // Root cause (quota) is hidden from the caller.
                assert_eq!(msg, "Failed to upload to Drive. Make sure you are authenticated.");
            }
            other => panic!("unexpected error: {:?}", other),
        }

        // The folders created before the failing upload are not rolled back.
        let state = drive.state.lock().unwrap();
        assert_eq!(state.folders_created, 2);
        assert!(state.files.is_empty());
    }
}
