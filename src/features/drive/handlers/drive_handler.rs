use axum::{
    extract::{Multipart, State},
    Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::drive::dtos::{
    AssetUploadResponseDto, DriveFolderDto, DriveTokenResponseDto, UploadAssetDto,
};
use crate::features::drive::services::AssetService;
use crate::shared::types::ApiResponse;

const NO_TOKEN_MESSAGE: &str = "No access token available. Please sign in again.";

/// List Drive folders available to the signed-in user
#[utoipa::path(
    get,
    path = "/api/drive/folders",
    tag = "drive",
    responses(
        (status = 200, description = "Folders visible to the user", body = ApiResponse<Vec<DriveFolderDto>>),
        (status = 401, description = "Authentication required or no Drive token"),
        (status = 502, description = "Drive listing failed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_drive_folders(
    user: AuthenticatedUser,
    State(service): State<Arc<AssetService>>,
) -> Result<Json<ApiResponse<Vec<DriveFolderDto>>>, AppError> {
    let token = user
        .drive_token()
        .ok_or_else(|| AppError::Auth(NO_TOKEN_MESSAGE.to_string()))?;

    let folders = service.list_folders(token).await?;
    let folders: Vec<DriveFolderDto> = folders.into_iter().map(DriveFolderDto::from).collect();

    Ok(Json(ApiResponse::success(Some(folders), None, None)))
}

/// Short-lived access token for the client-side folder picker
#[utoipa::path(
    get,
    path = "/api/drive/token",
    tag = "drive",
    responses(
        (status = 200, description = "Access token", body = ApiResponse<DriveTokenResponseDto>),
        (status = 401, description = "Authentication required or no Drive token")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_drive_token(
    user: AuthenticatedUser,
) -> Result<Json<ApiResponse<DriveTokenResponseDto>>, AppError> {
    let token = user
        .drive_token()
        .ok_or_else(|| AppError::Auth(NO_TOKEN_MESSAGE.to_string()))?;

    Ok(Json(ApiResponse::success(
        Some(DriveTokenResponseDto {
            access_token: token.to_string(),
        }),
        None,
        None,
    )))
}

/// Upload a form asset (logo, cover image) to Drive
///
/// Accepts multipart/form-data with:
/// - `file`: The asset to upload (required)
/// - `parentFolderId`: Known destination folder id (optional)
/// - `formTitle`: Used to find or create the destination when no parent is supplied
#[utoipa::path(
    post,
    path = "/api/drive/upload-asset",
    tag = "drive",
    request_body(
        content = UploadAssetDto,
        content_type = "multipart/form-data",
        description = "Asset upload form with optional parentFolderId and formTitle fields",
    ),
    responses(
        (status = 200, description = "Asset uploaded", body = ApiResponse<AssetUploadResponseDto>),
        (status = 400, description = "No file provided"),
        (status = 401, description = "Authentication required or no Drive token"),
        (status = 502, description = "Upload failed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upload_asset(
    user: AuthenticatedUser,
    State(service): State<Arc<AssetService>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<AssetUploadResponseDto>>, AppError> {
    let token = user
        .drive_token()
        .ok_or_else(|| AppError::Auth(NO_TOKEN_MESSAGE.to_string()))?
        .to_string();

    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;
    let mut content_type: Option<String> = None;
    let mut parent_folder_id: Option<String> = None;
    let mut form_title = String::new();

    // Process multipart fields
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                let ct = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());

                let fname = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "unnamed".to_string());

                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read file bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read file data: {}", e))
                })?;

                file_data = Some(data.to_vec());
                file_name = Some(fname);
                content_type = Some(ct);
            }
            "parentFolderId" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read parentFolderId field: {}", e))
                })?;
                if !text.is_empty() {
                    parent_folder_id = Some(text);
                }
            }
            "formTitle" => {
                form_title = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read formTitle field: {}", e))
                })?;
            }
            _ => {
                // Ignore unknown fields
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    let file_data =
        file_data.ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;
    let file_name = file_name.unwrap_or_else(|| "unnamed".to_string());
    let content_type =
        content_type.unwrap_or_else(|| "application/octet-stream".to_string());

    let upload = service
        .upload_asset(
            &token,
            file_data,
            &file_name,
            &content_type,
            parent_folder_id,
            &form_title,
        )
        .await?;

    Ok(Json(ApiResponse::success(
        Some(AssetUploadResponseDto {
            url: upload.url,
            file_id: upload.file_id,
            folder_id: upload.folder_id,
        }),
        None,
        None,
    )))
}

#[cfg(test)]
mod tests {
    use crate::features::drive::routes;
    use crate::features::drive::services::asset_service::test_support::FakeDrive;
    use crate::features::drive::services::AssetService;
    use crate::shared::test_helpers::with_session_auth;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use std::sync::Arc;

    fn server_with(drive: FakeDrive) -> TestServer {
        let service = Arc::new(AssetService::new(Arc::new(drive)));
        TestServer::new(with_session_auth(routes::routes(service))).unwrap()
    }

    #[tokio::test]
    async fn test_get_token_returns_session_drive_token() {
        let server = server_with(FakeDrive::default());

        let response = server.get("/api/drive/token").await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["accessToken"], "test-google-access-token");
    }

    #[tokio::test]
    async fn test_token_endpoint_requires_drive_credentials() {
        let service = Arc::new(AssetService::new(Arc::new(FakeDrive::default())));
        let app = routes::routes(service).layer(axum::middleware::from_fn(
            |mut req: axum::extract::Request, next: axum::middleware::Next| async move {
                req.extensions_mut()
                    .insert(crate::shared::test_helpers::create_session_user_without_drive());
                next.run(req).await
            },
        ));
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api/drive/token").await;
        response.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn test_list_folders_maps_provider_entries() {
        let server = server_with(FakeDrive::default().with_folder("f-1", "Client Uploads", None));

        let response = server.get("/api/drive/folders").await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        assert_eq!(body["data"][0]["id"], "f-1");
        assert_eq!(body["data"][0]["name"], "Client Uploads");
    }

    #[tokio::test]
    async fn test_upload_asset_round_trip() {
        let server = server_with(FakeDrive::default());

        let form = MultipartForm::new()
            .add_part(
                "file",
                Part::bytes(b"PNGDATA".to_vec())
                    .file_name("logo.png")
                    .mime_type("image/png"),
            )
            .add_text("formTitle", "Acme Intake");

        let response = server.post("/api/drive/upload-asset").multipart(form).await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        let url = body["data"]["url"].as_str().unwrap();
        let file_id = body["data"]["fileId"].as_str().unwrap();
        assert_eq!(
            url,
            format!("https://drive.google.com/uc?export=view&id={}", file_id)
        );
        assert!(body["data"]["folderId"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_upload_asset_without_file_is_rejected() {
        let server = server_with(FakeDrive::default());

        let form = MultipartForm::new().add_text("formTitle", "Acme Intake");
        let response = server.post("/api/drive/upload-asset").multipart(form).await;
        response.assert_status_bad_request();
    }
}
