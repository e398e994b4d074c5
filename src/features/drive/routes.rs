use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::drive::dtos::MAX_ASSET_SIZE;
use crate::features::drive::handlers;
use crate::features::drive::services::AssetService;

/// Create routes for the drive feature
///
/// Note: This feature requires authentication
pub fn routes(asset_service: Arc<AssetService>) -> Router {
    Router::new()
        .route("/api/drive/folders", get(handlers::list_drive_folders))
        .route("/api/drive/token", get(handlers::get_drive_token))
        .route(
            "/api/drive/upload-asset",
            // Allow body size up to MAX_ASSET_SIZE + buffer for multipart overhead
            post(handlers::upload_asset).layer(DefaultBodyLimit::max(MAX_ASSET_SIZE + 1024 * 1024)),
        )
        .with_state(asset_service)
}
