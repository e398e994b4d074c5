use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::images::handlers;
use crate::features::images::services::ImageProxyService;

/// Create routes for the image proxy
///
/// Note: Public - asset rendering must work for anonymous submitters
pub fn routes(image_proxy_service: Arc<ImageProxyService>) -> Router {
    Router::new()
        .route("/api/images/{file_id}", get(handlers::get_image))
        .with_state(image_proxy_service)
}
