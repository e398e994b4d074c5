use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::error;

use crate::core::error::AppError;
use crate::features::images::services::{ImageProxyError, ImageProxyService};
use crate::shared::constants::IMAGE_CACHE_CONTROL;
use crate::shared::validation::DRIVE_FILE_ID_REGEX;

/// Proxy an uploaded asset to anonymous viewers
///
/// Streams the first fallback strategy that answers successfully, with the
/// upstream content type and a long-lived immutable cache header. When
/// every strategy fails, the last upstream status is propagated.
#[utoipa::path(
    get,
    path = "/api/images/{file_id}",
    tag = "images",
    params(
        ("file_id" = String, Path, description = "Drive file id of the asset")
    ),
    responses(
        (status = 200, description = "Image bytes with upstream content type"),
        (status = 400, description = "Invalid file id"),
        (status = 502, description = "All upstream sources failed")
    )
)]
pub async fn get_image(
    State(service): State<Arc<ImageProxyService>>,
    Path(file_id): Path<String>,
) -> Result<Response, AppError> {
    if !DRIVE_FILE_ID_REGEX.is_match(&file_id) {
        return Err(AppError::BadRequest("Invalid file id".to_string()));
    }

    match service.fetch_image(&file_id).await {
        Ok(image) => {
            let response = Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, image.content_type)
                .header(header::CACHE_CONTROL, IMAGE_CACHE_CONTROL)
                .body(Body::from(image.body))
                .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;
            Ok(response)
        }
        Err(ImageProxyError::Exhausted { last_status }) => {
            error!(
                "Failed to fetch image from Drive for {}. Status: {}",
                file_id, last_status
            );
            let status =
                StatusCode::from_u16(last_status).unwrap_or(StatusCode::BAD_GATEWAY);
            Ok((
                status,
                format!("Failed to fetch image from Drive: {}", last_status),
            )
                .into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::features::images::routes;
    use crate::features::images::services::image_proxy_service::test_support::{
        ok_image, status, ScriptedFetcher,
    };
    use crate::features::images::services::ImageProxyService;
    use axum_test::TestServer;
    use std::sync::Arc;
    use std::time::Duration;

    fn server_with(fetcher: ScriptedFetcher) -> TestServer {
        let service = Arc::new(ImageProxyService::new(
            Arc::new(fetcher),
            Duration::from_secs(15),
        ));
        TestServer::new(routes::routes(service)).unwrap()
    }

    #[tokio::test]
    async fn test_proxied_image_carries_content_type_and_cache_header() {
        let server = server_with(ScriptedFetcher::with_responses(vec![
            status(404),
            ok_image("image/png", b"THUMB"),
        ]));

        let response = server.get("/api/images/abc123").await;
        response.assert_status_ok();
        assert_eq!(response.header("content-type"), "image/png");
        assert_eq!(
            response.header("cache-control"),
            "public, max-age=31536000, immutable"
        );
        assert_eq!(response.as_bytes().as_ref(), b"THUMB");
    }

    #[tokio::test]
    async fn test_exhausted_chain_propagates_last_status() {
        let server = server_with(ScriptedFetcher::with_responses(vec![
            status(404),
            status(404),
            status(404),
        ]));

        let response = server.get("/api/images/abc123").await;
        response.assert_status_not_found();
        response.assert_text("Failed to fetch image from Drive: 404");
    }

    #[tokio::test]
    async fn test_malformed_file_id_is_rejected() {
        let server = server_with(ScriptedFetcher::default());

        let response = server.get("/api/images/not%20a%20file%20id").await;
        response.assert_status_bad_request();
    }
}
