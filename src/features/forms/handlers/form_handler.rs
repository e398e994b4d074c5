use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::forms::dtos::FormResponseDto;
use crate::features::forms::models::FormConfig;
use crate::features::forms::services::FormService;
use crate::shared::types::{ApiResponse, Meta};

/// List the caller's forms, newest first
#[utoipa::path(
    get,
    path = "/api/forms",
    tag = "forms",
    responses(
        (status = 200, description = "Forms owned by the caller", body = ApiResponse<Vec<FormResponseDto>>),
        (status = 401, description = "Authentication required")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_forms(
    user: AuthenticatedUser,
    State(service): State<Arc<FormService>>,
) -> Result<Json<ApiResponse<Vec<FormResponseDto>>>, AppError> {
    let forms = service.list(&user.sub).await?;
    let meta = Meta {
        total: forms.len() as i64,
    };
    Ok(Json(ApiResponse::success(Some(forms), None, Some(meta))))
}

/// Create a form
///
/// Accepts a partial configuration; omitted fields fall back to defaults
/// and an empty title becomes "Untitled Form".
#[utoipa::path(
    post,
    path = "/api/forms",
    tag = "forms",
    request_body = FormConfig,
    responses(
        (status = 201, description = "Form created", body = ApiResponse<FormResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Authentication required")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_form(
    user: AuthenticatedUser,
    State(service): State<Arc<FormService>>,
    AppJson(config): AppJson<FormConfig>,
) -> Result<(StatusCode, Json<ApiResponse<FormResponseDto>>), AppError> {
    let form = service.create(&user.sub, config).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(form), None, None)),
    ))
}

/// Fetch one form by id
#[utoipa::path(
    get,
    path = "/api/forms/{id}",
    tag = "forms",
    params(
        ("id" = Uuid, Path, description = "Form id")
    ),
    responses(
        (status = 200, description = "Form found", body = ApiResponse<FormResponseDto>),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Form not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_form(
    user: AuthenticatedUser,
    State(service): State<Arc<FormService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FormResponseDto>>, AppError> {
    let form = service.get(&user.sub, id).await?;
    Ok(Json(ApiResponse::success(Some(form), None, None)))
}

/// Replace a form's configuration
///
/// Full replace carrying every configuration field; both the explicit Save
/// action and the editor's debounced auto-save go through here.
#[utoipa::path(
    put,
    path = "/api/forms/{id}",
    tag = "forms",
    params(
        ("id" = Uuid, Path, description = "Form id")
    ),
    request_body = FormConfig,
    responses(
        (status = 200, description = "Form updated", body = ApiResponse<FormResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Form not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_form(
    user: AuthenticatedUser,
    State(service): State<Arc<FormService>>,
    Path(id): Path<Uuid>,
    AppJson(config): AppJson<FormConfig>,
) -> Result<Json<ApiResponse<FormResponseDto>>, AppError> {
    let form = service.update(&user.sub, id, config).await?;
    Ok(Json(ApiResponse::success(Some(form), None, None)))
}
