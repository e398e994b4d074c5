use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::forms::handlers;
use crate::features::forms::services::FormService;

/// Create routes for the forms feature
///
/// Note: This feature requires authentication
pub fn routes(form_service: Arc<FormService>) -> Router {
    Router::new()
        .route(
            "/api/forms",
            get(handlers::list_forms).post(handlers::create_form),
        )
        .route(
            "/api/forms/{id}",
            get(handlers::get_form).put(handlers::update_form),
        )
        .with_state(form_service)
}
