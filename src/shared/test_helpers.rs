#[cfg(test)]
use crate::features::auth::model::AuthenticatedUser;

#[cfg(test)]
use axum::{extract::Request, middleware::Next, response::Response, Router};

#[cfg(test)]
#[allow(dead_code)]
pub fn create_session_user() -> AuthenticatedUser {
    AuthenticatedUser {
        sub: "test-user-id".to_string(),
        email: Some("owner@example.com".to_string()),
        access_token: Some("test-google-access-token".to_string()),
    }
}

#[cfg(test)]
#[allow(dead_code)]
pub fn create_session_user_without_drive() -> AuthenticatedUser {
    AuthenticatedUser {
        sub: "test-user-id".to_string(),
        email: Some("owner@example.com".to_string()),
        access_token: None,
    }
}

#[cfg(test)]
#[allow(dead_code)]
async fn inject_session_user_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_session_user());
    next.run(request).await
}

#[cfg(test)]
#[allow(dead_code)]
pub fn with_session_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_session_user_middleware))
}
