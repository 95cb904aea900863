use axum::http::StatusCode;
use axum::Extension;

use crate::inbound::http::middleware::AuthenticatedUser;

pub async fn hello(Extension(user): Extension<AuthenticatedUser>) -> (StatusCode, &'static str) {
    tracing::debug!(user_id = %user.user_id, role = %user.role, "Greeting authenticated user");

    (StatusCode::OK, "Hello World")
}
