use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::CookieJar;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::cookies::REFRESH_TOKEN_COOKIE;
use crate::inbound::http::router::AppState;

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, ApiSuccess<LogoutResponseData>), ApiError> {
    let presented = jar.get(REFRESH_TOKEN_COOKIE).map(|cookie| cookie.value());

    state.auth_service.logout(presented).await?;

    let jar = jar.remove(state.cookies.refresh_removal_cookie());

    Ok((
        jar,
        ApiSuccess::new(
            StatusCode::OK,
            LogoutResponseData {
                message: "Logout successful".to_string(),
            },
        ),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogoutResponseData {
    pub message: String,
}
