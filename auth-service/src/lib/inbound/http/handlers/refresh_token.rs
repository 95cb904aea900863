use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::CookieJar;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::cookies::REFRESH_TOKEN_COOKIE;
use crate::inbound::http::router::AppState;

pub async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<ApiSuccess<RefreshTokenResponseData>, ApiError> {
    let presented = jar.get(REFRESH_TOKEN_COOKIE).map(|cookie| cookie.value());

    let access_token = state.auth_service.refresh(presented).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        RefreshTokenResponseData { access_token },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshTokenResponseData {
    pub access_token: String,
}
