use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::LoginCommand;
use crate::inbound::http::router::AppState;

/// Where clients are pointed after a successful login.
const POST_LOGIN_REDIRECT: &str = "/api/auth/hello";

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, ApiSuccess<LoginResponseData>), ApiError> {
    let Json(body) = payload?;

    let session = state
        .auth_service
        .login(LoginCommand::new(body.email, body.password))
        .await?;

    let jar = jar.add(state.cookies.refresh_cookie(session.tokens.refresh_token));

    Ok((
        jar,
        ApiSuccess::new(
            StatusCode::OK,
            LoginResponseData {
                message: "Login successful".to_string(),
                user: (&session.user).into(),
                access_token: session.tokens.access_token,
                redirect_to: POST_LOGIN_REDIRECT.to_string(),
            },
        ),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub message: String,
    pub user: UserData,
    pub access_token: String,
    pub redirect_to: String,
}
