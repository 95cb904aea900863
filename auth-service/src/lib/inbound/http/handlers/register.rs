use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::Role;
use crate::domain::user::models::Username;
use crate::inbound::http::router::AppState;
use crate::user::errors::EmailError;
use crate::user::errors::RoleError;
use crate::user::errors::UsernameError;

const MIN_PASSWORD_LENGTH: usize = 6;

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(CookieJar, ApiSuccess<RegisterResponseData>), ApiError> {
    let Json(body) = payload?;

    let session = state
        .auth_service
        .register(body.try_into_command()?)
        .await?;

    let jar = jar.add(state.cookies.refresh_cookie(session.tokens.refresh_token));

    Ok((
        jar,
        ApiSuccess::new(
            StatusCode::CREATED,
            RegisterResponseData {
                access_token: session.tokens.access_token,
                user: (&session.user).into(),
            },
        ),
    ))
}

/// HTTP request body for registering a user (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    username: String,
    email: String,
    password: String,
    role: Option<String>,
}

#[derive(Debug, Clone, Error)]
enum ParseRegisterRequestError {
    #[error("Invalid username: {0}")]
    Username(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid password: minimum {min} characters, got {actual}")]
    PasswordTooShort { min: usize, actual: usize },

    #[error("Invalid role: {0}")]
    Role(#[from] RoleError),
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterCommand, ParseRegisterRequestError> {
        let username = Username::new(self.username)?;
        let email = EmailAddress::new(self.email)?;

        let length = self.password.chars().count();
        if length < MIN_PASSWORD_LENGTH {
            return Err(ParseRegisterRequestError::PasswordTooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: length,
            });
        }

        let role = match self.role {
            Some(role) => role.parse::<Role>()?,
            None => Role::default(),
        };

        Ok(RegisterCommand::new(username, email, self.password, role))
    }
}

impl From<ParseRegisterRequestError> for ApiError {
    fn from(err: ParseRegisterRequestError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterResponseData {
    pub access_token: String,
    pub user: UserData,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(password: &str, role: Option<&str>) -> RegisterRequest {
        RegisterRequest {
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            password: password.to_string(),
            role: role.map(str::to_string),
        }
    }

    #[test]
    fn test_password_of_six_characters_accepted() {
        let command = request("secret", None).try_into_command().unwrap();
        assert_eq!(command.password, "secret");
        assert_eq!(command.role, Role::User);
    }

    #[test]
    fn test_password_of_five_characters_rejected() {
        let result = request("12345", None).try_into_command();
        assert!(matches!(
            result,
            Err(ParseRegisterRequestError::PasswordTooShort { min: 6, actual: 5 })
        ));
    }

    #[test]
    fn test_role_must_be_known() {
        assert_eq!(
            request("secret1", Some("admin"))
                .try_into_command()
                .unwrap()
                .role,
            Role::Admin
        );
        assert!(matches!(
            request("secret1", Some("owner")).try_into_command(),
            Err(ParseRegisterRequestError::Role(_))
        ));
    }

    #[test]
    fn test_username_and_email_validated() {
        let mut short_name = request("secret1", None);
        short_name.username = "al".to_string();
        assert!(matches!(
            short_name.try_into_command(),
            Err(ParseRegisterRequestError::Username(_))
        ));

        let mut bad_email = request("secret1", None);
        bad_email.email = "not-an-email".to_string();
        assert!(matches!(
            bad_email.try_into_command(),
            Err(ParseRegisterRequestError::Email(_))
        ));
    }
}
