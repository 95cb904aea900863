use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use chrono::Utc;

use crate::domain::user::models::AuthSession;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::AuthError;
use crate::user::ports::AuthServicePort;
use crate::user::ports::UserRepository;

/// Domain service implementation for authentication operations.
///
/// Concrete implementation of AuthServicePort with dependency injection.
pub struct AuthService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> AuthService<UR>
where
    UR: UserRepository,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Credential store implementation
    /// * `authenticator` - Password hasher and token signing context
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    /// Issue a token pair and store the refresh token on the user,
    /// replacing whichever token was stored before.
    async fn open_session(&self, mut user: User) -> Result<AuthSession, AuthError> {
        let tokens = self
            .authenticator
            .issue_token_pair(&user.id.to_string(), user.role.as_str())?;

        user.refresh_token = Some(tokens.refresh_token.clone());
        let user = self.repository.save(user).await?;

        Ok(AuthSession { user, tokens })
    }
}

#[async_trait]
impl<UR> AuthServicePort for AuthService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<AuthSession, AuthError> {
        let authenticator = Arc::clone(&self.authenticator);
        let password = command.password;
        let password_hash =
            tokio::task::spawn_blocking(move || authenticator.hash_password(&password))
                .await
                .map_err(|e| AuthError::Unknown(e.to_string()))??;

        let user = User {
            id: UserId::new(),
            username: command.username,
            email: command.email,
            password_hash,
            role: command.role,
            refresh_token: None,
            created_at: Utc::now(),
        };

        // Uniqueness of the email is enforced by the store.
        let created_user = self.repository.create(user).await?;
        let session = self.open_session(created_user).await?;

        tracing::info!(
            user_id = %session.user.id,
            role = %session.user.role,
            "User registered"
        );

        Ok(session)
    }

    async fn login(&self, command: LoginCommand) -> Result<AuthSession, AuthError> {
        let user = match self.repository.find_by_email(&command.email).await? {
            Some(user) => user,
            None => {
                tracing::warn!("Login rejected: unknown email");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let authenticator = Arc::clone(&self.authenticator);
        let password = command.password;
        let password_hash = user.password_hash.clone();
        tokio::task::spawn_blocking(move || {
            authenticator.verify_credentials(&password, &password_hash)
        })
        .await
        .map_err(|e| AuthError::Unknown(e.to_string()))?
        .map_err(|e| match e {
            AuthenticationError::InvalidCredentials => {
                tracing::warn!(user_id = %user.id, "Login rejected: wrong password");
                AuthError::InvalidCredentials
            }
            AuthenticationError::PasswordError(err) => AuthError::from(err),
        })?;

        let session = self.open_session(user).await?;
        tracing::info!(user_id = %session.user.id, "User logged in");

        Ok(session)
    }

    async fn refresh(&self, refresh_token: Option<&str>) -> Result<String, AuthError> {
        let token = refresh_token
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::RefreshTokenMissing)?;

        let claims = self
            .authenticator
            .verify_refresh_token(token)
            .map_err(|e| {
                tracing::warn!(error = %e, "Refresh token rejected");
                AuthError::InvalidRefreshToken
            })?;

        let user_id =
            UserId::from_string(&claims.sub).map_err(|_| AuthError::InvalidRefreshToken)?;

        let user = self
            .repository
            .find_by_id(&user_id)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        if user.refresh_token.as_deref() != Some(token) {
            tracing::warn!(user_id = %user.id, "Refresh token no longer matches stored token");
            return Err(AuthError::InvalidRefreshToken);
        }

        // The stored refresh token is not rotated.
        let access_token = self
            .authenticator
            .issue_access_token(&user.id.to_string(), user.role.as_str())?;

        tracing::debug!(user_id = %user.id, "Access token refreshed");

        Ok(access_token)
    }

    async fn logout(&self, refresh_token: Option<&str>) -> Result<(), AuthError> {
        let token = refresh_token
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::LogoutTokenMissing)?;

        let mut user = self
            .repository
            .find_by_refresh_token(token)
            .await?
            .ok_or(AuthError::SessionNotFound)?;

        user.refresh_token = None;
        let user = self.repository.save(user).await?;

        tracing::info!(user_id = %user.id, "User logged out");

        Ok(())
    }
}
