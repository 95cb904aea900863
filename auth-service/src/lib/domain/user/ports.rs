use async_trait::async_trait;

use crate::domain::user::models::AuthSession;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::AuthError;

/// Port for authentication domain operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new user and open a session for it.
    ///
    /// # Arguments
    /// * `command` - Shape-validated username, email, password and role
    ///
    /// # Returns
    /// Created user with a fresh access/refresh token pair
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterCommand) -> Result<AuthSession, AuthError>;

    /// Verify credentials and open a new session, superseding any previous one.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (indistinguishable)
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, command: LoginCommand) -> Result<AuthSession, AuthError>;

    /// Exchange the stored refresh token for a new access token.
    ///
    /// The refresh token itself is left unchanged.
    ///
    /// # Errors
    /// * `RefreshTokenMissing` - No token presented
    /// * `InvalidRefreshToken` - Bad signature, expired, unknown user, or not the stored token
    /// * `DatabaseError` - Database operation failed
    async fn refresh(&self, refresh_token: Option<&str>) -> Result<String, AuthError>;

    /// End the session holding the given refresh token.
    ///
    /// # Errors
    /// * `LogoutTokenMissing` - No token presented
    /// * `SessionNotFound` - No user holds this token
    /// * `DatabaseError` - Database operation failed
    async fn logout(&self, refresh_token: Option<&str>) -> Result<(), AuthError>;
}

/// Persistence operations for user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: User) -> Result<User, AuthError>;

    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AuthError>;

    /// Retrieve user by email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError>;

    /// Retrieve the user currently holding an exact refresh token value.
    async fn find_by_refresh_token(&self, token: &str) -> Result<Option<User>, AuthError>;

    /// Persist the mutable fields of an existing user.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `EmailAlreadyExists` - Email collides with another user
    /// * `DatabaseError` - Database operation failed
    async fn save(&self, user: User) -> Result<User, AuthError>;
}
