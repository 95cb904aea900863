use chrono::Duration;

use crate::jwt::AccessClaims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::RefreshClaims;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Default lifetime of an access token.
pub const DEFAULT_ACCESS_TOKEN_TTL_MINUTES: i64 = 15;

/// Default lifetime of a refresh token.
pub const DEFAULT_REFRESH_TOKEN_TTL_DAYS: i64 = 7;

/// Signing context for both token classes.
///
/// Access and refresh tokens are signed with separately named keys. They may
/// hold the same bytes; keeping them apart lets either be rotated alone.
#[derive(Debug, Clone)]
pub struct TokenSettings {
    pub access_secret: Vec<u8>,
    pub refresh_secret: Vec<u8>,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl TokenSettings {
    /// Create settings with the default token lifetimes.
    pub fn new(access_secret: impl Into<Vec<u8>>, refresh_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            access_ttl: Duration::minutes(DEFAULT_ACCESS_TOKEN_TTL_MINUTES),
            refresh_ttl: Duration::days(DEFAULT_REFRESH_TOKEN_TTL_DAYS),
        }
    }

    /// Override the access token lifetime.
    pub fn with_access_ttl(mut self, ttl: Duration) -> Self {
        self.access_ttl = ttl;
        self
    }

    /// Override the refresh token lifetime.
    pub fn with_refresh_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_ttl = ttl;
        self
    }
}

/// Authentication coordinator combining password verification and token issuance.
///
/// Owns the password hasher and one JWT handler per token class. Built once at
/// startup and shared by reference.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    access_tokens: JwtHandler,
    refresh_tokens: JwtHandler,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

/// Freshly issued access and refresh tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    /// JWT access token
    pub access_token: String,
    /// JWT refresh token
    pub refresh_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `settings` - Signing keys and token lifetimes
    /// * `password_hasher` - Hasher configured with the deployment's cost
    pub fn new(settings: TokenSettings, password_hasher: PasswordHasher) -> Self {
        Self {
            password_hasher,
            access_tokens: JwtHandler::new(&settings.access_secret),
            refresh_tokens: JwtHandler::new(&settings.refresh_secret),
            access_ttl: settings.access_ttl,
            refresh_ttl: settings.refresh_ttl,
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify a plaintext password against the stored hash.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash could not be parsed
    pub fn verify_credentials(
        &self,
        password: &str,
        stored_hash: &str,
    ) -> Result<(), AuthenticationError> {
        let is_valid = self.password_hasher.verify(password, stored_hash)?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(())
    }

    /// Issue an access and a refresh token for a user.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn issue_token_pair(&self, user_id: &str, role: &str) -> Result<TokenPair, JwtError> {
        Ok(TokenPair {
            access_token: self.issue_access_token(user_id, role)?,
            refresh_token: self.issue_refresh_token(user_id)?,
        })
    }

    /// Issue a short-lived access token carrying the user id and role.
    pub fn issue_access_token(&self, user_id: &str, role: &str) -> Result<String, JwtError> {
        self.access_tokens
            .encode(&AccessClaims::new(user_id, role, self.access_ttl))
    }

    /// Issue a long-lived refresh token carrying only the user id.
    pub fn issue_refresh_token(&self, user_id: &str) -> Result<String, JwtError> {
        self.refresh_tokens
            .encode(&RefreshClaims::new(user_id, self.refresh_ttl))
    }

    /// Validate an access token and return its claims.
    ///
    /// # Errors
    /// * `TokenExpired` - Token is past its expiry
    /// * `InvalidToken` / `DecodingFailed` - Signature or payload is invalid
    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims, JwtError> {
        self.access_tokens.decode(token)
    }

    /// Validate a refresh token's signature and expiry and return its claims.
    ///
    /// Does not check whether the token is still the one stored for the user.
    pub fn verify_refresh_token(&self, token: &str) -> Result<RefreshClaims, JwtError> {
        self.refresh_tokens.decode(token)
    }
}
