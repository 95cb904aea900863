//! Authentication utilities library
//!
//! Provides the credential and token primitives used by the auth service:
//! - Password hashing (Argon2id, tunable cost)
//! - Access and refresh token issuance and validation (HS256 JWT)
//! - Authentication coordination
//!
//! The service defines its own ports and domain errors and adapts these
//! implementations, so this crate carries no storage or HTTP concerns.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, PasswordHasher, TokenSettings};
//!
//! let settings = TokenSettings::new(
//!     "access_secret_key_at_least_32_bytes!",
//!     "refresh_secret_key_at_least_32_bytes",
//! );
//! let auth = Authenticator::new(settings, PasswordHasher::new());
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue tokens
//! auth.verify_credentials("password123", &hash).unwrap();
//! let pair = auth.issue_token_pair("user123", "user").unwrap();
//!
//! // Refresh: validate the refresh token, mint a new access token
//! let claims = auth.verify_refresh_token(&pair.refresh_token).unwrap();
//! let access_token = auth.issue_access_token(&claims.sub, "user").unwrap();
//! assert_eq!(auth.verify_access_token(&access_token).unwrap().sub, "user123");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use authenticator::TokenPair;
pub use authenticator::TokenSettings;
pub use jwt::AccessClaims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::RefreshClaims;
pub use password::PasswordError;
pub use password::PasswordHasher;
