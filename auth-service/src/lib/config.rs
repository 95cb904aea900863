use std::env;

use auth::PasswordError;
use auth::PasswordHasher;
use auth::TokenSettings;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub password: PasswordConfig,
    #[serde(default)]
    pub cookies: CookieConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

/// Credential store settings. Without a URL the in-memory store is used.
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

/// Token signing keys and lifetimes.
///
/// Both keys may be set to the same value.
#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    #[serde(default = "default_access_token_ttl_minutes")]
    pub access_token_ttl_minutes: i64,
    #[serde(default = "default_refresh_token_ttl_days")]
    pub refresh_token_ttl_days: i64,
}

/// Argon2id cost parameters.
#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CookieConfig {
    /// Mark the refresh cookie `Secure` (HTTPS only).
    #[serde(default)]
    pub secure: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RateLimitConfig {
    pub login_max_attempts: u32,
    pub login_window_seconds: u64,
    /// Requests per client across every route.
    #[serde(default = "default_global_max_requests")]
    pub global_max_requests: u32,
    #[serde(default = "default_global_window_seconds")]
    pub global_window_seconds: u64,
}

fn default_max_connections() -> u32 {
    5
}

fn default_global_max_requests() -> u32 {
    100
}

fn default_global_window_seconds() -> u64 {
    15 * 60
}

fn default_access_token_ttl_minutes() -> i64 {
    auth::authenticator::DEFAULT_ACCESS_TOKEN_TTL_MINUTES
}

fn default_refresh_token_ttl_days() -> i64 {
    auth::authenticator::DEFAULT_REFRESH_TOKEN_TTL_DAYS
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
        }
    }
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:8080".to_string()],
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            login_max_attempts: 5,
            login_window_seconds: 15 * 60,
            global_max_requests: default_global_max_requests(),
            global_window_seconds: default_global_window_seconds(),
        }
    }
}

impl JwtConfig {
    pub fn token_settings(&self) -> TokenSettings {
        TokenSettings::new(self.access_secret.as_bytes(), self.refresh_secret.as_bytes())
            .with_access_ttl(chrono::Duration::minutes(self.access_token_ttl_minutes))
            .with_refresh_ttl(chrono::Duration::days(self.refresh_token_ttl_days))
    }
}

impl PasswordConfig {
    pub fn hasher(&self) -> Result<PasswordHasher, PasswordError> {
        PasswordHasher::with_cost(self.memory_kib, self.iterations, self.parallelism)
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__ACCESS_SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: JWT__ACCESS_SECRET=... overrides jwt.access_secret
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        configuration.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_settings_from_config() {
        let jwt = JwtConfig {
            access_secret: "access".to_string(),
            refresh_secret: "refresh".to_string(),
            access_token_ttl_minutes: 15,
            refresh_token_ttl_days: 7,
        };

        let settings = jwt.token_settings();
        assert_eq!(settings.access_secret, b"access".to_vec());
        assert_eq!(settings.refresh_secret, b"refresh".to_vec());
        assert_eq!(settings.access_ttl, chrono::Duration::minutes(15));
        assert_eq!(settings.refresh_ttl, chrono::Duration::days(7));
    }

    #[test]
    fn test_global_rate_limit_defaults_when_omitted() {
        let rate_limit: RateLimitConfig = ConfigBuilder::builder()
            .set_override("login_max_attempts", 3)
            .unwrap()
            .set_override("login_window_seconds", 60)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(rate_limit.login_max_attempts, 3);
        assert_eq!(rate_limit.global_max_requests, 100);
        assert_eq!(rate_limit.global_window_seconds, 900);
    }

    #[test]
    fn test_default_password_cost_is_valid() {
        assert!(PasswordConfig::default().hasher().is_ok());
    }
}
