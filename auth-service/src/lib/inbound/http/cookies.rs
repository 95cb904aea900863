use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::cookie::SameSite;

/// Cookie carrying the refresh token.
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// Optional cookie carrying the access token for protected routes.
pub const ACCESS_TOKEN_COOKIE: &str = "token";

#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub secure: bool,
    pub refresh_max_age: time::Duration,
}

impl CookieSettings {
    pub fn new(secure: bool, refresh_max_age: time::Duration) -> Self {
        Self {
            secure,
            refresh_max_age,
        }
    }

    /// HTTP-only cookie delivering a freshly issued refresh token.
    pub fn refresh_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((REFRESH_TOKEN_COOKIE, token))
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Strict)
            .path("/")
            .max_age(self.refresh_max_age)
            .build()
    }

    /// Cookie matching the refresh cookie's path, used to clear it.
    pub fn refresh_removal_cookie(&self) -> Cookie<'static> {
        Cookie::build((REFRESH_TOKEN_COOKIE, "")).path("/").build()
    }
}
