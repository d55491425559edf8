use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use cookie::time::Duration as CookieDuration;

use crate::config::AuthConfig;

pub const ACCESS_COOKIE: &str = "token";
pub const REFRESH_COOKIE: &str = "refresh_token";
pub const OAUTH_STATE_COOKIE: &str = "oauth_state";
const OAUTH_STATE_TTL_MINUTES: i64 = 10;

fn http_only(name: &'static str, value: String, cfg: &AuthConfig, max_age: CookieDuration) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .secure(cfg.cookie_secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(max_age)
        .build()
}

fn expired(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path("/")
        .max_age(CookieDuration::ZERO)
        .build()
}

/// Sets the access JWT and the opaque session token.
pub fn with_auth_cookies(
    jar: CookieJar,
    cfg: &AuthConfig,
    access_token: &str,
    session_token: &str,
) -> CookieJar {
    jar.add(http_only(
        ACCESS_COOKIE,
        access_token.to_string(),
        cfg,
        CookieDuration::seconds(cfg.access_token_ttl_secs as i64),
    ))
    .add(http_only(
        REFRESH_COOKIE,
        session_token.to_string(),
        cfg,
        CookieDuration::days(cfg.session_ttl_days),
    ))
}

pub fn without_auth_cookies(jar: CookieJar) -> CookieJar {
    jar.add(expired(ACCESS_COOKIE)).add(expired(REFRESH_COOKIE))
}

pub fn with_oauth_state(jar: CookieJar, cfg: &AuthConfig, state: &str) -> CookieJar {
    jar.add(http_only(
        OAUTH_STATE_COOKIE,
        state.to_string(),
        cfg,
        CookieDuration::minutes(OAUTH_STATE_TTL_MINUTES),
    ))
}

pub fn without_oauth_state(jar: CookieJar) -> CookieJar {
    jar.add(expired(OAUTH_STATE_COOKIE))
}

pub fn read(jar: &CookieJar, name: &str) -> Option<String> {
    jar.get(name)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}
