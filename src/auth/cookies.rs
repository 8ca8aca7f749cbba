//! Access-token cookie helpers
//!
//! The session token travels either in the `accessToken` cookie or in a
//! `Bearer` Authorization header; the cookie wins when both are present.

use axum::http::{header, HeaderMap};
use cookie::time::Duration;
use cookie::{Cookie, SameSite};

use super::session::SESSION_TTL_SECONDS;

pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";

/// Build the Set-Cookie value carrying a freshly issued session token
///
/// `Secure` is only set in production so local http development keeps working.
pub fn build_access_cookie(token: &str, production: bool) -> String {
    Cookie::build((ACCESS_TOKEN_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(SESSION_TTL_SECONDS))
        .path("/")
        .secure(production)
        .build()
        .to_string()
}

/// Build the Set-Cookie value that clears the session cookie (Max-Age=0)
pub fn clear_access_cookie(production: bool) -> String {
    Cookie::build((ACCESS_TOKEN_COOKIE, ""))
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::ZERO)
        .path("/")
        .secure(production)
        .build()
        .to_string()
}

/// Extract the session token from request headers, cookie first
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    token_from_cookie(headers).or_else(|| token_from_bearer(headers))
}

fn token_from_cookie(headers: &HeaderMap) -> Option<String> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;

    for part in cookie_header.split(';') {
        if let Ok(cookie) = Cookie::parse(part.trim()) {
            if cookie.name() == ACCESS_TOKEN_COOKIE {
                return Some(cookie.value().to_string());
            }
        }
    }

    None
}

fn token_from_bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.to_string())
}
