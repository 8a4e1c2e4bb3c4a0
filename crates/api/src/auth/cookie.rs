//! The `Authorization` cookie carrying `"Bearer <jwt>"`.
//!
//! Browsers send the token back on every request; API clients may instead
//! send a standard `Authorization: Bearer <jwt>` header.

use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::header::InvalidHeaderValue;
use axum::http::{HeaderMap, HeaderValue};

/// Name of the cookie holding the bearer token.
pub const AUTH_COOKIE: &str = "Authorization";

/// Build the `Set-Cookie` value that stores `token` for `max_age_secs`.
pub fn session_cookie(
    token: &str,
    max_age_secs: i64,
    secure: bool,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let expires = chrono::Utc::now() + chrono::Duration::seconds(max_age_secs);
    let mut value = format!(
        "{AUTH_COOKIE}=\"Bearer {token}\"; HttpOnly; Max-Age={max_age_secs}; Expires={}; Path=/; SameSite=Lax",
        expires.format("%a, %d %b %Y %H:%M:%S GMT")
    );
    if secure {
        value.push_str("; Secure");
    }
    HeaderValue::from_str(&value)
}

/// Build the `Set-Cookie` value that removes the auth cookie.
pub fn cleared_cookie(secure: bool) -> HeaderValue {
    if secure {
        HeaderValue::from_static(
            "Authorization=\"\"; HttpOnly; Max-Age=0; Path=/; SameSite=Lax; Secure",
        )
    } else {
        HeaderValue::from_static("Authorization=\"\"; HttpOnly; Max-Age=0; Path=/; SameSite=Lax")
    }
}

/// Extract the bearer token from the auth cookie or the `Authorization`
/// header, in that order.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    bearer_from_cookies(headers).or_else(|| bearer_from_header(headers))
}

fn bearer_from_cookies(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == AUTH_COOKIE)
        .and_then(|(_, value)| strip_bearer(value.trim().trim_matches('"')))
}

fn bearer_from_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(strip_bearer)
}

/// Accepts `Bearer <token>` with a case-insensitive scheme.
fn strip_bearer(value: &str) -> Option<String> {
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }
    Some(token.to_string())
}
