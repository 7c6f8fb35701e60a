//! Cookies carrying the session token and the last visited console page.

use axum::http::header::{self, HeaderMap, HeaderValue};
use cookie::time::Duration;
use cookie::{Cookie, SameSite};
use vitrine_core::{AppError, AppResult};

/// Cookie holding the signed identity token.
pub const TOKEN_COOKIE: &str = "token";

/// Cookie remembering the last authorized console page.
pub const LAST_PAGE_COOKIE: &str = "lastAdminPage";

const LAST_PAGE_MAX_AGE_SECONDS: i64 = 24 * 60 * 60;

/// Returns the value of the named request cookie.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_owned())
}

/// `Set-Cookie` value installing a session token.
pub fn token_cookie(token: &str, max_age_seconds: i64, secure: bool) -> AppResult<HeaderValue> {
    header_value(
        Cookie::build((TOKEN_COOKIE, token.to_owned()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(secure)
            .max_age(Duration::seconds(max_age_seconds))
            .build(),
    )
}

/// `Set-Cookie` value expiring the session token.
pub fn cleared_token_cookie(secure: bool) -> AppResult<HeaderValue> {
    token_cookie("", 0, secure)
}

/// `Set-Cookie` value remembering a console page.
pub fn last_page_cookie(path: &str, secure: bool) -> AppResult<HeaderValue> {
    header_value(
        Cookie::build((LAST_PAGE_COOKIE, path.to_owned()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(secure)
            .max_age(Duration::seconds(LAST_PAGE_MAX_AGE_SECONDS))
            .build(),
    )
}

fn header_value(cookie: Cookie<'static>) -> AppResult<HeaderValue> {
    HeaderValue::from_str(cookie.to_string().as_str())
        .map_err(|error| AppError::Internal(format!("invalid cookie header: {error}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_named_cookie_among_several() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; token=abc.def.ghi; lastAdminPage=/catalog"),
        );

        assert_eq!(read_cookie(&headers, TOKEN_COOKIE).as_deref(), Some("abc.def.ghi"));
        assert_eq!(
            read_cookie(&headers, LAST_PAGE_COOKIE).as_deref(),
            Some("/catalog")
        );
        assert_eq!(read_cookie(&headers, "missing"), None);
    }

    #[test]
    fn token_cookie_is_strict_and_http_only() -> AppResult<()> {
        let value = token_cookie("abc", 86_400, true)?;
        let value = value.to_str().unwrap_or_default();

        assert!(value.starts_with("token=abc"));
        assert!(value.contains("HttpOnly"));
        assert!(value.contains("SameSite=Strict"));
        assert!(value.contains("Secure"));
        assert!(value.contains("Max-Age=86400"));
        Ok(())
    }

    #[test]
    fn cleared_cookie_expires_immediately() -> AppResult<()> {
        let value = cleared_token_cookie(false)?;
        let value = value.to_str().unwrap_or_default();

        assert!(value.starts_with("token=;"));
        assert!(value.contains("Max-Age=0"));
        assert!(!value.contains("Secure"));
        Ok(())
    }
}
