//! Cookie session reader.
//!
//! Reads the legacy auth cookies (`access_token`, `refresh_token`, `user`)
//! from a request. Read-only: no network calls, no cookie mutation.

use axum::http::HeaderMap;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

/// Signed session token minted by the token issuer.
pub const SESSION_TOKEN_COOKIE: &str = "et_session";
/// Backend-issued bearer token.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
/// Backend-issued refresh token.
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";
/// JSON-encoded backend user record.
pub const USER_COOKIE: &str = "user";

/// Session derived from the legacy auth cookies.
#[derive(Clone, Debug, Serialize)]
pub struct CookieSession {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub user: Option<Value>,
}

impl CookieSession {
    /// Read the session cookies from a request.
    ///
    /// Returns `None` when the access-token cookie is absent, regardless of
    /// the other cookies. A `user` cookie that fails to parse is logged and
    /// dropped; it never blocks retrieval of a valid token.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let access_token = cookie_value(headers, ACCESS_TOKEN_COOKIE)?;
        let refresh_token = cookie_value(headers, REFRESH_TOKEN_COOKIE);

        let user = cookie_value(headers, USER_COOKIE).and_then(|raw| {
            let decoded = decode_cookie_value(&raw);
            match serde_json::from_str(&decoded) {
                Ok(value) => Some(value),
                Err(err) => {
                    warn!("Error parsing user cookie: {err}");
                    None
                }
            }
        });

        Some(Self {
            access_token,
            refresh_token,
            user,
        })
    }
}

/// Extract a named cookie from the request's `Cookie` header.
#[must_use]
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let header = headers.get(axum::http::header::COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == name {
            return Some(val.to_string());
        }
    }
    None
}

/// Encode a cookie value so JSON payloads survive the cookie grammar.
#[must_use]
pub fn encode_cookie_value(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Inverse of [`encode_cookie_value`]; undecodable input is returned as-is.
#[must_use]
pub fn decode_cookie_value(value: &str) -> String {
    url::form_urlencoded::parse(format!("v={value}").as_bytes())
        .find(|(key, _)| key == "v")
        .map_or_else(|| value.to_string(), |(_, decoded)| decoded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::COOKIE, HeaderValue};

    fn headers_with_cookie(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookie).expect("cookie header"));
        headers
    }

    #[test]
    fn missing_access_token_yields_no_session() {
        let headers = headers_with_cookie("refresh_token=r1; user=%7B%22id%22%3A1%7D");
        assert!(CookieSession::from_headers(&headers).is_none());
        assert!(CookieSession::from_headers(&HeaderMap::new()).is_none());
    }

    #[test]
    fn access_token_alone_is_a_session() {
        let headers = headers_with_cookie("access_token=tok123");
        let session = CookieSession::from_headers(&headers).expect("session");
        assert_eq!(session.access_token, "tok123");
        assert!(session.refresh_token.is_none());
        assert!(session.user.is_none());
    }

    #[test]
    fn full_cookie_set_round_trips() {
        let user_json = r#"{"id":7,"username":"abebe"}"#;
        let cookie = format!(
            "access_token=tok; refresh_token=ref; user={}",
            encode_cookie_value(user_json)
        );
        let session = CookieSession::from_headers(&headers_with_cookie(&cookie)).expect("session");
        assert_eq!(session.access_token, "tok");
        assert_eq!(session.refresh_token.as_deref(), Some("ref"));
        let user = session.user.expect("user value");
        assert_eq!(user["username"], "abebe");
    }

    #[test]
    fn malformed_user_cookie_degrades_to_null_user() {
        let headers = headers_with_cookie("access_token=tok123; user={not json");
        let session = CookieSession::from_headers(&headers).expect("session");
        assert_eq!(session.access_token, "tok123");
        assert!(session.user.is_none());
    }

    #[test]
    fn cookie_value_handles_spacing_and_absence() {
        let headers = headers_with_cookie("a=1;  b = 2 ;c=3");
        assert_eq!(cookie_value(&headers, "a").as_deref(), Some("1"));
        assert_eq!(cookie_value(&headers, "b").as_deref(), Some("2"));
        assert_eq!(cookie_value(&headers, "c").as_deref(), Some("3"));
        assert!(cookie_value(&headers, "d").is_none());
    }

    #[test]
    fn cookie_value_encoding_round_trip() {
        let raw = r#"{"id":"u1","name":"Alem Tsehay"}"#;
        let encoded = encode_cookie_value(raw);
        assert!(!encoded.contains(';'));
        assert!(!encoded.contains(','));
        assert_eq!(decode_cookie_value(&encoded), raw);
    }
}
