use axum::http::header::COOKIE;
use axum::http::{HeaderMap, HeaderValue};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

/// Access token cookie name for a prefix.
#[cfg_attr(not(feature = "client"), allow(dead_code))]
pub(crate) fn access_cookie_name(prefix: &str) -> String {
    format!("{prefix}-access-token")
}

/// Refresh token cookie name for a prefix.
#[cfg_attr(not(feature = "client"), allow(dead_code))]
pub(crate) fn refresh_cookie_name(prefix: &str) -> String {
    format!("{prefix}-refresh-token")
}

/// Create session cookies from a freshly issued token pair.
///
/// The refresh cookie is only emitted when the provider rotated it.
#[cfg_attr(not(feature = "client"), allow(dead_code))]
pub(crate) fn session_cookies(
    prefix: &str,
    access_token: &str,
    refresh_token: Option<&str>,
    access_ttl_secs: u64,
    refresh_ttl_days: i64,
    secure: bool,
) -> Vec<Cookie<'static>> {
    let access_ttl = Duration::seconds(i64::try_from(access_ttl_secs).unwrap_or(i64::MAX));
    let mut cookies = vec![session_cookie(
        access_cookie_name(prefix),
        access_token,
        access_ttl,
        secure,
    )];

    if let Some(refresh_token) = refresh_token {
        cookies.push(session_cookie(
            refresh_cookie_name(prefix),
            refresh_token,
            Duration::seconds(refresh_ttl_days.saturating_mul(86_400)),
            secure,
        ));
    }

    cookies
}

fn session_cookie(name: String, value: &str, max_age: Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/".to_string())
        .max_age(max_age)
        .build()
}

/// Add refreshed cookies to an outgoing jar.
///
/// Only additions made here end up as `Set-Cookie` headers.
pub(super) fn apply_refreshed(jar: CookieJar, refreshed: &[Cookie<'static>]) -> CookieJar {
    refreshed
        .iter()
        .cloned()
        .fold(jar, |jar, cookie| jar.add(cookie))
}

/// Rewrite the request `Cookie` header so inner handlers see refreshed values.
///
/// Works on the raw header bytes: pairs not touched by the refresh are kept
/// byte-for-byte (still percent-encoded), refreshed pairs are dropped and
/// re-appended in encoded form.
pub(super) fn rewrite_request_cookies(headers: &mut HeaderMap, refreshed: &[Cookie<'static>]) {
    if refreshed.is_empty() {
        return;
    }

    let mut pairs: Vec<Vec<u8>> = headers
        .get_all(COOKIE)
        .iter()
        .flat_map(|value| value.as_bytes().split(|b| *b == b';'))
        .map(<[u8]>::trim_ascii)
        .filter(|pair| !pair.is_empty())
        .filter(|pair| {
            let name = cookie_name(pair);
            !refreshed.iter().any(|c| c.name().as_bytes() == name)
        })
        .map(<[u8]>::to_vec)
        .collect();

    pairs.extend(
        refreshed
            .iter()
            .map(|c| c.stripped().encoded().to_string().into_bytes()),
    );

    match HeaderValue::from_bytes(&pairs.join(&b"; "[..])) {
        Ok(value) => {
            headers.insert(COOKIE, value);
        }
        Err(e) => {
            tracing::warn!(error = %e, "Refreshed cookies not representable as a Cookie header");
        }
    }
}

fn cookie_name(pair: &[u8]) -> &[u8] {
    pair.split(|b| *b == b'=').next().unwrap_or(pair).trim_ascii()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_names() {
        assert_eq!(access_cookie_name("__session"), "__session-access-token");
        assert_eq!(refresh_cookie_name("__session"), "__session-refresh-token");
    }

    #[test]
    fn test_session_cookies_attributes() {
        let cookies = session_cookies("__session", "access", Some("refresh"), 3600, 30, true);

        assert_eq!(cookies.len(), 2);
        let access = &cookies[0];
        assert_eq!(access.name(), "__session-access-token");
        assert_eq!(access.value(), "access");
        assert_eq!(access.http_only(), Some(true));
        assert_eq!(access.secure(), Some(true));
        assert_eq!(access.same_site(), Some(SameSite::Lax));
        assert_eq!(access.path(), Some("/"));
        assert_eq!(access.max_age(), Some(Duration::hours(1)));

        let refresh = &cookies[1];
        assert_eq!(refresh.name(), "__session-refresh-token");
        assert_eq!(refresh.max_age(), Some(Duration::days(30)));
    }

    #[test]
    fn test_session_cookies_without_rotation() {
        let cookies = session_cookies("__session", "access", None, 60, 30, false);

        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies[0].secure(), Some(false));
    }

    #[test]
    fn test_rewrite_request_cookies_replaces_only_refreshed() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("__session-access-token=old; theme=dark"),
        );

        let refreshed = session_cookies("__session", "new", None, 60, 30, true);
        rewrite_request_cookies(&mut headers, &refreshed);

        let jar = CookieJar::from_headers(&headers);
        assert_eq!(jar.get("__session-access-token").unwrap().value(), "new");
        assert_eq!(jar.get("theme").unwrap().value(), "dark");
        assert_eq!(headers.get_all(COOKIE).iter().count(), 1);
    }

    #[test]
    fn test_rewrite_request_cookies_keeps_encoded_values() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("__session-access-token=old; pref=a%3Bb%20c; t=x%0Ay"),
        );

        let refreshed = session_cookies("__session", "new", None, 60, 30, true);
        rewrite_request_cookies(&mut headers, &refreshed);

        assert_eq!(
            headers.get(COOKIE).unwrap(),
            "pref=a%3Bb%20c; t=x%0Ay; __session-access-token=new"
        );
        let jar = CookieJar::from_headers(&headers);
        assert_eq!(jar.get("pref").unwrap().value(), "a;b c");
    }

    #[test]
    fn test_rewrite_request_cookies_merges_multiple_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("a=1; __session-access-token=old"));
        headers.append(COOKIE, HeaderValue::from_static("b=2"));

        let refreshed = session_cookies("__session", "new", Some("r2"), 60, 30, true);
        rewrite_request_cookies(&mut headers, &refreshed);

        assert_eq!(headers.get_all(COOKIE).iter().count(), 1);
        assert_eq!(
            headers.get(COOKIE).unwrap(),
            "a=1; b=2; __session-access-token=new; __session-refresh-token=r2"
        );
    }

    #[test]
    fn test_session_cookies_huge_ttl_saturates() {
        let cookies = session_cookies("__session", "access", Some("refresh"), u64::MAX, i64::MAX, true);

        assert_eq!(cookies[0].max_age(), Some(Duration::seconds(i64::MAX)));
        assert_eq!(cookies[1].max_age(), Some(Duration::seconds(i64::MAX)));
    }

    #[test]
    fn test_rewrite_request_cookies_noop_without_refresh() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("a=1; b=2"));

        rewrite_request_cookies(&mut headers, &[]);

        assert_eq!(headers.get(COOKIE).unwrap(), "a=1; b=2");
    }
}
