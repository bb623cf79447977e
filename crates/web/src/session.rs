//! Session cookies, redirects, and the identity extractors

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, HeaderMap, Method};
use axum::response::{AppendHeaders, IntoResponse, Redirect, Response};
use bracket_core::validation::safe_next_path;
use bracket_core::{AuthService, Identity};
use cookie::Cookie;
use url::Url;
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::error::PageError;
use crate::flash::{flash_cookie, request_cookie, Flash};
use crate::state::AppState;

/// Session id carried by the request, if any
pub fn session_id(headers: &HeaderMap, config: &SessionConfig) -> Option<Uuid> {
    request_cookie(headers, &config.cookie_name).and_then(|v| Uuid::parse_str(&v).ok())
}

pub fn session_cookie(config: &SessionConfig, session_id: Uuid) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), session_id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(cookie::SameSite::Lax)
        .secure(config.secure)
        .max_age(cookie::time::Duration::hours(config.hours))
        .build()
}

pub fn clear_session_cookie(config: &SessionConfig) -> Cookie<'static> {
    let mut cookie = Cookie::build((config.cookie_name.clone(), ""))
        .path("/")
        .http_only(true)
        .build();
    cookie.make_removal();
    cookie
}

/// 303 to `location`, setting each cookie
pub fn redirect_setting(location: &str, cookies: Vec<Cookie<'static>>) -> Response {
    let headers: Vec<_> = cookies
        .into_iter()
        .map(|c| (header::SET_COOKIE, c.to_string()))
        .collect();
    (AppendHeaders(headers), Redirect::to(location)).into_response()
}

/// 303 to `location` with a notice for the next page
pub fn redirect_with(location: &str, flash: Flash) -> Response {
    redirect_setting(location, vec![flash_cookie(&flash)])
}

/// Login page URL that returns to `next` afterwards
pub fn login_url(next: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(next.as_bytes()).collect();
    format!("/login?next={}", encoded)
}

/// Raw `Referer` header
pub fn referrer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
}

/// Same-site path and query of the referring page
fn referrer_path(headers: &HeaderMap) -> Option<String> {
    let raw = referrer(headers)?;
    let url = Url::parse(raw)
        .or_else(|_| Url::parse("http://localhost").and_then(|base| base.join(raw)))
        .ok()?;
    let path = match url.query() {
        Some(q) => format!("{}?{}", url.path(), q),
        None => url.path().to_string(),
    };
    safe_next_path(&path).map(str::to_string)
}

/// Where to come back to after logging in. A POST target cannot be
/// revisited with GET, so its referring page is used instead.
fn return_path(parts: &Parts) -> String {
    if parts.method == Method::GET || parts.method == Method::HEAD {
        let target = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        return safe_next_path(target).unwrap_or("/").to_string();
    }
    referrer_path(&parts.headers).unwrap_or_else(|| "/".to_string())
}

/// The signed-in user, if the session cookie is valid
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<Identity>);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = PageError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(id) = session_id(&parts.headers, &state.config.session) else {
            return Ok(Self(None));
        };

        let db = state.db()?;
        let identity = AuthService::new(&*db)
            .current_identity(id)
            .map_err(PageError::internal)?;
        Ok(Self(identity))
    }
}

/// A signed-in user; anonymous requests are sent to the login page
#[derive(Debug, Clone)]
pub struct RequireUser(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for RequireUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let CurrentUser(identity) = CurrentUser::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        match identity {
            Some(identity) => Ok(Self(identity)),
            None => {
                tracing::debug!(path = %parts.uri.path(), "Anonymous request sent to login");
                Err(redirect_with(
                    &login_url(&return_path(parts)),
                    Flash::info("Please log in to continue."),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, Request};

    fn parts(method: Method, uri: &str, referer: Option<&str>) -> Parts {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(r) = referer {
            builder = builder.header(header::REFERER, r);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_session_cookie_flags() {
        let config = SessionConfig::default();
        let id = Uuid::new_v4();
        let cookie = session_cookie(&config, id);
        let text = cookie.to_string();

        assert!(text.starts_with(&format!("bracket_session={}", id)));
        assert!(text.contains("HttpOnly"));
        assert!(text.contains("SameSite=Lax"));
        assert!(!text.contains("Secure"));

        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&cookie.stripped().to_string()).unwrap(),
        );
        assert_eq!(session_id(&headers, &config), Some(id));
    }

    #[test]
    fn test_login_url_encodes_next() {
        assert_eq!(login_url("/create"), "/login?next=%2Fcreate");
        assert_eq!(login_url("/events/1?a=b"), "/login?next=%2Fevents%2F1%3Fa%3Db");
    }

    #[test]
    fn test_return_path() {
        assert_eq!(return_path(&parts(Method::GET, "/history", None)), "/history");
        assert_eq!(
            return_path(&parts(Method::POST, "/events/1/book", Some("http://localhost:3000/events/1"))),
            "/events/1"
        );
        assert_eq!(
            return_path(&parts(Method::POST, "/create", Some("https://evil.example//x"))),
            "/"
        );
        assert_eq!(return_path(&parts(Method::POST, "/create", None)), "/");
    }
}
