//! One-shot notices carried to the next page view in a cookie

use axum::http::{header, HeaderMap};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use cookie::Cookie;
use serde::{Deserialize, Serialize};

pub const FLASH_COOKIE: &str = "bracket_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Info,
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: Level,
    pub message: String,
}

impl Flash {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Level::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Level::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Level::Warning, message)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(Level::Danger, message)
    }
}

/// Cookie holding a pending notice
pub fn flash_cookie(flash: &Flash) -> Cookie<'static> {
    let json = serde_json::to_vec(&[flash]).unwrap_or_default();
    Cookie::build((FLASH_COOKIE, URL_SAFE_NO_PAD.encode(json)))
        .path("/")
        .http_only(true)
        .same_site(cookie::SameSite::Lax)
        .build()
}

/// Cookie that drops any pending notices
pub fn clear_flash_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build((FLASH_COOKIE, "")).path("/").build();
    cookie.make_removal();
    cookie
}

/// Pending notices sent with the request. Garbage is ignored.
pub fn read_notices(headers: &HeaderMap) -> Vec<Flash> {
    request_cookie(headers, FLASH_COOKIE)
        .and_then(|raw| URL_SAFE_NO_PAD.decode(raw).ok())
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .unwrap_or_default()
}

/// Value of a named cookie from the request's `Cookie` headers
pub fn request_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| Cookie::split_parse(value))
        .filter_map(Result::ok)
        .find(|c| c.name() == name)
        .map(|c| c.value().to_string())
}
