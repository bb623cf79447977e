//! Login, registration and logout

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Response;
use axum::Form;
use bracket_core::validation::safe_next_path;
use bracket_core::{AuthService, RegistrationForm};
use serde::Deserialize;

use crate::error::PageError;
use crate::flash::{flash_cookie, Flash};
use crate::session::{
    clear_session_cookie, login_url, redirect_setting, redirect_with, session_cookie, session_id,
    CurrentUser, RequireUser,
};
use crate::state::AppState;
use crate::views::{AuthFormView, Page};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub next: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// `next` only if it stays on this site
fn safe_next(next: Option<&str>) -> Option<String> {
    next.and_then(safe_next_path).map(str::to_string)
}

pub async fn login_form(
    CurrentUser(viewer): CurrentUser,
    Query(query): Query<NextQuery>,
    headers: HeaderMap,
) -> Page<AuthFormView> {
    let view = AuthFormView {
        heading: "Login",
        next: safe_next(query.next.as_deref()),
    };
    Page::new(&headers, viewer, view)
}

pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, PageError> {
    let next = safe_next(form.next.as_deref());
    let retry = match &next {
        Some(path) => login_url(path),
        None => "/login".to_string(),
    };

    let signed_in = {
        let db = state.db()?;
        AuthService::new(&*db)
            .with_session_hours(state.config.session.hours)
            .login(&form.username, &form.password)
    }
    .map_err(|e| PageError::new(e, retry))?;

    tracing::debug!(user = %signed_in.identity.username, "Logged in");
    let cookie = session_cookie(&state.config.session, signed_in.session.id);
    Ok(redirect_setting(next.as_deref().unwrap_or("/"), vec![cookie]))
}

pub async fn register_form(CurrentUser(viewer): CurrentUser, headers: HeaderMap) -> Page<AuthFormView> {
    let view = AuthFormView {
        heading: "Register",
        next: None,
    };
    Page::new(&headers, viewer, view)
}

pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegistrationForm>,
) -> Result<Response, PageError> {
    {
        let db = state.db()?;
        AuthService::new(&*db).register(&form)
    }
    .map_err(|e| PageError::new(e, "/register"))?;

    Ok(redirect_with(
        "/login",
        Flash::success("Registration successful! Please log in."),
    ))
}

pub async fn logout(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    headers: HeaderMap,
) -> Result<Response, PageError> {
    let config = &state.config.session;
    {
        let db = state.db()?;
        AuthService::new(&*db).logout(session_id(&headers, config))
    }
    .map_err(PageError::internal)?;
    tracing::debug!(user = %user.username, "Logged out");

    let cookies = vec![
        clear_session_cookie(config),
        flash_cookie(&Flash::info("You have been logged out.")),
    ];
    Ok(redirect_setting("/", cookies))
}
