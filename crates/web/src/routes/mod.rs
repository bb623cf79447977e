//! HTTP routes
//!
//! GET pages answer with JSON view models; form posts answer with a
//! `303 See Other` carrying a notice for the next page.

mod auth;
mod bookings;
mod events;
mod health;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use bracket_core::banners::BANNER_DIR;
use bracket_core::Error as CoreError;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::error::PageError;
use crate::state::AppState;

/// Build the application router
pub fn router(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit;
    let banner_dir = state.banners.base_path().join(BANNER_DIR);

    Router::new()
        .route("/", get(events::index))
        .route("/events/:id", get(events::details))
        .route("/create", get(events::create_form).post(events::create))
        .route("/events/:id/edit", get(events::edit_form).post(events::edit))
        .route("/events/:id/comment", post(events::comment))
        .route("/events/:id/cancel", post(events::cancel))
        .route("/events/:id/reopen", post(events::reopen))
        .route("/events/:id/delete", post(events::delete))
        .route("/events/:id/book", post(bookings::book))
        .route("/history", get(bookings::history))
        .route("/users/:id", get(events::profile))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/register", get(auth::register_form).post(auth::register))
        .route("/logout", get(auth::logout))
        .route("/health", get(health::health))
        .nest_service("/static/img", ServeDir::new(banner_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

/// Path ids that are not UUIDs name nothing
pub(crate) fn parse_id(raw: &str, what: &str) -> Result<Uuid, PageError> {
    Uuid::parse_str(raw)
        .map_err(|_| PageError::new(CoreError::NotFound(format!("{} not found.", what)), "/"))
}
