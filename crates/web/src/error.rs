//! Request-boundary errors
//!
//! Domain failures become a notice and a redirect to a page the user can act
//! on. Anything else is logged and answered with a 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bracket_core::Error as CoreError;

use crate::config::ConfigError;
use crate::flash::Flash;
use crate::session::redirect_with;

#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database lock poisoned")]
    LockPoisoned,

    #[error("Malformed request: {0}")]
    BadRequest(String),
}

/// A failed page action and where to send the user afterwards
#[derive(Debug)]
pub struct PageError {
    pub error: WebError,
    pub fallback: String,
}

impl PageError {
    pub fn new(error: impl Into<WebError>, fallback: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            fallback: fallback.into(),
        }
    }

    /// No sensible page to return to
    pub fn internal(error: impl Into<WebError>) -> Self {
        Self::new(error, "/")
    }
}

impl From<WebError> for PageError {
    fn from(error: WebError) -> Self {
        Self::internal(error)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let core = match self.error {
            WebError::Core(core) => core,
            WebError::BadRequest(msg) => {
                tracing::debug!(%msg, "Rejected malformed request");
                return (StatusCode::BAD_REQUEST, msg).into_response();
            }
            other => {
                tracing::error!(error = %other, "Request failed");
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        };

        let message = core.user_message();
        match core {
            CoreError::Validation(_) => redirect_with(&self.fallback, Flash::danger(message)),
            CoreError::Authorization(_) | CoreError::Precondition(_) => {
                redirect_with(&self.fallback, Flash::warning(message))
            }
            CoreError::NotFound(_) => redirect_with("/", Flash::warning(message)),
            CoreError::Authentication(_) => redirect_with(&self.fallback, Flash::danger(message)),
            other => {
                tracing::error!(error = %other, "Request failed");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
