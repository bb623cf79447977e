//! Bracket web server: HTTP routes, sessions and notices over `bracket-core`

pub mod config;
pub mod error;
pub mod flash;
pub mod routes;
pub mod session;
pub mod state;
pub mod views;

pub use config::Config;
pub use error::{PageError, WebError};
pub use routes::router;
pub use state::AppState;
