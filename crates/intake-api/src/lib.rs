//! Intake API crate - axum HTTP server and route handlers.
//!
//! Provides the REST API for the Intake application: chat creation and
//! retrieval, model-driven chat updates, form submission listing, and
//! form update/delete endpoints.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
