//! Router setup with all API routes and middleware.
//!
//! Configures the axum Router with CORS, tracing, compression,
//! and all endpoint handlers.

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Create the axum Router with all routes and middleware.
///
/// # Arguments
/// * `state` - The shared application state.
///
/// # Returns
/// A fully configured axum Router ready to serve requests.
pub fn create_router(state: AppState) -> Router {
    // The API is consumed by browser frontends served from arbitrary
    // origins, so CORS is wide open. No credentials are exchanged.
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/chat",
            get(handlers::list_chats).post(handlers::create_chat),
        )
        .route(
            "/chat/{chat_id}",
            get(handlers::get_chat).put(handlers::update_chat),
        )
        .route("/chat/{chat_id}/forms", get(handlers::list_forms))
        .route(
            "/form-submission/{form_id}",
            axum::routing::put(handlers::update_form).delete(handlers::delete_form),
        )
        .layer(DefaultBodyLimit::max(1024 * 1024)) // 1MB global limit
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server on the configured address.
pub async fn start_server(
    config: &intake_core::config::IntakeConfig,
    state: AppState,
) -> Result<(), intake_core::error::IntakeError> {
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let router = create_router(state);

    tracing::info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| intake_core::error::IntakeError::Api(format!("Failed to bind: {}", e)))?;

    axum::serve(listener, router)
        .await
        .map_err(|e| intake_core::error::IntakeError::Api(format!("Server error: {}", e)))?;

    Ok(())
}
