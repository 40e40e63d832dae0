//! Runway Web Server
//!
//! Axum-based REST API for the Runway savings goal forecaster. Transport
//! only: one multipart endpoint that hands a CSV and a goal payload to
//! runway-core and serializes the result.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use runway_core::{ForecastEngine, HttpAugmentor, NoopAugmentor};

mod handlers;

#[cfg(test)]
mod tests;

/// Maximum file upload size (10 MB)
pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Allowed CORS origins for browser clients
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:5173".to_string(),
                "http://localhost:3000".to_string(),
            ],
        }
    }
}

/// Shared application state
pub struct AppState {
    pub engine: ForecastEngine,
}

impl AppState {
    pub fn new(engine: ForecastEngine) -> Self {
        Self { engine }
    }

    /// Engine wired to the augmentation backend from the environment, or a
    /// no-op backend when no endpoint is configured.
    pub fn from_env() -> Self {
        let engine = match HttpAugmentor::from_env() {
            Some(augmentor) => {
                info!("Suggestion augmentation enabled");
                ForecastEngine::new(Box::new(augmentor))
            }
            None => ForecastEngine::new(Box::new(NoopAugmentor)),
        };
        Self::new(engine)
    }
}

/// Build the application router
pub fn create_router(state: AppState, config: ServerConfig) -> Router {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(tower_http::cors::Any)
        .allow_origin(origins);

    Router::new()
        .route("/api/forecast/analyze", post(handlers::analyze))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Bind and serve until shutdown.
pub async fn serve(
    addr: std::net::SocketAddr,
    state: AppState,
    config: ServerConfig,
) -> anyhow::Result<()> {
    let router = create_router(state, config);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Runway server listening");
    axum::serve(listener, router).await?;
    Ok(())
}

/// API error with a sanitized public message.
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
