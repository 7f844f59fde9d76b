//! Hearth Web Server
//!
//! Axum-based REST API for the Hearth shared-property cost simulator.
//!
//! - Named configuration store with optimistic versioning (`If-Match`)
//! - Simulation endpoints running the allocation engine per request
//! - Restrictive CORS policy, security headers and a request body limit
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::CorsLayer, limit::RequestBodyLimitLayer, services::ServeDir,
    set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info};

use hearth_core::{Database, Defaults};

mod handlers;

/// Maximum request body size (2 MB)
pub const MAX_BODY_SIZE: usize = 2 * 1024 * 1024;

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// Maximum request body size in bytes
    pub body_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![],
            body_limit: MAX_BODY_SIZE,
        }
    }
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    /// Defaults used for new snapshots and lenient imports
    pub defaults: Defaults,
}

/// Body of a successful delete
///
/// `ok` mirrors `success` for clients of the older browser server.
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub ok: bool,
}

impl SuccessResponse {
    pub fn done() -> Self {
        Self {
            success: true,
            ok: true,
        }
    }
}

/// Create the application router
pub fn create_router(
    db: Database,
    defaults: Defaults,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> Router {
    let state = Arc::new(AppState { db, defaults });

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/defaults", get(handlers::get_defaults))
        // Configuration store
        .route("/configs", get(handlers::list_configs))
        .route("/configs/summary", get(handlers::list_config_summaries))
        .route(
            "/configs/:name",
            get(handlers::get_config)
                .post(handlers::save_config)
                .put(handlers::save_config)
                .delete(handlers::delete_config),
        )
        .route("/configs/:name/simulation", get(handlers::simulate_config))
        // Engine
        .route("/simulate", post(handlers::simulate_document))
        .route("/calendar/:year", get(handlers::get_calendar));

    // Build CORS layer
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::IF_MATCH])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::IF_MATCH])
    };

    // CSP: the browser UI is plain same-origin scripts and styles
    let csp_value = HeaderValue::from_static(
        "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data:; connect-src 'self'; frame-ancestors 'none'"
    );

    let mut app = Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp_value,
        ));

    // Serve static files if directory provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    db: Database,
    defaults: Defaults,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    match db.list_config_summaries() {
        Ok(configs) => info!("{} stored configuration(s)", configs.len()),
        Err(e) => error!("Failed to read configurations: {}", e),
    }

    let app = create_router(db, defaults, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
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

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn conflict(msg: &str) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: msg.to_string(),
            internal: None,
        }
    }

    /// Map a core error to its HTTP status; storage failures stay opaque
    pub fn from_core(err: hearth_core::Error) -> Self {
        use hearth_core::Error;

        match err {
            Error::InvalidData(msg) => Self::bad_request(&msg),
            Error::NotFound(_) => Self::not_found("Not found"),
            conflict @ Error::Conflict { .. } => Self::conflict(&conflict.to_string()),
            other => other.into(),
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

#[cfg(test)]
mod tests;
