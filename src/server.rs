//! HTTP operation server.
//!
//! Exposes the [`OperationRegistry`] as a small JSON API so an external
//! orchestrator can discover and call operations over HTTP.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/operations` | List all registered operations with schemas |
//! | `POST` | `/operations/{name}` | Call an operation by qualified or bare name |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! Only dispatch failures are HTTP errors:
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "invalid parameters: missing required parameter: userName" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404). A missing file or a
//! database fault is a `200` whose `result` carries the diagnostic string.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::Config;
use crate::traits::{DispatchError, OperationInfo, OperationRegistry};

/// Starts the server on `[server].bind` and runs until the process exits.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let registry = Arc::new(OperationRegistry::from_config(config)?);

    for op in registry.operations() {
        info!(
            "POST /operations/{}: {}",
            op.qualified_name(),
            op.description()
        );
    }

    let app = router(registry);
    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    info!("operation server listening on http://{}", config.server.bind);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the router; exposed so tests can serve it on an ephemeral port.
pub fn router(registry: Arc<OperationRegistry>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/operations", get(handle_list_operations))
        .route("/operations/{name}", post(handle_invoke))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(registry)
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code.to_string(),
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<DispatchError> for AppError {
    fn from(err: DispatchError) -> Self {
        let (status, code) = match err {
            DispatchError::UnknownOperation(_) => (StatusCode::NOT_FOUND, "not_found"),
            DispatchError::Ambiguous { .. } | DispatchError::InvalidParams(_) => {
                (StatusCode::BAD_REQUEST, "bad_request")
            }
        };
        AppError {
            status,
            code,
            message: err.to_string(),
        }
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /operations ============

#[derive(Serialize)]
struct OperationListResponse {
    operations: Vec<OperationInfo>,
}

async fn handle_list_operations(
    State(registry): State<Arc<OperationRegistry>>,
) -> Json<OperationListResponse> {
    Json(OperationListResponse {
        operations: registry.list(),
    })
}

// ============ POST /operations/{name} ============

#[derive(Serialize)]
struct InvokeResponse {
    result: String,
}

/// An empty body is treated as `{}` so parameterless operations can be
/// called without one.
async fn handle_invoke(
    State(registry): State<Arc<OperationRegistry>>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<InvokeResponse>, AppError> {
    let params = if body.iter().all(u8::is_ascii_whitespace) {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).map_err(|e| AppError {
            status: StatusCode::BAD_REQUEST,
            code: "bad_request",
            message: format!("request body is not valid JSON: {}", e),
        })?
    };
    let result = registry.invoke(&name, params).await?;
    Ok(Json(InvokeResponse { result }))
}
