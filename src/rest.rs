//! HTTP API for driving memory pressure.
//!
//! Endpoints:
//! - `GET /` — configured greeting
//! - `GET /health` — liveness probe, always `"OK"`
//! - `GET /allocate/{amount}` — allocate `amount` MiB, returns the new id
//! - `GET /deallocate/{id}` — free one allocation
//! - `GET /clear` — free every allocation
//! - `GET /allocations` — report live allocations and their total

use std::fmt::Write as _;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::Settings;
use crate::registry::Registry;

/// State shared by every handler.
#[derive(Debug)]
pub struct AppState {
    pub greeting: String,
    pub registry: Registry,
}

impl AppState {
    pub fn new(greeting: String) -> Self {
        Self {
            greeting,
            registry: Registry::new(),
        }
    }
}

/// Start the server with the given settings.
///
/// Binds the listener, logs the actual address, and serves until the process
/// is killed. A bind failure is returned to the caller for logging.
pub async fn serve(settings: Settings) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let state = Arc::new(AppState::new(settings.greeting.clone()));
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(settings.bind_addr()).await?;
    info!(addr = %listener.local_addr()?, "memstress listening");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Build the axum router (separated for testing).
pub fn router(state: Arc<AppState>) -> Router {
    // allocate/deallocate are GET-only; the other routes answer any method.
    Router::new()
        .route("/", any(root))
        .route("/health", any(health))
        .route("/allocate/:amount", get(allocate))
        .route("/deallocate/:id", get(deallocate))
        .route("/clear", any(clear))
        .route("/allocations", any(list_allocations))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

async fn root(State(state): State<Arc<AppState>>) -> String {
    state.greeting.clone()
}

async fn health() -> &'static str {
    "OK"
}

/// Allocate `amount` MiB and register it under a fresh id.
///
/// The amount is parsed here rather than by the extractor so that a bad
/// argument gets a plain 400 with a message and never reaches the registry:
/// validation failures do not consume an id.
async fn allocate(State(state): State<Arc<AppState>>, Path(amount): Path<String>) -> Response {
    let units: usize = match amount.parse() {
        Ok(n) => n,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                "Invalid argument, amount should be an integer",
            )
                .into_response();
        }
    };

    match state.registry.allocate(units) {
        Ok(id) => {
            info!(id = %id, units, "allocated");
            (StatusCode::OK, id).into_response()
        }
        Err(e) => {
            error!(error = %e, units, "allocation failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "allocation failed").into_response()
        }
    }
}

async fn deallocate(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    if state.registry.deallocate(&id) {
        info!(id = %id, "deallocated");
        (StatusCode::OK, "OK").into_response()
    } else {
        (StatusCode::NOT_FOUND, "not found").into_response()
    }
}

async fn clear(State(state): State<Arc<AppState>>) -> &'static str {
    state.registry.clear();
    "OK"
}

async fn list_allocations(State(state): State<Arc<AppState>>) -> String {
    let entries = state.registry.snapshot();
    let mut body = String::new();
    let mut total: usize = 0;
    for (id, units) in &entries {
        total += units;
        // Writing to a String cannot fail.
        let _ = writeln!(body, "{} => {}", id, units);
    }
    let _ = writeln!(body, "total {}", total);
    body
}
