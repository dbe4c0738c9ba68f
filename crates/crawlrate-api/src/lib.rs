//! crawlrate-api: REST API for the plan merge service.
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/api/v1/sessions` | List sessions |
//! | POST | `/api/v1/sessions` | Create a session |
//! | GET | `/api/v1/sessions/{id}` | Session summary |
//! | DELETE | `/api/v1/sessions/{id}` | Close a session |
//! | POST | `/api/v1/sessions/{id}/duration` | Add a fixed-duration request |
//! | POST | `/api/v1/sessions/{id}/connections` | Add a fixed-connections request |
//! | POST | `/api/v1/sessions/{id}/plan` | Finalize and return the merged plan |
//! | POST | `/api/v1/pulse` | One-shot pulse calculation |

pub mod handlers;

use axum::Router;
use axum::routing::{get, post};
use crawlrate_session::SessionStore;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub sessions: SessionStore,
}

/// Build the complete API router.
pub fn build_router(sessions: SessionStore) -> Router {
    let api_state = ApiState { sessions };

    let api_routes = Router::new()
        .route("/sessions", get(handlers::list_sessions).post(handlers::create_session))
        .route("/sessions/{id}", get(handlers::get_session).delete(handlers::close_session))
        .route("/sessions/{id}/duration", post(handlers::add_duration_request))
        .route("/sessions/{id}/connections", post(handlers::add_connections_request))
        .route("/sessions/{id}/plan", post(handlers::finalize_plan))
        .route("/pulse", post(handlers::compute_pulse))
        .with_state(api_state);

    Router::new().nest("/api/v1", api_routes)
}
