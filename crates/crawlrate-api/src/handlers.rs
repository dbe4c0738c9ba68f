//! REST API handlers.
//!
//! Each handler delegates to `SessionStore` (or the rate calculators)
//! and returns a JSON envelope.

use std::time::Duration;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::debug;

use crawlrate_core::{Constraint, PlanError, Timing};
use crawlrate_session::{SessionError, SessionId};

use crate::ApiState;

/// Response wrapper for consistent API format.
#[derive(serde::Serialize)]
struct ApiResponse<T: serde::Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: serde::Serialize> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }
}

fn error_response(msg: &str, status: StatusCode) -> Response {
    (
        status,
        Json(ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(msg.to_string()),
        }),
    )
        .into_response()
}

fn plan_error_status(err: &PlanError) -> StatusCode {
    match err {
        PlanError::InvalidArgument(_) | PlanError::ConstraintViolation(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    }
}

fn session_error_response(err: SessionError) -> Response {
    let status = match &err {
        SessionError::SessionNotFound(_) => StatusCode::NOT_FOUND,
        SessionError::SessionClosed(_) => StatusCode::CONFLICT,
        SessionError::EmptySession(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SessionError::Plan(e) => plan_error_status(e),
    };
    error_response(&err.to_string(), status)
}

// ── Request bodies ─────────────────────────────────────────────

/// Body of `POST /sessions/{id}/duration`.
#[derive(serde::Deserialize)]
pub struct DurationRequest {
    pub keywords: Vec<String>,
    pub proxies: Vec<String>,
    #[serde(flatten)]
    pub timing: Timing,
    #[serde(with = "humantime_serde")]
    pub time_period: Duration,
}

/// Body of `POST /sessions/{id}/connections`.
#[derive(serde::Deserialize)]
pub struct ConnectionsRequest {
    pub keywords: Vec<String>,
    pub proxies: Vec<String>,
    #[serde(flatten)]
    pub timing: Timing,
    pub max_connections: u32,
}

/// Body of `POST /pulse`.
#[derive(serde::Deserialize)]
pub struct PulseRequest {
    pub keyword_count: usize,
    pub proxy_count: usize,
    #[serde(flatten)]
    pub timing: Timing,
    #[serde(flatten)]
    pub constraint: Constraint,
}

#[derive(serde::Serialize)]
struct CreatedSession {
    id: SessionId,
}

// ── Sessions ───────────────────────────────────────────────────

/// GET /api/v1/sessions
pub async fn list_sessions(State(state): State<ApiState>) -> Response {
    ApiResponse::ok(state.sessions.list_sessions().await).into_response()
}

/// POST /api/v1/sessions
pub async fn create_session(State(state): State<ApiState>) -> Response {
    let id = state.sessions.create_session().await;
    (StatusCode::CREATED, ApiResponse::ok(CreatedSession { id })).into_response()
}

/// GET /api/v1/sessions/{id}
pub async fn get_session(State(state): State<ApiState>, Path(id): Path<String>) -> Response {
    match state.sessions.summary(&SessionId::from(id.as_str())).await {
        Ok(summary) => ApiResponse::ok(summary).into_response(),
        Err(e) => session_error_response(e),
    }
}

/// DELETE /api/v1/sessions/{id}
pub async fn close_session(State(state): State<ApiState>, Path(id): Path<String>) -> Response {
    match state.sessions.close_session(&SessionId::from(id.as_str())).await {
        Ok(()) => ApiResponse::ok("closed").into_response(),
        Err(e) => session_error_response(e),
    }
}

/// POST /api/v1/sessions/{id}/duration
pub async fn add_duration_request(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(req): Json<DurationRequest>,
) -> Response {
    let id = SessionId::from(id.as_str());
    match state
        .sessions
        .add_duration_request(&id, req.keywords, req.proxies, req.timing, req.time_period)
        .await
    {
        Ok(pulse) => ApiResponse::ok(pulse).into_response(),
        Err(e) => session_error_response(e),
    }
}

/// POST /api/v1/sessions/{id}/connections
pub async fn add_connections_request(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(req): Json<ConnectionsRequest>,
) -> Response {
    let id = SessionId::from(id.as_str());
    match state
        .sessions
        .add_connections_request(&id, req.keywords, req.proxies, req.timing, req.max_connections)
        .await
    {
        Ok(pulse) => ApiResponse::ok(pulse).into_response(),
        Err(e) => session_error_response(e),
    }
}

/// POST /api/v1/sessions/{id}/plan
pub async fn finalize_plan(State(state): State<ApiState>, Path(id): Path<String>) -> Response {
    match state.sessions.finalize_plan(&SessionId::from(id.as_str())).await {
        Ok(plan) => ApiResponse::ok(plan).into_response(),
        Err(e) => session_error_response(e),
    }
}

// ── Pulse ──────────────────────────────────────────────────────

/// POST /api/v1/pulse
pub async fn compute_pulse(Json(req): Json<PulseRequest>) -> Response {
    match crawlrate_placement::compute_pulse(
        req.keyword_count,
        req.proxy_count,
        &req.timing,
        &req.constraint,
    ) {
        Ok(pulse) => {
            debug!(%pulse, algorithm = %req.constraint.algorithm(), "pulse computed");
            ApiResponse::ok(pulse).into_response()
        }
        Err(e) => error_response(&e.to_string(), plan_error_status(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crawlrate_session::SessionStore;

    fn test_state() -> ApiState {
        ApiState {
            sessions: SessionStore::default(),
        }
    }

    #[tokio::test]
    async fn list_sessions_empty() {
        let resp = list_sessions(State(test_state())).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn create_session_returns_created() {
        let state = test_state();
        let resp = create_session(State(state.clone())).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(state.sessions.list_sessions().await.len(), 1);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let resp = finalize_plan(State(test_state()), Path("missing".to_string())).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn constraint_violation_is_unprocessable() {
        let req = PulseRequest {
            keyword_count: 100,
            proxy_count: 10,
            timing: Timing::from_secs(45, 15),
            constraint: Constraint::FixedDuration {
                time_period: Duration::from_secs(50),
            },
        };
        let resp = compute_pulse(Json(req)).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn finalized_session_rejects_requests() {
        let state = test_state();
        let id = state.sessions.create_session().await;
        let body = || ConnectionsRequest {
            keywords: vec!["k0".to_string()],
            proxies: vec!["p0".to_string()],
            timing: Timing::default(),
            max_connections: 1,
        };

        let resp =
            add_connections_request(State(state.clone()), Path(id.to_string()), Json(body())).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = finalize_plan(State(state.clone()), Path(id.to_string())).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = add_connections_request(State(state), Path(id.to_string()), Json(body())).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }
}
