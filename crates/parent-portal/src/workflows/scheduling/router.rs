use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDateTime};
use serde::Deserialize;
use serde_json::json;

use super::domain::{Lesson, RequestSubmission};
use super::repository::{CapacityProbe, PortalRepository, RepositoryError};
use super::service::{LeaveRequestService, LeaveServiceError};

/// Router builder exposing the leave-request endpoints.
pub fn scheduling_router<R, C>(service: Arc<LeaveRequestService<R, C>>) -> Router
where
    R: PortalRepository + 'static,
    C: CapacityProbe + 'static,
{
    Router::new()
        .route(
            "/api/v1/students/:student_id/schedule",
            get(schedule_handler::<R, C>),
        )
        .route(
            "/api/v1/students/:student_id/requests",
            get(requests_handler::<R, C>),
        )
        .route(
            "/api/v1/leave/makeup-slots",
            post(makeup_slots_handler::<R, C>),
        )
        .route("/api/v1/leave/requests", post(submit_handler::<R, C>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ClockQuery {
    /// Override the evaluation clock; defaults to the local wall clock.
    #[serde(default)]
    now: Option<NaiveDateTime>,
}

impl ClockQuery {
    fn now_or_wall_clock(&self) -> NaiveDateTime {
        self.now.unwrap_or_else(|| Local::now().naive_local())
    }
}

/// Body for makeup-slot resolution: the target lesson plus an optional
/// clock override.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MakeupSlotRequest {
    lesson: Lesson,
    #[serde(default)]
    now: Option<NaiveDateTime>,
}

pub(crate) async fn schedule_handler<R, C>(
    State(service): State<Arc<LeaveRequestService<R, C>>>,
    Path(student_id): Path<String>,
    Query(clock): Query<ClockQuery>,
) -> Response
where
    R: PortalRepository + 'static,
    C: CapacityProbe + 'static,
{
    match service.schedule_overview(&student_id, clock.now_or_wall_clock()) {
        Ok(overview) => (StatusCode::OK, axum::Json(overview)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn requests_handler<R, C>(
    State(service): State<Arc<LeaveRequestService<R, C>>>,
    Path(student_id): Path<String>,
) -> Response
where
    R: PortalRepository + 'static,
    C: CapacityProbe + 'static,
{
    match service.request_history(&student_id) {
        Ok(history) => (StatusCode::OK, axum::Json(history)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn makeup_slots_handler<R, C>(
    State(service): State<Arc<LeaveRequestService<R, C>>>,
    axum::Json(payload): axum::Json<MakeupSlotRequest>,
) -> Response
where
    R: PortalRepository + 'static,
    C: CapacityProbe + 'static,
{
    let now = payload
        .now
        .unwrap_or_else(|| Local::now().naive_local());
    match service.resolve_makeup_slots(&payload.lesson, now) {
        // An empty list is a valid outcome ("no compatible courses"); only a
        // malformed course id is an error.
        Ok(slots) => (StatusCode::OK, axum::Json(slots)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn submit_handler<R, C>(
    State(service): State<Arc<LeaveRequestService<R, C>>>,
    axum::Json(submission): axum::Json<RequestSubmission>,
) -> Response
where
    R: PortalRepository + 'static,
    C: CapacityProbe + 'static,
{
    let now = Local::now().naive_local();
    match service.submit(submission, now) {
        Ok(request) => (StatusCode::ACCEPTED, axum::Json(request)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: LeaveServiceError) -> Response {
    let status = match &err {
        LeaveServiceError::Policy(_) => StatusCode::UNPROCESSABLE_ENTITY,
        LeaveServiceError::CourseId(_) => StatusCode::BAD_REQUEST,
        LeaveServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        LeaveServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        LeaveServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
