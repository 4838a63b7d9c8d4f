//! HTTP request handlers for the payroll API.
//!
//! Thin marshalling over the engine's operations: each handler opens one
//! unit of work, performs the write, and commits at the end of the
//! request. A failed write aborts the unit of work, so its dirty keys
//! never reach a drain.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{delete, get, post},
};
use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

use crate::engine::{UnitOfWork, commit_and_fetch};
use crate::error::EngineError;

use super::request::{AttendanceRequest, RecalculateRequest, SeedRequest};
use super::response::{ApiError, ApiErrorResponse, AttendanceResponse, SeedResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/attendance", post(record_attendance_handler))
        .route(
            "/attendance/:employee_id/:date",
            delete(delete_attendance_handler),
        )
        .route("/payroll/recalculate", post(recalculate_handler))
        .route("/payroll/seed", post(seed_handler))
        .route("/payroll/:employee_id/:year/:month", get(get_payroll_handler))
        .with_state(state)
}

fn json_error(status: StatusCode, error: ApiError) -> axum::response::Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(error),
    )
        .into_response()
}

fn engine_error(correlation_id: Uuid, error: EngineError) -> axum::response::Response {
    warn!(correlation_id = %correlation_id, error = %error, "Request failed");
    let response: ApiErrorResponse = error.into();
    json_error(response.status, response.error)
}

fn rejection_error(correlation_id: Uuid, rejection: JsonRejection) -> axum::response::Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(correlation_id = %correlation_id, error = %body_text, "JSON data error");
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "JSON syntax error");
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => ApiError::new(
            "MISSING_CONTENT_TYPE",
            "Content-Type must be application/json",
        ),
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_error(StatusCode::BAD_REQUEST, error)
}

/// Handler for `POST /attendance`.
///
/// Records one day's attendance, commits the request's unit of work, and
/// returns the stored record together with the payroll rows the commit
/// recalculated.
async fn record_attendance_handler(
    State(state): State<AppState>,
    payload: Result<Json<AttendanceRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing attendance write");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_error(correlation_id, rejection),
    };

    let engine = state.engine();
    let uow = UnitOfWork::new();
    let record = match engine.record_attendance(&uow, request.into()) {
        Ok(record) => record,
        Err(error) => {
            // Rejected write: roll the unit of work back.
            uow.abort();
            return engine_error(correlation_id, error);
        }
    };

    let (report, recalculated) = commit_and_fetch(uow, engine);
    info!(
        correlation_id = %correlation_id,
        employee_id = %record.employee_id,
        date = %record.date,
        recalculated = report.recalculated.len(),
        failures = report.failures.len(),
        "Attendance write committed"
    );

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(AttendanceResponse {
            record,
            recalculated,
        }),
    )
        .into_response()
}

/// Handler for `DELETE /attendance/{employee_id}/{date}`.
async fn delete_attendance_handler(
    State(state): State<AppState>,
    Path((employee_id, date)): Path<(String, NaiveDate)>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employee_id = %employee_id, date = %date, "Processing attendance delete");

    let engine = state.engine();
    let uow = UnitOfWork::new();
    if let Err(error) = engine.delete_attendance(&uow, &employee_id, date) {
        uow.abort();
        return engine_error(correlation_id, error);
    }

    let report = uow.commit(engine);
    info!(
        correlation_id = %correlation_id,
        recalculated = report.recalculated.len(),
        failures = report.failures.len(),
        "Attendance delete committed"
    );
    StatusCode::NO_CONTENT.into_response()
}

/// Handler for `POST /payroll/recalculate`.
///
/// Administrative correction path: recalculates synchronously, bypassing
/// the unit-of-work scheduler.
async fn recalculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<RecalculateRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_error(correlation_id, rejection),
    };
    info!(
        correlation_id = %correlation_id,
        employee_id = %request.employee_id,
        year = request.year,
        month = request.month,
        "Forcing payroll recalculation"
    );

    match state
        .engine()
        .force_recalculate(&request.employee_id, request.year, request.month)
    {
        Ok(Some(payroll)) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            Json(payroll),
        )
            .into_response(),
        Ok(None) => engine_error(
            correlation_id,
            EngineError::EmployeeNotFound {
                employee_id: request.employee_id,
            },
        ),
        Err(error) => engine_error(correlation_id, error),
    }
}

/// Handler for `POST /payroll/seed`.
async fn seed_handler(
    State(state): State<AppState>,
    payload: Result<Json<SeedRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_error(correlation_id, rejection),
    };

    match state.engine().seed_month(request.year, request.month) {
        Ok(created) => {
            info!(
                correlation_id = %correlation_id,
                year = request.year,
                month = request.month,
                created,
                "Payroll month seeded"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(SeedResponse { created }),
            )
                .into_response()
        }
        Err(error) => engine_error(correlation_id, error),
    }
}

/// Handler for `GET /payroll/{employee_id}/{year}/{month}`.
async fn get_payroll_handler(
    State(state): State<AppState>,
    Path((employee_id, year, month)): Path<(String, i32, u32)>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();

    match state.engine().payroll(&employee_id, year, month) {
        Ok(Some(payroll)) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            Json(payroll),
        )
            .into_response(),
        Ok(None) => engine_error(
            correlation_id,
            EngineError::PayrollNotFound {
                employee_id,
                year,
                month,
            },
        ),
        Err(error) => engine_error(correlation_id, error),
    }
}
