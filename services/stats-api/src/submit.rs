//! Shared submission path for every statistic endpoint.
//!
//! Synchronous and asynchronous endpoints run the same code: validate,
//! preprocess, enqueue. They differ only in how the HTTP response is
//! produced, so the difference is a two-variant mode instead of two
//! handler hierarchies.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use metrics::counter;
use serde_json::Value;
use tracing::{info, warn};

use ephemeral_engine::{EphemeralOperation, RouteParams};
use geostat_common::GeostatError;
use stats_protocol::{ErrorResponse, JobStatus, ProcessingResponse};

use crate::state::AppState;

/// How an endpoint produces its HTTP response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Block until the job is terminal and return its final envelope.
    Synchronous,

    /// Return the accepted envelope immediately; the client polls the
    /// engine's status endpoint.
    Asynchronous,
}

/// Drive one operation through the engine and produce the HTTP response.
///
/// The caller has already validated the request body, so everything
/// rejected past this point carries the engine's error envelope.
pub async fn submit(
    state: &Arc<AppState>,
    params: RouteParams,
    body: Option<Value>,
    user_data: Option<String>,
    operation: Box<dyn EphemeralOperation>,
    mode: ExecutionMode,
) -> Response {
    let operation_name = operation.name();
    counter!("stats_requests_total").increment(1);

    let descriptor = match state.engine.preprocess(params, body).await {
        Ok(descriptor) => descriptor,
        Err(err) => {
            warn!(operation = operation_name, error = %err, "request preprocessing failed");
            counter!("stats_request_failures_total").increment(1);
            return error_response(&err);
        }
    };
    let descriptor = match user_data {
        Some(data) => descriptor.with_user_data(data),
        None => descriptor,
    };

    info!(
        operation = operation_name,
        resource_id = %descriptor.resource_id,
        mode = ?mode,
        "submitting operation"
    );

    let submitted = match state
        .engine
        .enqueue(descriptor, operation, state.config.job_timeout)
        .await
    {
        Ok(submitted) => submitted,
        Err(err) => {
            warn!(operation = operation_name, error = %err, "enqueue failed");
            counter!("stats_request_failures_total").increment(1);
            return error_response(&err);
        }
    };

    match mode {
        ExecutionMode::Asynchronous => envelope_response(submitted.accepted),
        ExecutionMode::Synchronous => {
            match state.engine.wait_until_finished(&submitted.handle).await {
                Ok(envelope) => {
                    if envelope.status != JobStatus::Finished {
                        counter!("stats_request_failures_total").increment(1);
                    }
                    envelope_response(envelope)
                }
                Err(err) => {
                    warn!(operation = operation_name, error = %err, "waiting for job failed");
                    counter!("stats_request_failures_total").increment(1);
                    error_response(&err)
                }
            }
        }
    }
}

/// Error envelope for requests rejected before reaching the engine.
pub fn error_response(err: &GeostatError) -> Response {
    let status = StatusCode::from_u16(err.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::from(err))).into_response()
}

/// Serve a processing envelope with the status code it carries.
fn envelope_response(envelope: ProcessingResponse) -> Response {
    let status =
        StatusCode::from_u16(envelope.http_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(envelope)).into_response()
}
