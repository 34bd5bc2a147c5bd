use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::info;

use crate::{
    api::dtos::{ErrorResponse, ExtractRequest},
    app_state::AppState,
    engine::{ExtractionOutcome, FailureKind},
};

/// HTTP status for an outcome. The body always carries the full outcome.
pub fn status_for(outcome: &ExtractionOutcome) -> StatusCode {
    match outcome.failure_kind() {
        None => StatusCode::OK,
        Some(FailureKind::InvalidUrl) => StatusCode::BAD_REQUEST,
        Some(FailureKind::OversizedResponse) => StatusCode::PAYLOAD_TOO_LARGE,
        Some(FailureKind::NoMatch | FailureKind::EditorialPage) => StatusCode::UNPROCESSABLE_ENTITY,
        Some(
            FailureKind::Network
            | FailureKind::UpstreamHttp
            | FailureKind::Blocked
            | FailureKind::UnparseableMarkup,
        ) => StatusCode::BAD_GATEWAY,
        Some(FailureKind::Timeout) => StatusCode::GATEWAY_TIMEOUT,
        Some(FailureKind::Cancelled) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

#[utoipa::path(
    post,
    path = "/v1/extract",
    tag = "extraction",
    request_body = ExtractRequest,
    responses(
        (status = 200, description = "Listings extracted", body = ExtractionOutcome),
        (status = 400, description = "Invalid request or URL", body = ErrorResponse),
        (status = 413, description = "Page larger than the body limit", body = ExtractionOutcome),
        (status = 422, description = "No listing found on the page", body = ExtractionOutcome),
        (status = 429, description = "Rate limit exceeded", body = ErrorResponse),
        (status = 502, description = "Upstream site failed or blocked the request", body = ExtractionOutcome),
        (status = 504, description = "Upstream site timed out", body = ExtractionOutcome),
        (status = 503, description = "Server shutting down", body = ExtractionOutcome)
    )
)]
pub async fn extract_listings(
    State(state): State<AppState>,
    Json(payload): Json<ExtractRequest>,
) -> Response {
    if let Err(e) = payload.validate() {
        return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: e })).into_response();
    }

    let outcome = state.engine.run(&payload.url, payload.mode).await;
    let status = status_for(&outcome);
    info!(status = status.as_u16(), mode = ?payload.mode, "Extract request served");
    (status, Json(outcome)).into_response()
}
