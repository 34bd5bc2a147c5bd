pub mod dtos;
pub mod handlers;

use axum::{
    Router,
    http::HeaderName,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    app_state::AppState,
    engine::{ExtractMode, ExtractionOutcome, FailureKind},
    extractor::NormalizedListing,
    health::{self, HealthResponse},
    middleware::{RateLimit, rate_limit_middleware},
};

#[derive(OpenApi)]
#[openapi(
    paths(health::health_check, handlers::extract_listings),
    components(schemas(
        HealthResponse,
        dtos::ExtractRequest,
        dtos::ErrorResponse,
        ExtractMode,
        ExtractionOutcome,
        FailureKind,
        NormalizedListing
    )),
    tags(
        (name = "health", description = "Liveness"),
        (name = "extraction", description = "Car listings from third-party pages")
    )
)]
pub struct ApiDoc;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// The full application: health, rate-limited `/v1`, OpenAPI docs, tracing.
pub fn router(state: AppState, rate_limit: RateLimit) -> Router {
    let v1 = Router::new()
        .route("/extract", post(handlers::extract_listings))
        .route_layer(from_fn_with_state(rate_limit, rate_limit_middleware));

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .route("/healthz", get(health::health_check))
        .nest("/v1", v1)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(request_id)),
        )
        .with_state(state)
}
