use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;
use uni_finder::matching::{matching_router, ProgramMatchService};

#[derive(Debug, Serialize)]
pub(crate) struct HealthView {
    pub(crate) status: &'static str,
    pub(crate) catalog_records: usize,
}

pub(crate) fn with_matching_routes(service: Arc<ProgramMatchService>) -> axum::Router {
    let records = service.catalog().len();
    matching_router(service)
        .route(
            "/health",
            axum::routing::get(move || healthcheck(records)),
        )
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck(catalog_records: usize) -> Json<HealthView> {
    Json(HealthView {
        status: "ok",
        catalog_records,
    })
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let label = if ready { "ready" } else { "initializing" };
    (status, Json(serde_json::json!({ "status": label })))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
