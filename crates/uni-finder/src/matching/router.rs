use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::service::{MatchRequest, MatchServiceError, ProgramMatchService};

/// Router builder exposing the matcher, the rule table and catalog queries.
pub fn matching_router(service: Arc<ProgramMatchService>) -> Router {
    Router::new()
        .route("/api/v1/match", post(match_handler))
        .route("/api/v1/tracks", get(tracks_handler))
        .route(
            "/api/v1/tracks/:track/disciplines",
            get(track_disciplines_handler),
        )
        .route("/api/v1/programs", get(programs_handler))
        .route("/api/v1/programs/search", get(search_handler))
        .route("/api/v1/programs/:program", get(program_handler))
        .route("/api/v1/universities", get(universities_handler))
        .route("/api/v1/universities/:university", get(university_handler))
        .route("/api/v1/stats", get(stats_handler))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchParams {
    #[serde(default)]
    q: Option<String>,
}

pub(crate) async fn match_handler(
    State(service): State<Arc<ProgramMatchService>>,
    axum::Json(request): axum::Json<MatchRequest>,
) -> Response {
    match service.match_profile(request) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn tracks_handler(State(service): State<Arc<ProgramMatchService>>) -> Response {
    let payload = json!({ "tracks": service.tracks() });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn track_disciplines_handler(
    State(service): State<Arc<ProgramMatchService>>,
    Path(track): Path<String>,
) -> Response {
    match service.track(&track) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn search_handler(
    State(service): State<Arc<ProgramMatchService>>,
    Query(params): Query<SearchParams>,
) -> Response {
    let query = params.q.unwrap_or_default();
    match service.search(&query) {
        Ok(programs) => {
            let payload = json!({
                "query": query.trim(),
                "count": programs.len(),
                "programs": programs,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn stats_handler(State(service): State<Arc<ProgramMatchService>>) -> Response {
    (StatusCode::OK, axum::Json(service.stats())).into_response()
}

pub(crate) async fn programs_handler(State(service): State<Arc<ProgramMatchService>>) -> Response {
    let programs = service.programs();
    let payload = json!({ "count": programs.len(), "programs": programs });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn program_handler(
    State(service): State<Arc<ProgramMatchService>>,
    Path(program): Path<String>,
) -> Response {
    match service.program(&program) {
        Ok(detail) => (StatusCode::OK, axum::Json(detail)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn universities_handler(
    State(service): State<Arc<ProgramMatchService>>,
) -> Response {
    let universities = service.universities();
    let payload = json!({ "count": universities.len(), "universities": universities });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn university_handler(
    State(service): State<Arc<ProgramMatchService>>,
    Path(university): Path<String>,
) -> Response {
    match service.university(&university) {
        Ok(detail) => (StatusCode::OK, axum::Json(detail)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: MatchServiceError) -> Response {
    let status = match error {
        MatchServiceError::Profile(_) => StatusCode::UNPROCESSABLE_ENTITY,
        MatchServiceError::EmptyQuery | MatchServiceError::EmptyTrack => StatusCode::BAD_REQUEST,
        MatchServiceError::ProgramNotFound(_) | MatchServiceError::UniversityNotFound(_) => {
            StatusCode::NOT_FOUND
        }
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
